use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::pronunciation::engine::DEFAULT_LANGUAGE;

#[derive(Parser, Debug)]
#[command(
    name = "pronunciation",
    version,
    about = "Score a learner's pronunciation of a word against a reference recording"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a learner recording against a reference recording.
    Score(ScoreArgs),
    /// Align two IPA transcriptions and list the mismatched sounds.
    ComparePhonemes(CompareArgs),
    /// Print the IPA transcription of a word.
    TranscribeWord(TranscribeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Learner recording (WAV, MP3, OGG, FLAC, ...).
    #[arg(long)]
    pub user: PathBuf,
    /// Reference pronunciation recording.
    #[arg(long)]
    pub reference: PathBuf,
    /// Word the learner was asked to say.
    #[arg(long)]
    pub word: String,
    /// Language code such as `en`, `es` or `zh-CN`.
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,
    /// Scoring thresholds file; defaults to `scoring.json` in the assets directory.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Optional override for the assets directory.
    #[arg(long = "assets-path")]
    pub assets_path: Option<PathBuf>,
    /// Whisper model file; falls back to `WHISPER_MODEL_PATH`.
    #[arg(long)]
    pub model: Option<PathBuf>,
    /// Emit the full outcome as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// Expected IPA, e.g. `kæt`.
    #[arg(long)]
    pub target: String,
    /// IPA actually produced, e.g. `bæt`.
    #[arg(long)]
    pub actual: String,
    /// Emit the alignment as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TranscribeArgs {
    #[arg(long)]
    pub word: String,
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,
}
