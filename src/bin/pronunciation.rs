use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use phonoscore::config::AppConfig;
use phonoscore::pronunciation::alignment::PhonemeAligner;
use phonoscore::pronunciation::cli::{Cli, Command, CompareArgs, ScoreArgs, TranscribeArgs};
use phonoscore::pronunciation::feedback::FeedbackGenerator;
use phonoscore::pronunciation::phonemes::{GraphemeToPhoneme, PhonemeString, TranscriberChain};
use phonoscore::pronunciation::{ScoringEngineBuilder, ScoringOutcome, ScoringRequest};
use phonoscore::transcription::default_recognizer;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Score(args) => handle_score(&args),
        Command::ComparePhonemes(args) => handle_compare(&args),
        Command::TranscribeWord(args) => handle_transcribe(&args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_score(args: &ScoreArgs) -> Result<()> {
    let assets = AppConfig::from_override(args.assets_path.clone())?;
    let config = assets.scoring_config(args.config.as_deref())?;

    let user_audio =
        fs::read(&args.user).with_context(|| format!("failed to read {:?}", args.user))?;
    let reference_audio = fs::read(&args.reference)
        .with_context(|| format!("failed to read {:?}", args.reference))?;

    let engine = ScoringEngineBuilder::new(default_recognizer(args.model.clone()))
        .config(config)
        .build()
        .context("invalid scoring configuration")?;

    let request = ScoringRequest::new(user_audio, reference_audio, args.word.as_str())
        .with_language(args.language.as_str());
    let outcome = engine
        .score(&request)
        .with_context(|| format!("failed to score pronunciation of {:?}", args.word))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

fn print_outcome(outcome: &ScoringOutcome) {
    let score = &outcome.score;
    println!("Target word:     {}", score.target_word);
    println!("Recognized:      {}", display_text(&score.recognized_text));
    println!("Reference heard: {}", display_text(&score.reference_text));
    println!("Overall score:   {:.1}", score.overall_score);
    println!("Acoustic score:  {:.1}", score.dtw_score);
    println!("Word score:      {:.1}", score.phoneme_score);
    println!(
        "DTW distance:    {:.3} over {} frames",
        score.dtw_distance, score.path_length
    );
    if let Some(analysis) = &outcome.phoneme_analysis {
        println!("Expected IPA:    /{}/", analysis.target_ipa);
        println!("Produced IPA:    /{}/", analysis.actual_ipa);
    }
    println!();
    println!("{}", outcome.feedback);
}

fn display_text(text: &str) -> &str {
    if text.is_empty() {
        "(nothing recognized)"
    } else {
        text
    }
}

fn handle_compare(args: &CompareArgs) -> Result<()> {
    let target = PhonemeString::from_ipa(&args.target);
    let actual = PhonemeString::from_ipa(&args.actual);
    let alignment = PhonemeAligner::new().align(&target, &actual);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&alignment.mismatches)?);
        return Ok(());
    }
    println!("Target: /{}/ ({} sounds)", target, target.len());
    println!("Actual: /{}/ ({} sounds)", actual, actual.len());
    println!(
        "Edit distance: {} (accuracy {:.0}%)",
        alignment.distance,
        alignment.accuracy(target.len()) * 100.0
    );
    println!(
        "{}",
        FeedbackGenerator::default().render_mismatches(&alignment.mismatches)
    );
    Ok(())
}

fn handle_transcribe(args: &TranscribeArgs) -> Result<()> {
    let phonemes = TranscriberChain::standard()
        .transcribe(&args.word, &args.language)
        .with_context(|| format!("failed to transcribe {:?}", args.word))?;
    println!("/{}/", phonemes);
    Ok(())
}
