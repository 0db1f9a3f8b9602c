use crate::audio::{prepare_signal, AudioDecoder, SymphoniaDecoder};
use crate::pronunciation::alignment::{AcousticAligner, PhonemeAligner};
use crate::pronunciation::config::ScoringConfig;
use crate::pronunciation::features::{FeatureExtractor, MfccExtractor};
use crate::pronunciation::feedback::FeedbackGenerator;
use crate::pronunciation::metrics::{ScoreFusion, WordSimilarityScorer};
use crate::pronunciation::phonemes::{
    GraphemeToPhoneme, Language, PhonemeString, TranscriberChain, TranscriptionError,
};
use crate::pronunciation::{PhonemeAnalysis, Result, ScoreResult, ScoringError, ScoringOutcome};
use crate::transcription::{Recognition, SpeechRecognizer};
use crate::types::{AudioRole, AudioSignal};

/// Language used when a request does not name one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// One learner attempt: two encoded audio buffers plus the word being practised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringRequest {
    pub user_audio: Vec<u8>,
    pub reference_audio: Vec<u8>,
    pub target_word: String,
    pub language_code: String,
}

impl ScoringRequest {
    pub fn new(
        user_audio: impl Into<Vec<u8>>,
        reference_audio: impl Into<Vec<u8>>,
        target_word: impl Into<String>,
    ) -> Self {
        Self {
            user_audio: user_audio.into(),
            reference_audio: reference_audio.into(),
            target_word: target_word.into(),
            language_code: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_language(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = language_code.into();
        self
    }
}

/// Scores pronunciation attempts against a reference recording.
///
/// Holds read-only model handles only; a single engine can serve concurrent
/// requests from several threads.
pub struct ScoringEngine {
    decoder: Box<dyn AudioDecoder>,
    extractor: Box<dyn FeatureExtractor>,
    recognizer: Box<dyn SpeechRecognizer>,
    transcriber: Box<dyn GraphemeToPhoneme>,
    aligner: AcousticAligner,
    similarity: WordSimilarityScorer,
    fusion: ScoreFusion,
    phonemes: PhonemeAligner,
    feedback: FeedbackGenerator,
}

impl ScoringEngine {
    /// Starts a builder; the recognizer has no default.
    pub fn builder(recognizer: impl SpeechRecognizer + 'static) -> ScoringEngineBuilder {
        ScoringEngineBuilder::new(Box::new(recognizer))
    }

    /// Decodes both buffers and scores them.
    pub fn score(&self, request: &ScoringRequest) -> Result<ScoringOutcome> {
        validate_target(&request.target_word)?;
        lookup_language(&request.language_code)?;

        let user = self.decoder.decode(&request.user_audio)?;
        let reference = self.decoder.decode(&request.reference_audio)?;
        self.score_signals(user, reference, &request.target_word, &request.language_code)
    }

    /// Scores already-decoded signals of any sample rate.
    pub fn score_signals(
        &self,
        user: AudioSignal,
        reference: AudioSignal,
        target_word: &str,
        language_code: &str,
    ) -> Result<ScoringOutcome> {
        let target_word = validate_target(target_word)?;
        let language = lookup_language(language_code)?;

        let user = prepare_signal(user, AudioRole::User)?;
        let reference = prepare_signal(reference, AudioRole::Reference)?;

        let user_features = self.extractor.extract(&user)?;
        let reference_features = self.extractor.extract(&reference)?;
        let alignment = self.aligner.align(&user_features, &reference_features)?;
        tracing::debug!(
            user_frames = user_features.frame_count(),
            reference_frames = reference_features.frame_count(),
            distance = alignment.distance,
            path_length = alignment.path.len(),
            "acoustic alignment complete"
        );

        let heard = self.recognize(&user, language, AudioRole::User)?;
        let reference_heard = self.recognize(&reference, language, AudioRole::Reference)?;

        let similarity = self.similarity.similarity(&heard.text, target_word);
        let fused = self.fusion.fuse(alignment.distance, similarity);
        tracing::debug!(
            similarity,
            lenient = fused.lenient,
            dtw_score = fused.dtw_score,
            phoneme_score = fused.phoneme_score,
            overall_score = fused.overall_score,
            "scores fused"
        );

        let score = ScoreResult {
            overall_score: fused.overall_score,
            dtw_score: fused.dtw_score,
            phoneme_score: fused.phoneme_score,
            recognized_text: heard.text.clone(),
            target_word: target_word.to_string(),
            dtw_distance: alignment.distance,
            reference_text: reference_heard.text,
            confidence: heard.confidence,
            path_length: alignment.path.len(),
        };

        let phoneme_analysis = match self.phoneme_analysis(target_word, &heard.text, language) {
            Ok(analysis) => Some(analysis),
            Err(err) => {
                tracing::warn!(error = %err, target_word, "phoneme analysis skipped");
                None
            }
        };

        let feedback = self.feedback.generate(
            &score,
            phoneme_analysis
                .as_ref()
                .map(|analysis| analysis.mismatches.as_slice()),
        );

        Ok(ScoringOutcome {
            score,
            feedback,
            phoneme_analysis,
        })
    }

    fn recognize(
        &self,
        signal: &AudioSignal,
        language: &Language,
        role: AudioRole,
    ) -> Result<Recognition> {
        let recognition = self
            .recognizer
            .recognize(signal, language)
            .map_err(|err| match err {
                ScoringError::RecognizerUnavailable(_) => err,
                other => ScoringError::RecognizerUnavailable(other.to_string()),
            })?;
        tracing::debug!(
            %role,
            text = %recognition.text,
            confidence = recognition.confidence,
            "speech recognized"
        );
        Ok(recognition)
    }

    fn phoneme_analysis(
        &self,
        target_word: &str,
        recognized_text: &str,
        language: &Language,
    ) -> std::result::Result<PhonemeAnalysis, TranscriptionError> {
        let target = self.transcriber.transcribe(target_word, language.code)?;
        let actual = if recognized_text.trim().is_empty() {
            PhonemeString::default()
        } else {
            self.transcriber.transcribe(recognized_text, language.code)?
        };

        let alignment = self.phonemes.align(&target, &actual);
        tracing::debug!(
            target = %target,
            actual = %actual,
            distance = alignment.distance,
            "phonemes aligned"
        );
        Ok(PhonemeAnalysis {
            target_ipa: target.to_ipa(),
            actual_ipa: actual.to_ipa(),
            feedback_text: self.feedback.render_mismatches(&alignment.mismatches),
            mismatches: alignment.mismatches,
        })
    }
}

/// Assembles a [`ScoringEngine`] from its collaborators.
pub struct ScoringEngineBuilder {
    recognizer: Box<dyn SpeechRecognizer>,
    decoder: Box<dyn AudioDecoder>,
    extractor: Box<dyn FeatureExtractor>,
    transcriber: Box<dyn GraphemeToPhoneme>,
    config: ScoringConfig,
}

impl ScoringEngineBuilder {
    pub fn new(recognizer: Box<dyn SpeechRecognizer>) -> Self {
        Self {
            recognizer,
            decoder: Box::new(SymphoniaDecoder::new()),
            extractor: Box::new(MfccExtractor::default()),
            transcriber: Box::new(TranscriberChain::standard()),
            config: ScoringConfig::default(),
        }
    }

    pub fn decoder(mut self, decoder: impl AudioDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    pub fn extractor(mut self, extractor: impl FeatureExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn transcriber(mut self, transcriber: impl GraphemeToPhoneme + 'static) -> Self {
        self.transcriber = Box::new(transcriber);
        self
    }

    pub fn config(mut self, config: ScoringConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates the configuration and wires the scoring stages.
    pub fn build(self) -> Result<ScoringEngine> {
        self.config.validate()?;
        let ScoringConfig {
            fusion,
            feedback,
            dtw,
        } = self.config;
        Ok(ScoringEngine {
            decoder: self.decoder,
            extractor: self.extractor,
            recognizer: self.recognizer,
            transcriber: self.transcriber,
            aligner: AcousticAligner::from_config(&dtw),
            similarity: WordSimilarityScorer::new(),
            fusion: ScoreFusion::new(fusion),
            phonemes: PhonemeAligner::new(),
            feedback: FeedbackGenerator::new(feedback),
        })
    }
}

fn validate_target(target_word: &str) -> Result<&str> {
    let trimmed = target_word.trim();
    if trimmed.is_empty() {
        return Err(ScoringError::InvalidTarget(
            "target word must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

fn lookup_language(code: &str) -> Result<&'static Language> {
    Language::lookup(code).ok_or_else(|| ScoringError::UnsupportedLanguage(code.to_string()))
}
