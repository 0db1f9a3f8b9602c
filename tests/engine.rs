use std::io::Cursor;
use std::sync::Arc;
use std::thread;

use hound::{SampleFormat, WavSpec, WavWriter};
use phonoscore::audio::AudioDecoder;
use phonoscore::pronunciation::phonemes::{
    GraphemeToPhoneme, Language, LexiconTranscriber, PhonemeString, TranscriptionError,
};
use phonoscore::pronunciation::{
    MismatchKind, ScoringEngine, ScoringError, ScoringRequest,
};
use phonoscore::transcription::{Recognition, SpeechRecognizer};
use phonoscore::types::{AudioRole, AudioSignal};

/// Answers by clip length: short clips are the learner, long clips the reference.
struct ByDuration {
    learner: &'static str,
    reference: &'static str,
}

impl SpeechRecognizer for ByDuration {
    fn recognize(
        &self,
        signal: &AudioSignal,
        _: &Language,
    ) -> phonoscore::pronunciation::Result<Recognition> {
        let text = if signal.duration_secs() < 0.45 {
            self.learner
        } else {
            self.reference
        };
        Ok(Recognition::new(text, 0.75))
    }
}

struct Offline;

impl SpeechRecognizer for Offline {
    fn recognize(
        &self,
        _: &AudioSignal,
        _: &Language,
    ) -> phonoscore::pronunciation::Result<Recognition> {
        Err(ScoringError::RecognizerUnavailable("model not loaded".into()))
    }
}

struct MissingBinary;

impl GraphemeToPhoneme for MissingBinary {
    fn name(&self) -> &str {
        "missing"
    }

    fn transcribe(&self, _: &str, _: &str) -> Result<PhonemeString, TranscriptionError> {
        Err(TranscriptionError::TranscriberUnavailable(
            "espeak-ng not found on PATH".into(),
        ))
    }
}

/// Little-endian f32 PCM at 16 kHz, no container.
struct RawPcm;

impl AudioDecoder for RawPcm {
    fn decode(&self, bytes: &[u8]) -> phonoscore::pronunciation::Result<AudioSignal> {
        let samples = bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        Ok(AudioSignal::new(samples, 16_000))
    }
}

fn vowel(seconds: f32, sample_rate: u32, pitch: f32) -> Vec<f32> {
    let count = (sample_rate as f32 * seconds) as usize;
    (0..count)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let envelope = (std::f32::consts::PI * t / seconds).sin();
            let tone = (std::f32::consts::TAU * pitch * t).sin()
                + 0.5 * (std::f32::consts::TAU * pitch * 2.0 * t).sin();
            tone * envelope * 0.4
        })
        .collect()
}

fn wav_bytes(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        for sample in samples {
            writer
                .write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn request(word: &str) -> ScoringRequest {
    ScoringRequest::new(
        wav_bytes(&vowel(0.4, 22_050, 180.0), 22_050),
        wav_bytes(&vowel(0.6, 16_000, 200.0), 16_000),
        word,
    )
}

fn lexicon_engine(learner: &'static str, reference: &'static str) -> ScoringEngine {
    ScoringEngine::builder(ByDuration { learner, reference })
        .transcriber(LexiconTranscriber::new())
        .build()
        .unwrap()
}

#[test]
fn scores_wav_bytes_end_to_end() {
    let engine = lexicon_engine("hello", "hello");
    let outcome = engine.score(&request("hello")).unwrap();
    let score = &outcome.score;

    assert_eq!(score.recognized_text, "hello");
    assert_eq!(score.reference_text, "hello");
    assert_eq!(score.target_word, "hello");
    assert!(score.dtw_distance >= 0.0);
    assert!(score.path_length > 0);
    assert_eq!(score.phoneme_score, 100.0);
    for value in [score.overall_score, score.dtw_score, score.phoneme_score] {
        assert!((0.0..=100.0).contains(&value));
    }
    let analysis = outcome.phoneme_analysis.unwrap();
    assert!(analysis.mismatches.is_empty());
    assert_eq!(analysis.feedback_text, "All sounds pronounced correctly!");
}

#[test]
fn repeated_requests_are_identical() {
    let engine = lexicon_engine("bat", "cat");
    let request = request("cat");
    let first = engine.score(&request).unwrap();
    let second = engine.score(&request).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn misrecognized_word_is_localized_to_a_phoneme() {
    let engine = lexicon_engine("bat", "cat");
    let outcome = engine.score(&request("cat")).unwrap();
    let analysis = outcome.phoneme_analysis.as_ref().unwrap();
    assert_eq!(analysis.target_ipa, "kæt");
    assert_eq!(analysis.actual_ipa, "bæt");
    assert_eq!(analysis.mismatches.len(), 1);
    assert_eq!(analysis.mismatches[0].kind, MismatchKind::Substitution);
    assert!(outcome.score.phoneme_score < 80.0);
    assert!(outcome.feedback.contains("I heard 'bat' (expected 'cat')."));
}

#[test]
fn silence_from_recognizer_marks_every_sound_missing() {
    let engine = lexicon_engine("", "cat");
    let outcome = engine.score(&request("cat")).unwrap();
    let analysis = outcome.phoneme_analysis.unwrap();
    assert_eq!(analysis.actual_ipa, "");
    assert_eq!(analysis.mismatches.len(), 3);
    assert!(analysis
        .mismatches
        .iter()
        .all(|m| m.kind == MismatchKind::Omission));
    assert!(outcome.feedback.contains("couldn't make out"));
}

#[test]
fn unavailable_transcriber_keeps_the_score() {
    let engine = ScoringEngine::builder(ByDuration {
        learner: "hello",
        reference: "hello",
    })
    .transcriber(MissingBinary)
    .build()
    .unwrap();
    let outcome = engine.score(&request("hello")).unwrap();
    assert!(outcome.phoneme_analysis.is_none());
    assert!(outcome.score.overall_score > 0.0);
}

#[test]
fn unavailable_recognizer_fails_the_request() {
    let engine = ScoringEngine::builder(Offline).build().unwrap();
    let err = engine.score(&request("hello")).unwrap_err();
    assert!(matches!(err, ScoringError::RecognizerUnavailable(_)));
}

#[test]
fn undecodable_or_empty_audio_is_fatal() {
    let engine = lexicon_engine("hello", "hello");

    let garbage = ScoringRequest::new(b"not audio".to_vec(), request("x").reference_audio, "hello");
    assert!(matches!(
        engine.score(&garbage).unwrap_err(),
        ScoringError::Decode(_)
    ));

    let silent = ScoringRequest::new(
        request("x").user_audio,
        wav_bytes(&[], 16_000),
        "hello",
    );
    let err = engine.score(&silent).unwrap_err();
    assert!(
        matches!(err, ScoringError::EmptyAudio(AudioRole::Reference) | ScoringError::Decode(_)),
        "{err}"
    );
}

#[test]
fn unknown_language_is_rejected_before_decoding() {
    let engine = lexicon_engine("hello", "hello");
    let request = ScoringRequest::new(Vec::new(), Vec::new(), "hello").with_language("tlh");
    assert!(matches!(
        engine.score(&request).unwrap_err(),
        ScoringError::UnsupportedLanguage(_)
    ));
}

#[test]
fn engine_serves_concurrent_requests() {
    let engine = Arc::new(lexicon_engine("bat", "cat"));
    let expected = engine.score(&request("cat")).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.score(&request("cat")).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn injected_decoder_replaces_container_probing() {
    let engine = ScoringEngine::builder(ByDuration {
        learner: "cat",
        reference: "cat",
    })
    .decoder(RawPcm)
    .transcriber(LexiconTranscriber::new())
    .build()
    .unwrap();
    let pcm = |samples: Vec<f32>| -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    };
    let request = ScoringRequest::new(
        pcm(vowel(0.4, 16_000, 180.0)),
        pcm(vowel(0.6, 16_000, 200.0)),
        "cat",
    );
    let outcome = engine.score(&request).unwrap();
    assert_eq!(outcome.score.recognized_text, "cat");
    assert!(outcome.score.path_length > 0);
}
