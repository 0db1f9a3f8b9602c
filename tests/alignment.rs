use approx::assert_relative_eq;
use ndarray::{array, Array2};
use phonoscore::pronunciation::alignment::dtw::align_frames;
use phonoscore::pronunciation::alignment::{
    align_symbols, levenshtein, levenshtein_str, AcousticAligner, PhonemeAligner,
};
use phonoscore::pronunciation::features::FeatureSequence;
use phonoscore::pronunciation::phonemes::PhonemeString;
use phonoscore::pronunciation::{MismatchKind, ScoringError};

fn ramp(frames: usize, dims: usize, offset: f32) -> Array2<f32> {
    Array2::from_shape_fn((frames, dims), |(i, j)| (i as f32 * 0.3 + j as f32 * 0.1 + offset).sin())
}

#[test]
fn identical_sequences_have_zero_distance() {
    let frames = ramp(24, 13, 0.0);
    let sequence = FeatureSequence::new(frames).unwrap();
    let alignment = AcousticAligner::new().align(&sequence, &sequence).unwrap();
    assert_relative_eq!(alignment.distance, 0.0);
    assert_eq!(alignment.path.len(), 24);
    assert!(alignment.path.pairs().iter().all(|(i, j)| i == j));
}

#[test]
fn distance_is_non_negative_and_path_is_monotonic() {
    let a = ramp(30, 13, 0.0);
    let b = ramp(18, 13, 0.7);
    let alignment = align_frames(a.view(), b.view(), None).unwrap();
    assert!(alignment.distance >= 0.0);
    let pairs = alignment.path.pairs();
    assert_eq!(pairs.first(), Some(&(0, 0)));
    assert_eq!(pairs.last(), Some(&(29, 17)));
    assert!(pairs
        .windows(2)
        .all(|w| w[1].0 >= w[0].0 && w[1].1 >= w[0].1 && (w[1].0 - w[0].0) + (w[1].1 - w[0].1) >= 1));
}

#[test]
fn distance_is_normalized_by_path_length() {
    let a = array![[0.0_f32], [0.0], [0.0]];
    let b = array![[1.0_f32], [1.0], [1.0]];
    let alignment = align_frames(a.view(), b.view(), None).unwrap();
    assert_relative_eq!(alignment.total_cost, 3.0);
    assert_relative_eq!(alignment.distance, 3.0 / 3.0_f32.sqrt(), epsilon = 1e-6);
}

#[test]
fn narrow_band_still_reaches_the_corner() {
    let a = ramp(40, 4, 0.0);
    let b = ramp(10, 4, 0.2);
    let banded = align_frames(a.view(), b.view(), Some(1)).unwrap();
    assert_eq!(banded.path.pairs().last(), Some(&(39, 9)));
    let free = align_frames(a.view(), b.view(), None).unwrap();
    assert!(banded.distance + 1e-6 >= free.distance);
}

#[test]
fn empty_and_mismatched_sequences_are_rejected() {
    let empty = Array2::<f32>::zeros((0, 13));
    let full = ramp(5, 13, 0.0);
    assert!(matches!(
        align_frames(empty.view(), full.view(), None),
        Err(ScoringError::EmptySequence)
    ));
    let narrow = ramp(5, 12, 0.0);
    assert!(matches!(
        align_frames(full.view(), narrow.view(), None),
        Err(ScoringError::DimensionMismatch { left: 13, right: 12 })
    ));
}

#[test]
fn levenshtein_reference_values() {
    assert_eq!(levenshtein_str("cat", "cat"), 0);
    assert_eq!(levenshtein_str("cat", "cats"), 1);
    assert_eq!(levenshtein_str("cat", "bat"), 1);
    assert_eq!(levenshtein_str("", "abc"), 3);
    assert_eq!(levenshtein(&[1, 2, 3], &[3, 2, 1]), 2);
}

#[test]
fn single_substitution_is_localized() {
    let alignment = align_symbols(&["k", "æ", "t"], &["b", "æ", "t"]);
    assert_eq!(alignment.distance, 1);
    assert_eq!(alignment.mismatches.len(), 1);
    let mismatch = &alignment.mismatches[0];
    assert_eq!(mismatch.kind, MismatchKind::Substitution);
    assert_eq!(mismatch.position, 0);
    assert_eq!(mismatch.expected.as_deref(), Some("k"));
    assert_eq!(mismatch.actual.as_deref(), Some("b"));
}

#[test]
fn mismatch_count_equals_edit_distance() {
    let cases = [
        ("hɛloʊ", "ɛloʊ"),
        ("kæt", "kæts"),
        ("tʃɝtʃ", "ʃɝʃ"),
        ("pɹənʌnsieɪʃən", "pɹonunsiaʃon"),
        ("θæŋk", ""),
        ("", "ju"),
    ];
    let aligner = PhonemeAligner::new();
    for (target, actual) in cases {
        let target = PhonemeString::from_ipa(target);
        let actual = PhonemeString::from_ipa(actual);
        let alignment = aligner.align(&target, &actual);
        assert_eq!(alignment.mismatches.len(), alignment.distance, "{target} vs {actual}");
        assert_eq!(alignment.distance, levenshtein(target.symbols(), actual.symbols()));
    }
}

#[test]
fn omissions_and_insertions_keep_target_positions() {
    let dropped = align_symbols(&["k", "æ", "t"], &["k", "t"]);
    assert_eq!(dropped.mismatches.len(), 1);
    assert_eq!(dropped.mismatches[0].kind, MismatchKind::Omission);
    assert_eq!(dropped.mismatches[0].position, 1);
    assert_eq!(dropped.mismatches[0].expected.as_deref(), Some("æ"));

    let added = align_symbols(&["k", "æ", "t"], &["k", "æ", "t", "s"]);
    assert_eq!(added.mismatches.len(), 1);
    assert_eq!(added.count(MismatchKind::Insertion), 1);
    assert_eq!(added.mismatches[0].position, 3);
    assert_eq!(added.mismatches[0].actual.as_deref(), Some("s"));
}
