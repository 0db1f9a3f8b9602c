use approx::assert_relative_eq;
use phonoscore::pronunciation::metrics::{ScoreFusion, WordSimilarityScorer};
use phonoscore::pronunciation::FusionConfig;

fn fusion() -> ScoreFusion {
    ScoreFusion::new(FusionConfig::default())
}

#[test]
fn exact_recognition_uses_lenient_bands() {
    let similarity = WordSimilarityScorer::new().similarity("hello", "hello");
    assert_relative_eq!(similarity, 1.0);
    let scores = fusion().fuse(2.0, similarity);
    assert!(scores.lenient);
    assert_relative_eq!(scores.dtw_score, 95.0);
    assert_relative_eq!(scores.phoneme_score, 100.0);
    assert_relative_eq!(scores.overall_score, 98.0, epsilon = 1e-4);
}

#[test]
fn unrelated_recognition_uses_strict_ramp() {
    let similarity = WordSimilarityScorer::new().similarity("xyz", "hello");
    assert_relative_eq!(similarity, 0.12, epsilon = 1e-5);
    let scores = fusion().fuse(7.0, similarity);
    assert!(!scores.lenient);
    assert_relative_eq!(scores.dtw_score, 57.0, epsilon = 1e-4);
    assert_relative_eq!(scores.phoneme_score, 12.0, epsilon = 1e-3);
    assert_relative_eq!(
        scores.overall_score,
        0.5 * scores.dtw_score + 0.5 * scores.phoneme_score,
        epsilon = 1e-4
    );
}

#[test]
fn word_similarity_reference_values() {
    let scorer = WordSimilarityScorer::new();
    assert_relative_eq!(scorer.similarity("run", "run"), 1.0);
    assert!(scorer.similarity("running", "run") >= 0.9);
    assert!(scorer.similarity("xyz", "run") < 0.5);
    assert_relative_eq!(scorer.similarity("Hello World", "helloworld"), 1.0);
    assert_relative_eq!(scorer.similarity("", ""), 1.0);
    assert_relative_eq!(scorer.similarity("", "run"), 0.0);
}

#[test]
fn strict_ramp_is_continuous_at_segment_edges() {
    let fusion = fusion();
    for edge in [3.0_f32, 5.5, 8.0] {
        let below = fusion.fuse(edge - 1e-3, 0.0).dtw_score;
        let above = fusion.fuse(edge + 1e-3, 0.0).dtw_score;
        assert_relative_eq!(below, above, epsilon = 0.05);
    }
    assert_relative_eq!(fusion.fuse(100.0, 0.0).dtw_score, 40.0);
}

#[test]
fn fused_scores_stay_in_range() {
    let fusion = fusion();
    let distances = [0.0, 0.5, 3.9, 4.0, 6.0, 7.99, 8.0, 25.0, f32::INFINITY, f32::NAN];
    let similarities = [0.0, 0.5, 0.8, 0.81, 0.95, 1.0, f32::NAN, -1.0, 2.0];
    for &distance in &distances {
        for &similarity in &similarities {
            let scores = fusion.fuse(distance, similarity);
            for value in [scores.dtw_score, scores.phoneme_score, scores.overall_score] {
                assert!((0.0..=100.0).contains(&value), "{distance} {similarity} -> {value}");
            }
        }
    }
}
