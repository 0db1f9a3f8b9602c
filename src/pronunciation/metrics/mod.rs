pub mod similarity;

pub use similarity::{fold_text, WordSimilarityScorer};

use crate::pronunciation::config::{BlendWeights, FusionConfig};

const MAX_SCORE: f32 = 100.0;

/// Calibrated acoustic, recognition and overall scores, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusedScores {
    pub dtw_score: f32,
    pub phoneme_score: f32,
    pub overall_score: f32,
    /// True when the word was (near-)exactly recognized and the lenient bands applied.
    pub lenient: bool,
}

/// Combines DTW distance and word similarity into calibrated scores.
#[derive(Debug, Clone, Default)]
pub struct ScoreFusion {
    config: FusionConfig,
}

impl ScoreFusion {
    pub fn new(config: FusionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Non-finite similarity counts as 0; a NaN distance counts as infinitely far.
    pub fn fuse(&self, dtw_distance: f32, phoneme_similarity: f32) -> FusedScores {
        let similarity = if phoneme_similarity.is_finite() {
            phoneme_similarity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let distance = if dtw_distance.is_nan() {
            f32::INFINITY
        } else {
            dtw_distance.max(0.0)
        };

        let lenient = similarity >= self.config.lenient_similarity;
        let dtw_score = if lenient {
            self.lenient_score(distance)
        } else {
            self.strict_score(distance)
        }
        .clamp(0.0, MAX_SCORE);
        let phoneme_score = (similarity * MAX_SCORE).clamp(0.0, MAX_SCORE);

        let weights = self.weights_for(similarity);
        let overall_score =
            (weights.dtw * dtw_score + weights.phoneme * phoneme_score).clamp(0.0, MAX_SCORE);

        FusedScores {
            dtw_score,
            phoneme_score,
            overall_score,
            lenient,
        }
    }

    fn lenient_score(&self, distance: f32) -> f32 {
        self.config
            .lenient_bands
            .iter()
            .find(|band| distance < band.below)
            .map(|band| band.score)
            .unwrap_or(self.config.lenient_floor)
    }

    fn strict_score(&self, distance: f32) -> f32 {
        if distance < self.config.strict_full_below {
            return self.config.strict_full_score;
        }
        if let Some(segment) = self
            .config
            .strict_segments
            .iter()
            .find(|segment| distance < segment.end)
        {
            return segment.intercept - segment.slope * (distance - segment.start);
        }
        let tail = &self.config.strict_tail;
        let ramp = tail.intercept - tail.slope * (distance - tail.start);
        if ramp.is_finite() {
            ramp.max(tail.floor)
        } else {
            tail.floor
        }
    }

    fn weights_for(&self, similarity: f32) -> BlendWeights {
        if similarity > self.config.confident_similarity {
            self.config.confident_weights
        } else {
            self.config.default_weights
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fusion() -> ScoreFusion {
        ScoreFusion::default()
    }

    #[test]
    fn lenient_bands_step_down() {
        let fusion = fusion();
        let scores: Vec<f32> = [3.9, 4.0, 5.9, 7.99, 8.0, 30.0]
            .iter()
            .map(|d| fusion.fuse(*d, 1.0).dtw_score)
            .collect();
        assert_eq!(scores, vec![95.0, 88.0, 88.0, 80.0, 72.0, 72.0]);
    }

    #[test]
    fn strict_curve_is_continuous_at_knees() {
        let fusion = fusion();
        assert_eq!(fusion.fuse(2.99, 0.0).dtw_score, 100.0);
        assert_relative_eq!(fusion.fuse(3.0, 0.0).dtw_score, 100.0);
        assert_relative_eq!(fusion.fuse(5.5, 0.0).dtw_score, 75.0);
        assert_relative_eq!(fusion.fuse(8.0, 0.0).dtw_score, 45.0);
        assert_relative_eq!(fusion.fuse(9.0, 0.0).dtw_score, 42.0);
        assert_eq!(fusion.fuse(50.0, 0.0).dtw_score, 40.0);
    }

    #[test]
    fn weighting_switches_above_confident_similarity() {
        let fusion = fusion();
        let confident = fusion.fuse(2.0, 0.9);
        assert_relative_eq!(confident.overall_score, 0.4 * 100.0 + 0.6 * 90.0, epsilon = 1e-4);
        let even = fusion.fuse(2.0, 0.8);
        assert_relative_eq!(even.overall_score, 0.5 * 100.0 + 0.5 * 80.0, epsilon = 1e-4);
    }

    #[test]
    fn degenerate_inputs_stay_in_range() {
        let fusion = fusion();
        for (distance, similarity) in [
            (f32::NAN, 0.5),
            (f32::INFINITY, 1.0),
            (-3.0, 2.0),
            (4.0, f32::NAN),
        ] {
            let scores = fusion.fuse(distance, similarity);
            for value in [scores.dtw_score, scores.phoneme_score, scores.overall_score] {
                assert!((0.0..=100.0).contains(&value), "{value} out of range");
            }
        }
    }
}
