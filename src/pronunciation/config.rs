use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Result, ScoringError};

const CONFIG_FILE: &str = "scoring.json";

/// Tunable constants for the scoring pipeline, loadable from `assets/scoring.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub fusion: FusionConfig,
    pub feedback: FeedbackConfig,
    pub dtw: DtwConfig,
}

impl ScoringConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            ScoringError::Config(format!("failed to read {}: {err}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|err| {
            ScoringError::Config(format!("failed to parse {}: {err}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `scoring.json` from the assets directory, using defaults when it is absent.
    pub fn load_from_assets(assets_root: &Path) -> Result<Self> {
        let path = assets_root.join(CONFIG_FILE);
        if path.is_file() {
            Self::from_path(&path)
        } else {
            tracing::debug!(path = %path.display(), "no scoring config found; using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.fusion.validate()?;
        self.feedback.validate()?;
        if self.dtw.band == Some(0) {
            return Err(ScoringError::Config(
                "dtw band width must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Score assigned to every distance strictly below `below`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceBand {
    pub below: f32,
    pub score: f32,
}

/// Linear ramp `intercept - slope * (d - start)` used while `d < end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampSegment {
    pub start: f32,
    pub end: f32,
    pub intercept: f32,
    pub slope: f32,
}

/// Open-ended ramp for the largest distances, bounded below by `floor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampTail {
    pub start: f32,
    pub intercept: f32,
    pub slope: f32,
    pub floor: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub dtw: f32,
    pub phoneme: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Word similarity at or above which the lenient acoustic bands apply.
    pub lenient_similarity: f32,
    /// Word similarity above which `confident_weights` replace `default_weights`.
    pub confident_similarity: f32,
    pub lenient_bands: Vec<DistanceBand>,
    pub lenient_floor: f32,
    pub strict_full_below: f32,
    pub strict_full_score: f32,
    pub strict_segments: Vec<RampSegment>,
    pub strict_tail: RampTail,
    pub confident_weights: BlendWeights,
    pub default_weights: BlendWeights,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            lenient_similarity: 0.95,
            confident_similarity: 0.8,
            lenient_bands: vec![
                DistanceBand {
                    below: 4.0,
                    score: 95.0,
                },
                DistanceBand {
                    below: 6.0,
                    score: 88.0,
                },
                DistanceBand {
                    below: 8.0,
                    score: 80.0,
                },
            ],
            lenient_floor: 72.0,
            strict_full_below: 3.0,
            strict_full_score: 100.0,
            strict_segments: vec![
                RampSegment {
                    start: 3.0,
                    end: 5.5,
                    intercept: 100.0,
                    slope: 10.0,
                },
                RampSegment {
                    start: 5.5,
                    end: 8.0,
                    intercept: 75.0,
                    slope: 12.0,
                },
            ],
            strict_tail: RampTail {
                start: 8.0,
                intercept: 45.0,
                slope: 3.0,
                floor: 40.0,
            },
            confident_weights: BlendWeights {
                dtw: 0.4,
                phoneme: 0.6,
            },
            default_weights: BlendWeights {
                dtw: 0.5,
                phoneme: 0.5,
            },
        }
    }
}

impl FusionConfig {
    fn validate(&self) -> Result<()> {
        ensure_unit("lenient_similarity", self.lenient_similarity)?;
        ensure_unit("confident_similarity", self.confident_similarity)?;
        ensure_weights("confident_weights", self.confident_weights)?;
        ensure_weights("default_weights", self.default_weights)?;
        if self
            .lenient_bands
            .windows(2)
            .any(|pair| pair[0].below >= pair[1].below)
        {
            return Err(ScoringError::Config(
                "lenient_bands must be sorted by strictly increasing distance".to_string(),
            ));
        }
        let mut cursor = self.strict_full_below;
        for segment in &self.strict_segments {
            if segment.start != cursor || segment.end <= segment.start {
                return Err(ScoringError::Config(format!(
                    "strict segment starting at {} must continue from {cursor} and end after it starts",
                    segment.start
                )));
            }
            cursor = segment.end;
        }
        if self.strict_tail.start != cursor {
            return Err(ScoringError::Config(format!(
                "strict_tail must start at {cursor}, found {}",
                self.strict_tail.start
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub excellent: f32,
    pub very_good: f32,
    pub good: f32,
    pub decent: f32,
    pub fair: f32,
    /// Scores below this trigger the clarity/timing/articulation tips.
    pub tip_threshold: f32,
    /// Phoneme scores below this report what was heard vs expected.
    pub mismatch_threshold: f32,
    /// DTW distances above this add a pacing tip.
    pub pacing_distance: f32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            excellent: 90.0,
            very_good: 80.0,
            good: 70.0,
            decent: 60.0,
            fair: 50.0,
            tip_threshold: 70.0,
            mismatch_threshold: 80.0,
            pacing_distance: 6.0,
        }
    }
}

impl FeedbackConfig {
    fn validate(&self) -> Result<()> {
        let bands = [self.excellent, self.very_good, self.good, self.decent, self.fair];
        if bands.windows(2).any(|pair| pair[0] <= pair[1]) {
            return Err(ScoringError::Config(
                "feedback bands must be strictly decreasing from excellent to fair".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DtwConfig {
    /// Optional Sakoe-Chiba band half-width in frames.
    pub band: Option<usize>,
}

fn ensure_unit(label: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ScoringError::Config(format!(
            "{label} must lie within [0, 1], found {value}"
        )))
    }
}

fn ensure_weights(label: &str, weights: BlendWeights) -> Result<()> {
    ensure_unit(label, weights.dtw)?;
    ensure_unit(label, weights.phoneme)?;
    if ((weights.dtw + weights.phoneme) - 1.0).abs() > 1e-4 {
        return Err(ScoringError::Config(format!(
            "{label} must sum to 1, found {}",
            weights.dtw + weights.phoneme
        )));
    }
    Ok(())
}
