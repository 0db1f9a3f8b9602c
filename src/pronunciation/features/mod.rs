mod mel;
mod statistics;

use ndarray::{Array2, ArrayView1, Axis};

use crate::pronunciation::{Result, ScoringError};
use crate::types::AudioSignal;

pub use mel::{HOP_MS, MEL_BANDS, WINDOW_MS};

/// Number of cepstral coefficients kept per frame.
pub const MFCC_COUNT: usize = 13;

/// Time-major sequence of fixed-dimension feature vectors; never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSequence {
    frames: Array2<f32>,
}

impl FeatureSequence {
    /// Wraps a `frames x coefficients` matrix, rejecting empty or non-finite input.
    pub fn new(frames: Array2<f32>) -> Result<Self> {
        let (rows, cols) = frames.dim();
        if rows == 0 || cols == 0 {
            return Err(ScoringError::MalformedFeatureSequence(format!(
                "expected at least one frame and one coefficient, found {rows}x{cols}"
            )));
        }
        if let Some(index) = frames.iter().position(|v| !v.is_finite()) {
            return Err(ScoringError::MalformedFeatureSequence(format!(
                "non-finite value in frame {}",
                index / cols
            )));
        }
        Ok(Self { frames })
    }

    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let row_count = rows.len();
        let col_count = rows.first().map(|row| row.len()).unwrap_or(0);
        if rows.iter().any(|row| row.len() != col_count) {
            return Err(ScoringError::MalformedFeatureSequence(
                "frames have differing dimensions".to_string(),
            ));
        }
        let flat: Vec<f32> = rows.into_iter().flatten().collect();
        let frames = Array2::from_shape_vec((row_count, col_count), flat)
            .map_err(|err| ScoringError::MalformedFeatureSequence(err.to_string()))?;
        Self::new(frames)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len_of(Axis(0))
    }

    pub fn dimension(&self) -> usize {
        self.frames.len_of(Axis(1))
    }

    pub fn frame(&self, index: usize) -> ArrayView1<'_, f32> {
        self.frames.row(index)
    }

    pub fn frames(&self) -> &Array2<f32> {
        &self.frames
    }

    /// Returns a copy with every coefficient z-scored across frames.
    pub fn z_normalized(&self) -> Self {
        Self {
            frames: statistics::normalize_columns(&self.frames),
        }
    }
}

/// Turns a prepared signal into the cepstral sequence compared by DTW.
pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, signal: &AudioSignal) -> Result<FeatureSequence>;
}

/// MFCC front-end: 25 ms Hann windows every 10 ms, 80 mel bands, 13 coefficients.
#[derive(Debug, Clone)]
pub struct MfccExtractor {
    coefficients: usize,
}

impl Default for MfccExtractor {
    fn default() -> Self {
        Self {
            coefficients: MFCC_COUNT,
        }
    }
}

impl MfccExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeatureExtractor for MfccExtractor {
    fn extract(&self, signal: &AudioSignal) -> Result<FeatureSequence> {
        if signal.is_empty() {
            return Err(ScoringError::MalformedFeatureSequence(
                "cannot extract features from an empty signal".to_string(),
            ));
        }
        let mel = mel::compute_mel_spectrogram(signal)?;
        let mfcc = statistics::mfcc_matrix(&mel, self.coefficients)?;
        let sequence = FeatureSequence::new(mfcc)?;
        Ok(sequence.z_normalized())
    }
}
