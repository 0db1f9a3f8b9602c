use aus::analysis;
use ndarray::{Array2, Axis};

use crate::pronunciation::{Result, ScoringError};

/// Guards the z-score denominator for constant coefficients.
const EPSILON: f32 = 1e-8;

/// Cepstral coefficients from a mel spectrogram, one row per frame.
pub(crate) fn mfcc_matrix(mel_spectrogram: &[Vec<f64>], coefficients: usize) -> Result<Array2<f32>> {
    let raw = analysis::mel::mfcc_spectrogram(mel_spectrogram, coefficients, None);
    array_from_vec2(&raw)
}

fn array_from_vec2(data: &[Vec<f64>]) -> Result<Array2<f32>> {
    let rows = data.len();
    let cols = data.first().map(|row| row.len()).unwrap_or(0);
    if rows == 0 || cols == 0 {
        return Err(ScoringError::MalformedFeatureSequence(format!(
            "extractor produced a {rows}x{cols} matrix"
        )));
    }
    let mut flat = Vec::with_capacity(rows * cols);
    for (index, row) in data.iter().enumerate() {
        if row.len() != cols {
            return Err(ScoringError::MalformedFeatureSequence(format!(
                "frame {index} has {} coefficients, expected {cols}",
                row.len()
            )));
        }
        flat.extend(row.iter().map(|v| *v as f32));
    }
    Array2::from_shape_vec((rows, cols), flat)
        .map_err(|err| ScoringError::MalformedFeatureSequence(err.to_string()))
}

/// Z-scores each coefficient (column) across the frames of the sequence.
pub(crate) fn normalize_columns(input: &Array2<f32>) -> Array2<f32> {
    let mut output = input.clone();
    if input.is_empty() {
        return output;
    }
    for mut column in output.axis_iter_mut(Axis(1)) {
        let count = column.len().max(1) as f32;
        let mean = column.sum() / count;
        let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / count;
        let std_dev = variance.sqrt() + EPSILON;
        column.mapv_inplace(|v| (v - mean) / std_dev);
    }
    output
}
