use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::pronunciation::features::FeatureSequence;
use crate::pronunciation::{DtwConfig, Result, ScoringError};

/// Monotonic warping path of `(a_index, b_index)` pairs from `(0, 0)` to `(n - 1, m - 1)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlignmentPath {
    pairs: Vec<(usize, usize)>,
}

impl AlignmentPath {
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Alignment outcome produced by the DTW solver.
#[derive(Debug, Clone, PartialEq)]
pub struct DtwAlignment {
    /// Accumulated cost divided by the square root of the path length.
    pub distance: f32,
    /// Raw accumulated cost at the final cell.
    pub total_cost: f32,
    pub path: AlignmentPath,
}

/// Dynamic time warping over feature sequences with Euclidean frame cost.
///
/// Ties between predecessors are broken diagonal first, then vertical (advance `a` only),
/// then horizontal (advance `b` only). The tie-break shapes the path, never the cost.
#[derive(Debug, Clone, Default)]
pub struct AcousticAligner {
    band: Option<usize>,
}

impl AcousticAligner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DtwConfig) -> Self {
        Self { band: config.band }
    }

    pub fn align(&self, a: &FeatureSequence, b: &FeatureSequence) -> Result<DtwAlignment> {
        align_frames(a.frames().view(), b.frames().view(), self.band)
    }
}

/// Aligns two `frames x coefficients` matrices.
pub fn align_frames(
    a: ArrayView2<'_, f32>,
    b: ArrayView2<'_, f32>,
    band: Option<usize>,
) -> Result<DtwAlignment> {
    let n = a.len_of(Axis(0));
    let m = b.len_of(Axis(0));
    if n == 0 || m == 0 {
        return Err(ScoringError::EmptySequence);
    }
    let (left, right) = (a.len_of(Axis(1)), b.len_of(Axis(1)));
    if left != right {
        return Err(ScoringError::DimensionMismatch { left, right });
    }

    let window = band.map(|width| width.max(n.abs_diff(m)));
    let cost = fill_cost_matrix(a, b, window);
    let total_cost = cost[[n - 1, m - 1]];
    if !total_cost.is_finite() {
        return Err(ScoringError::MalformedFeatureSequence(
            "failed to compute finite DTW alignment cost".to_string(),
        ));
    }
    let path = backtrack(&cost);
    let distance = total_cost / (path.len() as f32).sqrt();
    Ok(DtwAlignment {
        distance,
        total_cost,
        path,
    })
}

fn fill_cost_matrix(
    a: ArrayView2<'_, f32>,
    b: ArrayView2<'_, f32>,
    window: Option<usize>,
) -> Array2<f32> {
    let n = a.len_of(Axis(0));
    let m = b.len_of(Axis(0));
    let mut cost = Array2::from_elem((n, m), f32::INFINITY);
    let in_band = |i: usize, j: usize| window.map_or(true, |w| i.abs_diff(j) <= w);

    for i in 0..n {
        for j in 0..m {
            if !in_band(i, j) {
                continue;
            }
            let local = euclidean(a.row(i), b.row(j));
            let best_previous = match (i, j) {
                (0, 0) => 0.0,
                (0, _) => cost[[0, j - 1]],
                (_, 0) => cost[[i - 1, 0]],
                _ => cost[[i - 1, j - 1]]
                    .min(cost[[i - 1, j]])
                    .min(cost[[i, j - 1]]),
            };
            cost[[i, j]] = local + best_previous;
        }
    }
    cost
}

fn backtrack(cost: &Array2<f32>) -> AlignmentPath {
    let (n, m) = cost.dim();
    let (mut i, mut j) = (n - 1, m - 1);
    let mut pairs = Vec::with_capacity(n + m);
    pairs.push((i, j));
    while i > 0 || j > 0 {
        (i, j) = match (i, j) {
            (0, _) => (0, j - 1),
            (_, 0) => (i - 1, 0),
            _ => {
                let diagonal = cost[[i - 1, j - 1]];
                let vertical = cost[[i - 1, j]];
                let horizontal = cost[[i, j - 1]];
                if diagonal <= vertical && diagonal <= horizontal {
                    (i - 1, j - 1)
                } else if vertical <= horizontal {
                    (i - 1, j)
                } else {
                    (i, j - 1)
                }
            }
        };
        pairs.push((i, j));
    }
    pairs.reverse();
    AlignmentPath { pairs }
}

fn euclidean(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum::<f32>()
        .sqrt()
}
