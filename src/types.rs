//! Core types shared by the audio front-end and the scoring engine

use std::fmt::{Display, Formatter};

/// Sample rate every signal is brought to before feature extraction.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Mono PCM audio ready for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    /// Audio samples, normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz (always `TARGET_SAMPLE_RATE` once prepared)
    pub sample_rate: u32,
}

impl AudioSignal {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute amplitude in the signal.
    pub fn peak(&self) -> f32 {
        self.samples
            .iter()
            .fold(0.0_f32, |peak, sample| peak.max(sample.abs()))
    }
}

/// Which side of a comparison an audio buffer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioRole {
    User,
    Reference,
}

impl Display for AudioRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioRole::User => write!(f, "user"),
            AudioRole::Reference => write!(f, "reference"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_tracks_largest_magnitude() {
        let signal = AudioSignal::new(vec![0.1, -0.7, 0.4], TARGET_SAMPLE_RATE);
        assert!((signal.peak() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn duration_uses_sample_rate() {
        let signal = AudioSignal::new(vec![0.0; 8_000], TARGET_SAMPLE_RATE);
        assert!((signal.duration_secs() - 0.5).abs() < 1e-9);
        assert_eq!(AudioSignal::new(vec![0.0; 10], 0).duration_secs(), 0.0);
    }
}
