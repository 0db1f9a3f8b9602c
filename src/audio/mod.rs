pub mod decoder;
pub mod resample;

pub use decoder::{AudioDecoder, SymphoniaDecoder};

use crate::pronunciation::{Result, ScoringError};
use crate::types::{AudioRole, AudioSignal, TARGET_SAMPLE_RATE};

/// Brings a decoded signal to the engine's canonical form: 16 kHz, peak within [-1, 1].
pub fn prepare_signal(signal: AudioSignal, role: AudioRole) -> Result<AudioSignal> {
    if signal.is_empty() {
        return Err(ScoringError::EmptyAudio(role));
    }
    let samples = if signal.sample_rate == TARGET_SAMPLE_RATE {
        signal.samples
    } else {
        resample::linear_resample(&signal.samples, signal.sample_rate, TARGET_SAMPLE_RATE)?
    };
    let mut prepared = AudioSignal::new(samples, TARGET_SAMPLE_RATE);
    normalize_peak(&mut prepared);
    Ok(prepared)
}

/// Scales the signal down when any sample leaves [-1, 1]; quieter signals are untouched.
pub fn normalize_peak(signal: &mut AudioSignal) {
    let peak = signal.peak();
    if peak > 1.0 && peak.is_finite() {
        signal.samples.iter_mut().for_each(|sample| *sample /= peak);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_signal_is_rejected_with_role() {
        let err = prepare_signal(AudioSignal::new(Vec::new(), 44_100), AudioRole::Reference)
            .unwrap_err();
        assert!(matches!(err, ScoringError::EmptyAudio(AudioRole::Reference)));
    }

    #[test]
    fn loud_signal_is_scaled_into_unit_range() {
        let prepared = prepare_signal(
            AudioSignal::new(vec![0.5, -4.0, 2.0], TARGET_SAMPLE_RATE),
            AudioRole::User,
        )
        .unwrap();
        assert!((prepared.peak() - 1.0).abs() < 1e-6);
        assert!((prepared.samples[0] - 0.125).abs() < 1e-6);
    }

    #[test]
    fn signal_is_resampled_to_target_rate() {
        let prepared =
            prepare_signal(AudioSignal::new(vec![0.2; 4_800], 48_000), AudioRole::User).unwrap();
        assert_eq!(prepared.sample_rate, TARGET_SAMPLE_RATE);
        assert_eq!(prepared.samples.len(), 1_600);
    }
}
