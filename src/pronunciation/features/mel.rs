use aus::analysis;
use aus::analysis::mel::MelFilterbank;
use aus::spectrum;
use aus::WindowType;

use crate::audio::resample;
use crate::pronunciation::{Result, ScoringError};
use crate::types::{AudioSignal, TARGET_SAMPLE_RATE};

pub const WINDOW_MS: usize = 25;
pub const HOP_MS: usize = 10;
pub const MEL_BANDS: usize = 80;
const MIN_FREQ: f64 = 20.0;
const POWER_FLOOR: f64 = 1e-10;

/// Mel power spectrogram, one row per 10 ms frame.
pub(crate) fn compute_mel_spectrogram(signal: &AudioSignal) -> Result<Vec<Vec<f64>>> {
    let mono = ensure_sample_rate(signal)?;
    let fft_size = frame_length_samples();
    let hop_size = ((TARGET_SAMPLE_RATE as usize * HOP_MS) / 1000).max(1);

    let mut audio_f64: Vec<f64> = mono.iter().map(|&s| s as f64).collect();
    if audio_f64.len() < fft_size {
        audio_f64.resize(fft_size, 0.0);
    }

    let stft = spectrum::rstft(&audio_f64, fft_size, hop_size, WindowType::Hanning);
    let (magnitude, _) = spectrum::complex_to_polar_rstft(&stft);
    let power = analysis::make_power_spectrogram(&magnitude);

    let freqs = spectrum::rfftfreq(fft_size, TARGET_SAMPLE_RATE);
    let filterbank = MelFilterbank::new(
        MIN_FREQ,
        (TARGET_SAMPLE_RATE as f64) / 2.0,
        MEL_BANDS,
        &freqs,
        true,
    );
    let mut mel = analysis::mel::make_mel_spectrogram(&power, &filterbank);
    for frame in mel.iter_mut() {
        for value in frame.iter_mut() {
            *value = value.max(POWER_FLOOR);
        }
    }
    Ok(mel)
}

pub(crate) fn frame_length_samples() -> usize {
    ((TARGET_SAMPLE_RATE as usize * WINDOW_MS) / 1000).max(1)
}

fn ensure_sample_rate(signal: &AudioSignal) -> Result<Vec<f32>> {
    if signal.sample_rate == TARGET_SAMPLE_RATE {
        Ok(signal.samples.clone())
    } else {
        resample::linear_resample(&signal.samples, signal.sample_rate, TARGET_SAMPLE_RATE).map_err(
            |err| {
                ScoringError::MalformedFeatureSequence(format!(
                    "failed to resample audio from {} Hz to {} Hz: {err}",
                    signal.sample_rate, TARGET_SAMPLE_RATE
                ))
            },
        )
    }
}
