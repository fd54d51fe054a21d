//! # Spectrum Module
//!
//! Holds one magnitude spectrum snapshot from the external analyser and
//! looks up the loudness nearest a target frequency.
//!
//! Bins are linearly spaced from 0 Hz up to the Nyquist frequency, with a
//! bin width of `(sample_rate / 2) / len`. Lookup is nearest-bin only, with
//! no interpolation, so the mapping stays deterministic.

use std::sync::Arc;

/// Analyser FFT size the engine is tuned for. Yields 1024 bins.
pub const DEFAULT_FFT_SIZE: usize = 2048;

/// An immutable snapshot of decibel samples, index 0 = 0 Hz.
///
/// Samples may be `-inf` where the analyser reported silence. The data is
/// shared behind an `Arc` so a snapshot can be handed to a worker thread
/// without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeSpectrum {
    sample_rate_hz: f32,
    decibels: Arc<[f32]>,
}

impl MagnitudeSpectrum {
    pub fn new(sample_rate_hz: f32, decibels: impl Into<Arc<[f32]>>) -> Self {
        Self {
            sample_rate_hz,
            decibels: decibels.into(),
        }
    }

    /// Builds a spectrum from linear amplitudes using `20 * log10(a)`.
    ///
    /// A zero amplitude maps to `-inf` explicitly rather than through the
    /// behavior of `log10(0)`.
    pub fn from_magnitudes(sample_rate_hz: f32, magnitudes: &[f32]) -> Self {
        let decibels: Vec<f32> = magnitudes
            .iter()
            .map(|&m| if m > 0.0 { 20.0 * m.log10() } else { f32::NEG_INFINITY })
            .collect();
        Self::new(sample_rate_hz, decibels)
    }

    pub fn sample_rate_hz(&self) -> f32 {
        self.sample_rate_hz
    }

    pub fn decibels(&self) -> &[f32] {
        &self.decibels
    }

    pub fn len(&self) -> usize {
        self.decibels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decibels.is_empty()
    }

    pub fn nyquist_hz(&self) -> f32 {
        self.sample_rate_hz / 2.0
    }

    /// Frequency span of one bin. Infinite for an empty spectrum.
    pub fn bin_width_hz(&self) -> f32 {
        bin_width(self.sample_rate_hz, self.decibels.len())
    }

    /// Decibel value of the bin nearest `frequency_hz`.
    pub fn sample(&self, frequency_hz: f32) -> f32 {
        sample_strength(&self.decibels, self.sample_rate_hz, frequency_hz)
    }
}

fn bin_width(sample_rate_hz: f32, len: usize) -> f32 {
    (sample_rate_hz / 2.0) / len as f32
}

/// Returns the decibel value of the bin nearest `target_frequency_hz`.
///
/// A target below 0 Hz or past the last bin resolves to `-inf` (silence).
/// Otherwise the bin value is returned verbatim, including `-inf` and 0 dB.
///
/// # Arguments
/// * `spectrum` - Decibel samples from 0 Hz to Nyquist
/// * `sample_rate_hz` - Sample rate the spectrum was computed at
/// * `target_frequency_hz` - Frequency to look up
pub fn sample_strength(spectrum: &[f32], sample_rate_hz: f32, target_frequency_hz: f32) -> f32 {
    if spectrum.is_empty() || target_frequency_hz.is_nan() || target_frequency_hz < 0.0 {
        return f32::NEG_INFINITY;
    }
    let position = (target_frequency_hz / bin_width(sample_rate_hz, spectrum.len())).round();
    if !position.is_finite() || position >= spectrum.len() as f32 {
        return f32::NEG_INFINITY;
    }
    spectrum[position as usize]
}
