// Spectrum module - dominant frequency estimation
//
// Applies a Hann window over the input to reduce spectral leakage, zero-pads
// to the next power of two, runs a forward FFT and refines the strongest bin
// with parabolic interpolation.

use rustfft::{num_complex::Complex, FftPlanner};

/// Magnitudes below this are treated as silence
const SILENCE_FLOOR: f32 = 1e-6;

/// FFT-based estimator of the strongest frequency in a mono signal
pub struct SpectrumAnalyzer {
    planner: FftPlanner<f32>,
    /// Reused between calls to avoid re-allocating for equal input sizes
    scratch: Vec<Complex<f32>>,
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
            scratch: Vec::new(),
        }
    }

    /// Compute the magnitude spectrum of `audio` (positive frequencies only)
    ///
    /// # Returns
    /// Magnitude spectrum of size `fft_size / 2 + 1`, where `fft_size` is
    /// `audio.len()` rounded up to a power of two
    pub fn magnitude_spectrum(&mut self, audio: &[f32]) -> Vec<f32> {
        if audio.is_empty() {
            return Vec::new();
        }

        let n = audio.len();
        let fft_size = n.next_power_of_two();
        let denom = (n.max(2) - 1) as f32;

        self.scratch.clear();
        self.scratch.extend(audio.iter().enumerate().map(|(i, &sample)| {
            let window = 0.5 * (1.0 - ((2.0 * std::f32::consts::PI * i as f32) / denom).cos());
            Complex::new(sample * window, 0.0)
        }));
        self.scratch.resize(fft_size, Complex::new(0.0, 0.0));

        let fft = self.planner.plan_fft_forward(fft_size);
        fft.process(&mut self.scratch);

        self.scratch[..fft_size / 2 + 1]
            .iter()
            .map(|c| c.norm())
            .collect()
    }

    /// Estimate the dominant frequency of `audio` in Hz
    ///
    /// DC (bin 0) is ignored. Returns `None` for inputs shorter than two
    /// samples, a zero sample rate, or silence.
    pub fn dominant_frequency(&mut self, audio: &[f32], sample_rate_hz: u32) -> Option<f32> {
        if audio.len() < 2 || sample_rate_hz == 0 {
            return None;
        }

        let spectrum = self.magnitude_spectrum(audio);
        let fft_size = audio.len().next_power_of_two();

        let (bin, &magnitude) = spectrum
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))?;

        if magnitude < SILENCE_FLOOR {
            return None;
        }

        let offset = if bin + 1 < spectrum.len() {
            let (a, b, c) = (spectrum[bin - 1], magnitude, spectrum[bin + 1]);
            let denom = a - 2.0 * b + c;
            if denom.abs() > f32::EPSILON {
                0.5 * (a - c) / denom
            } else {
                0.0
            }
        } else {
            0.0
        };

        let bin_width = sample_rate_hz as f32 / fft_size as f32;
        Some((bin as f32 + offset) * bin_width)
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
