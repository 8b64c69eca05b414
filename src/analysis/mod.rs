// Analysis module - measurements of rendered tone buffers
//
// Time-domain level measurements live here; the FFT-based frequency estimate
// lives in `spectrum`.

pub mod spectrum;

pub use spectrum::SpectrumAnalyzer;

/// Largest absolute sample value (0.0 for empty input)
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0_f32, |acc, &s| acc.max(s.abs()))
}

/// Root mean square level (0.0 for empty input)
///
/// Formula: RMS = sqrt((1 / N) × Σ x[n]²)
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(peak(&[]), 0.0);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_peak_uses_magnitude() {
        assert_eq!(peak(&[0.1, -0.7, 0.5]), 0.7);
    }

    #[test]
    fn test_rms_of_square_wave() {
        let square = [0.5, -0.5, 0.5, -0.5];
        assert!((rms(&square) - 0.5).abs() < 1e-6);
    }
}
