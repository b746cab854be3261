use std::f32::consts::PI;
use std::sync::Arc;

extern crate rustfft;
use rustfft::num_complex::Complex;
use rustfft::FFTplanner;
use rustfft::FFT;

use super::params::EstimatorParams;

/// PitchEstimator reduces one frame of samples to its dominant fundamental
/// frequency. The frame is tapered with a Hann window to suppress spectral
/// leakage, transformed with an FFT, and the loudest bin of the lower half
/// spectrum becomes the pitch candidate. The candidate is only reported when
/// its magnitude clears the configured threshold and its frequency falls
/// inside the configured band.
///
/// This is a single-pitch estimator: a harmonic that outweighs the
/// fundamental wins the peak search, so strongly resonant voices can read an
/// octave or more high.
pub struct PitchEstimator {
    params: EstimatorParams,
    window: Vec<f32>,

    fft: Arc<dyn FFT<f32>>,

    input: Vec<Complex<f32>>,
    spectrum: Vec<Complex<f32>>,
}

fn hann(i: usize, n: usize) -> f32 {
    0.5 - 0.5 * (2. * PI * i as f32 / (n as f32 - 1.)).cos()
}

impl PitchEstimator {
    pub fn new(params: EstimatorParams) -> PitchEstimator {
        let n = params.frame_size;
        let mut planner = FFTplanner::new(false);
        let fft = planner.plan_fft(n);

        let window = if n < 2 {
            vec![1f32; n]
        } else {
            (0..n).map(|i| hann(i, n)).collect()
        };

        PitchEstimator {
            params,
            window,
            fft,
            input: vec![Complex::from(0f32); n],
            spectrum: vec![Complex::from(0f32); n],
        }
    }

    /// estimate returns the dominant pitch of the frame in Hz, or None when
    /// no bin clears the magnitude threshold inside the configured band.
    /// Short frames are zero padded and longer input is truncated to
    /// frame_size samples; silence and sub-threshold noise fall through the
    /// gate to None rather than an error.
    pub fn estimate(&mut self, frame: &[f32]) -> Option<f32> {
        let n = self.params.frame_size;
        if n == 0 {
            return None;
        }

        for i in 0..n {
            let x = if i < frame.len() { frame[i] } else { 0. };
            self.input[i] = Complex::from(x * self.window[i]);
        }
        self.fft.process(&mut self.input, &mut self.spectrum);

        // Real input makes the upper half of the spectrum redundant; only
        // the first n/2 bins are searched. Ties keep the lowest bin.
        let mut peak = 0;
        let mut peak_magnitude = 0f32;
        for (i, bin) in self.spectrum[..n / 2].iter().enumerate() {
            let magnitude = bin.norm();
            if magnitude > peak_magnitude {
                peak = i;
                peak_magnitude = magnitude;
            }
        }

        let freq = peak as f32 * self.params.sample_rate as f32 / n as f32;
        if peak_magnitude > self.params.magnitude_threshold
            && freq >= self.params.min_hz
            && freq <= self.params.max_hz
        {
            Some(freq.abs())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PitchEstimator;
    use crate::params::EstimatorParams;
    use std::f32::consts::PI;

    fn sine(freq: f32, amplitude: f32, params: &EstimatorParams) -> Vec<f32> {
        (0..params.frame_size)
            .map(|i| {
                amplitude * (2. * PI * freq * i as f32 / params.sample_rate as f32).sin()
            })
            .collect()
    }

    // deterministic uniform noise in [-amplitude, amplitude)
    fn noise(amplitude: f32, len: usize, mut seed: u64) -> Vec<f32> {
        (0..len)
            .map(|_| {
                seed = seed
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                let unit = (seed >> 11) as f32 / (1u64 << 53) as f32;
                amplitude * (2. * unit - 1.)
            })
            .collect()
    }

    #[test]
    fn finds_pure_tones_within_one_bin() {
        let params = EstimatorParams::default();
        let mut estimator = PitchEstimator::new(params);
        let bin = params.bin_hz();

        for &freq in &[110., 220., 330., 440., 587.33, 880.] {
            let frame = sine(freq, 1., &params);
            let got = estimator
                .estimate(&frame)
                .unwrap_or_else(|| panic!("no pitch found for {} Hz tone", freq));
            assert!(
                (got - freq).abs() <= bin,
                "estimated {} Hz for a {} Hz tone (bin width {})",
                got,
                freq,
                bin
            );
        }
    }

    #[test]
    fn rejects_silence() {
        let params = EstimatorParams::default();
        let mut estimator = PitchEstimator::new(params);
        let frame = vec![0f32; params.frame_size];
        assert_eq!(estimator.estimate(&frame), None);
    }

    #[test]
    fn rejects_noise_below_the_threshold() {
        let params = EstimatorParams::default();
        let mut estimator = PitchEstimator::new(params);
        let frame = noise(0.001, params.frame_size, 61);
        assert_eq!(estimator.estimate(&frame), None);
    }

    #[test]
    fn rejects_tones_outside_the_band() {
        let params = EstimatorParams::default();
        let mut estimator = PitchEstimator::new(params);

        let rumble = sine(20., 1., &params);
        assert_eq!(estimator.estimate(&rumble), None);

        let whistle = sine(2000., 1., &params);
        assert_eq!(estimator.estimate(&whistle), None);
    }

    #[test]
    fn zero_length_frame_yields_none() {
        let params = EstimatorParams::default();
        let mut estimator = PitchEstimator::new(params);
        assert_eq!(estimator.estimate(&[]), None);
    }

    #[test]
    fn short_frames_are_zero_padded() {
        let params = EstimatorParams::default();
        let mut estimator = PitchEstimator::new(params);
        let frame = sine(440., 1., &params);
        let got = estimator
            .estimate(&frame[..params.frame_size / 2])
            .expect("no pitch found in half frame");
        // half the samples widens the peak but the bin should not move far
        assert!((got - 440.).abs() <= 2. * params.bin_hz());
    }
}
