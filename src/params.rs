use serde::{Deserialize, Serialize};

/// EstimatorParams configure the spectral pitch estimator.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
pub struct EstimatorParams {
    /// Samples per second of the incoming frames.
    pub sample_rate: u32,
    /// Samples per frame. Larger frames resolve finer pitch steps
    /// (sample_rate / frame_size Hz per bin) at the cost of latency.
    pub frame_size: usize,
    /// Lowest pitch accepted as a voice, in Hz.
    pub min_hz: f32,
    /// Highest pitch accepted as a voice, in Hz.
    pub max_hz: f32,
    /// Peaks at or below this spectral magnitude are treated as silence or
    /// noise. The cutoff is an absolute FFT magnitude, not normalized by
    /// frame energy or length, so the right value depends on how the input
    /// is scaled and on frame_size.
    pub magnitude_threshold: f32,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            frame_size: 2048,
            min_hz: 50.,
            max_hz: 1000.,
            magnitude_threshold: 1.,
        }
    }
}

impl EstimatorParams {
    /// bin_hz returns the width of one frequency bin.
    pub fn bin_hz(&self) -> f32 {
        self.sample_rate as f32 / self.frame_size as f32
    }

    /// frame_seconds returns the duration of audio covered by one frame.
    pub fn frame_seconds(&self) -> f32 {
        self.frame_size as f32 / self.sample_rate as f32
    }
}

/// CaptureParams configure the input stream behind a Capture. Samples are
/// captured as 32-bit floats.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
pub struct CaptureParams {
    /// Samples per second to request from the device.
    pub sample_rate: u32,
    /// Channels to request. Only the first channel reaches the frames.
    pub channels: u16,
    /// Samples per delivered frame.
    pub frame_size: usize,
    /// Completed frames buffered between the capture callback and the
    /// reader. When the buffer is full the newest frame is dropped and the
    /// loss is surfaced as a transient read error.
    pub queue_len: usize,
    /// How long a blocked read waits between checks for capture faults.
    pub poll_interval_ms: u64,
}

impl Default for CaptureParams {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 1,
            frame_size: 2048,
            queue_len: 8,
            poll_interval_ms: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EstimatorParams;

    #[test]
    fn bin_width_at_defaults() {
        let p = EstimatorParams::default();
        let bin = p.bin_hz();
        assert!((bin - 21.53).abs() < 0.01, "bin width was {}", bin);
        assert!((p.frame_seconds() - 0.046).abs() < 0.001);
    }
}
