use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::errors::ReadError;
use super::estimator::PitchEstimator;
use super::params::EstimatorParams;
use super::source::FrameSource;
use super::tracker::{PitchRange, RangeTracker, VoiceType};

/// EndReason records why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The cancel token was set between frames.
    Cancelled,
    /// The source closed and will yield no more frames.
    SourceClosed,
}

/// SessionSummary is the end-of-session report, produced exactly once per
/// run on every exit path.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    /// Lowest to highest pitch observed, or None for an empty session.
    pub range: Option<PitchRange>,
    /// Joined labels of every matching voice type, or "Unknown".
    pub voice_type: String,
    /// Frames read and estimated.
    pub frames: usize,
    /// Frames lost to transient read faults.
    pub dropped: usize,
    /// Accepted pitch observations.
    pub observations: usize,
    pub end: EndReason,
}

/// Session owns one run of the pipeline. It pulls frames from a source,
/// estimates a pitch per frame, and folds accepted estimates into the
/// tracked range until it is cancelled or the source closes.
pub struct Session {
    estimator: PitchEstimator,
    tracker: RangeTracker,
    voice_types: Vec<VoiceType>,
    cancel: Arc<AtomicBool>,
}

impl Session {
    pub fn new(params: EstimatorParams, voice_types: Vec<VoiceType>) -> Session {
        Session {
            estimator: PitchEstimator::new(params),
            tracker: RangeTracker::new(),
            voice_types,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// cancel_token returns the flag that stops the run loop. It is checked
    /// between frame reads, so the frame in flight still completes.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// tracker exposes the running range for queries at any time.
    pub fn tracker(&self) -> &RangeTracker {
        &self.tracker
    }

    /// run consumes frames until cancellation or the source closes and
    /// returns the summary. After each accepted observation, report is
    /// called with the pitch and the range so far. Transient read errors
    /// skip the lost frame without touching the tracked range. The source
    /// is dropped, releasing whatever device backs it, before the summary
    /// is built.
    pub fn run<S, F>(&mut self, mut source: S, mut report: F) -> SessionSummary
    where
        S: FrameSource,
        F: FnMut(f32, PitchRange),
    {
        let mut frames = 0;
        let mut dropped = 0;
        let mut observations = 0;

        let end = loop {
            if self.cancel.load(Ordering::SeqCst) {
                break EndReason::Cancelled;
            }
            let frame = match source.read_frame() {
                Ok(frame) => frame,
                Err(ReadError::Transient(_)) => {
                    dropped += 1;
                    continue;
                }
                Err(ReadError::Closed) => break EndReason::SourceClosed,
            };

            frames += 1;
            let observation = self.estimator.estimate(&frame);
            self.tracker.observe(observation);
            if let (Some(pitch), Some(range)) = (observation, self.tracker.current_range()) {
                observations += 1;
                report(pitch, range);
            }
        };

        drop(source);

        SessionSummary {
            range: self.tracker.current_range(),
            voice_type: self.tracker.classify(&self.voice_types),
            frames,
            dropped,
            observations,
            end,
        }
    }
}
