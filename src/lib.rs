extern crate cpal;
extern crate serde;

pub mod errors;
pub mod estimator;
pub mod params;
pub mod session;
pub mod source;
pub mod tracker;

mod chunk;

pub use estimator::PitchEstimator;
pub use params::{CaptureParams, EstimatorParams};
pub use session::{EndReason, Session, SessionSummary};
pub use source::{Capture, FrameSource, Source};
pub use tracker::{default_voice_types, PitchRange, RangeTracker, VoiceType};
