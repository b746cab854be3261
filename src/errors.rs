use std::error::Error;
use std::fmt;

/// DeviceError is returned when the audio device cannot be opened,
/// configured, or enumerated.
#[derive(Debug)]
pub struct DeviceError(pub String, pub Option<Box<dyn Error + Send + Sync>>);

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.1 {
            Some(e) => write!(f, "Audio Device Error: {}: {}", self.0, e),
            None => write!(f, "Audio Device Error: {}", self.0),
        }
    }
}

impl Error for DeviceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.1 {
            Some(e) => Some(&**e),
            None => None,
        }
    }
}

/// ReadError is returned when reading the next frame from a source fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// A single frame was lost to a capture fault. Later reads may succeed.
    Transient(String),
    /// The source is closed and will never yield another frame.
    Closed,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Transient(msg) => write!(f, "transient read error: {}", msg),
            ReadError::Closed => write!(f, "audio source is closed"),
        }
    }
}

impl Error for ReadError {}

#[cfg(test)]
mod tests {
    use super::{DeviceError, ReadError};
    use std::error::Error;

    #[test]
    fn device_error_preserves_its_source() {
        let cause = "stream disconnected".parse::<u32>().unwrap_err();
        let err = DeviceError("could not build stream".to_owned(), Some(Box::new(cause)));
        assert!(err.source().is_some());
        let text = format!("{}", err);
        assert!(text.starts_with("Audio Device Error: could not build stream"));

        let bare = DeviceError("no default input".to_owned(), None);
        assert!(bare.source().is_none());
        assert_eq!(format!("{}", bare), "Audio Device Error: no default input");
    }

    #[test]
    fn read_error_display() {
        let e = ReadError::Transient("capture overrun".to_owned());
        assert_eq!(format!("{}", e), "transient read error: capture overrun");
        assert_eq!(format!("{}", ReadError::Closed), "audio source is closed");
    }
}
