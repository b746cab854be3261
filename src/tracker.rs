use serde::{Deserialize, Serialize};

/// PitchRange is an inclusive band of frequencies in Hz.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
pub struct PitchRange {
    pub low: f32,
    pub high: f32,
}

impl PitchRange {
    pub const fn new(low: f32, high: f32) -> PitchRange {
        PitchRange { low, high }
    }

    /// contains reports whether other lies entirely inside this band.
    pub fn contains(&self, other: &PitchRange) -> bool {
        other.low >= self.low && other.high <= self.high
    }
}

/// VoiceType names a pitch band, e.g. "Bass" over 80-330 Hz.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VoiceType {
    pub label: String,
    pub range: PitchRange,
}

impl VoiceType {
    pub fn new(label: &str, low: f32, high: f32) -> VoiceType {
        VoiceType {
            label: label.to_owned(),
            range: PitchRange::new(low, high),
        }
    }
}

/// default_voice_types returns the classic male voice-type bands.
pub fn default_voice_types() -> Vec<VoiceType> {
    vec![
        VoiceType::new("Bass", 80., 330.),
        VoiceType::new("Baritone", 100., 400.),
        VoiceType::new("Tenor", 130., 500.),
    ]
}

/// RangeTracker folds a stream of pitch observations into the lowest and
/// highest pitch seen so far. The range only ever widens; a fresh tracker
/// reports no range at all until the first valid observation.
#[derive(Clone, Debug, Default)]
pub struct RangeTracker {
    range: Option<PitchRange>,
}

impl RangeTracker {
    pub fn new() -> RangeTracker {
        RangeTracker { range: None }
    }

    /// observe widens the tracked range to cover the pitch. Empty
    /// observations and non-positive values leave the tracker untouched.
    pub fn observe(&mut self, observation: Option<f32>) {
        let pitch = match observation {
            Some(p) if p > 0. && p.is_finite() => p,
            _ => return,
        };
        match self.range.as_mut() {
            Some(range) => {
                if pitch < range.low {
                    range.low = pitch;
                }
                if pitch > range.high {
                    range.high = pitch;
                }
            }
            None => self.range = Some(PitchRange::new(pitch, pitch)),
        }
    }

    /// current_range returns the observed range, or None while no valid
    /// observation has been made.
    pub fn current_range(&self) -> Option<PitchRange> {
        self.range
    }

    /// matches returns every voice type whose band covers the whole
    /// observed range.
    pub fn matches<'a>(&self, table: &'a [VoiceType]) -> Vec<&'a VoiceType> {
        match self.range {
            Some(range) => table.iter().filter(|t| t.range.contains(&range)).collect(),
            None => Vec::new(),
        }
    }

    /// classify joins the labels of all matching voice types, e.g.
    /// "Bass or Baritone". It returns "Unknown" when the tracker is empty
    /// or no band covers the range.
    pub fn classify(&self, table: &[VoiceType]) -> String {
        let matches = self.matches(table);
        if matches.is_empty() {
            "Unknown".to_owned()
        } else {
            matches
                .iter()
                .map(|t| t.label.as_str())
                .collect::<Vec<_>>()
                .join(" or ")
        }
    }
}
