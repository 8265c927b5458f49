//! Scripted presence sensor.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use roomwatch_app::ports::SampleSource;
use roomwatch_domain::error::RoomwatchError;

/// Errors raised while parsing a [`PresencePattern`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("presence pattern is empty")]
    Empty,

    #[error("invalid pattern segment `{0}`, expected `present:<secs>` or `absent:<secs>`")]
    Segment(String),

    #[error("pattern segment `{0}` has a zero duration")]
    ZeroDuration(String),

    #[error("presence pattern cycle is too long")]
    TooLong,
}

/// Looping sequence of `(present, duration)` segments.
///
/// Written as `present:30,absent:30`; the pattern repeats forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresencePattern {
    segments: Vec<(bool, Duration)>,
    cycle: Duration,
}

impl PresencePattern {
    /// Total length of one loop.
    #[must_use]
    pub fn cycle(&self) -> Duration {
        self.cycle
    }

    /// Presence at `elapsed` since the pattern started.
    #[must_use]
    pub fn at(&self, elapsed: Duration) -> bool {
        let cycle = self.cycle.as_millis();
        let mut offset = elapsed.as_millis() % cycle;
        for (present, length) in &self.segments {
            let length = length.as_millis();
            if offset < length {
                return *present;
            }
            offset -= length;
        }
        // unreachable while cycle is the sum of segment lengths
        false
    }
}

impl Default for PresencePattern {
    fn default() -> Self {
        let segments = vec![
            (true, Duration::from_secs(30)),
            (false, Duration::from_secs(30)),
        ];
        Self {
            cycle: Duration::from_secs(60),
            segments,
        }
    }
}

impl FromStr for PresencePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        for raw in s.split(',').map(str::trim).filter(|raw| !raw.is_empty()) {
            let (state, secs) = raw
                .split_once(':')
                .ok_or_else(|| PatternError::Segment(raw.to_string()))?;
            let present = match state.trim() {
                "present" => true,
                "absent" => false,
                _ => return Err(PatternError::Segment(raw.to_string())),
            };
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| PatternError::Segment(raw.to_string()))?;
            if secs == 0 {
                return Err(PatternError::ZeroDuration(raw.to_string()));
            }
            segments.push((present, Duration::from_secs(secs)));
        }
        if segments.is_empty() {
            return Err(PatternError::Empty);
        }
        let cycle = segments
            .iter()
            .try_fold(Duration::ZERO, |total, (_, length)| total.checked_add(*length))
            .ok_or(PatternError::TooLong)?;
        Ok(Self { segments, cycle })
    }
}

impl fmt::Display for PresencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (present, length)) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            let state = if *present { "present" } else { "absent" };
            write!(f, "{state}:{}", length.as_secs())?;
        }
        Ok(())
    }
}

/// [`SampleSource`] that replays a [`PresencePattern`] against the wall clock.
#[derive(Debug)]
pub struct VirtualPresenceSensor {
    pattern: PresencePattern,
    started: Instant,
    samples: u64,
}

impl VirtualPresenceSensor {
    /// Start replaying `pattern` now.
    #[must_use]
    pub fn new(pattern: PresencePattern) -> Self {
        tracing::info!(%pattern, "virtual presence sensor ready");
        Self {
            pattern,
            started: Instant::now(),
            samples: 0,
        }
    }

    /// Number of samples served so far.
    #[must_use]
    pub fn samples(&self) -> u64 {
        self.samples
    }
}

impl SampleSource for VirtualPresenceSensor {
    fn sample(&mut self) -> Result<bool, RoomwatchError> {
        self.samples += 1;
        Ok(self.pattern.at(self.started.elapsed()))
    }
}
