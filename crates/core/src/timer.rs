//! Playback speed and the auto-advance timer.
//!
//! The timer runs on controller-relative virtual time. The controller owns at
//! most one [`PlaybackTimer`]; arming replaces the previous handle, so two
//! timers can never drive the same cursor.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Auto-advance period in milliseconds. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickInterval(u64);

impl TickInterval {
    /// Create a tick interval.
    ///
    /// # Errors
    /// `Error::InvalidTickInterval` if `ms` is zero.
    pub fn new(ms: u64) -> Result<Self> {
        if ms == 0 {
            return Err(Error::InvalidTickInterval(ms));
        }
        Ok(Self(ms))
    }

    pub fn as_millis(self) -> u64 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for TickInterval {
    fn default() -> Self {
        Speed::Normal.interval()
    }
}

impl fmt::Display for TickInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl FromStr for TickInterval {
    type Err = Error;

    /// Accepts a preset name or a millisecond count.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(speed) = s.parse::<Speed>() {
            return Ok(speed.interval());
        }
        let ms: u64 = s
            .strip_suffix("ms")
            .unwrap_or(s)
            .parse()
            .map_err(|_| Error::UnknownSpeed(s.to_string()))?;
        TickInterval::new(ms)
    }
}

/// Playback speed presets offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Speed {
    Fast,
    #[default]
    Normal,
    Slow,
}

impl Speed {
    pub const ALL: [Speed; 3] = [Speed::Fast, Speed::Normal, Speed::Slow];

    pub fn interval(self) -> TickInterval {
        match self {
            Speed::Fast => TickInterval(1000),
            Speed::Normal => TickInterval(2000),
            Speed::Slow => TickInterval(3000),
        }
    }

    /// Preset matching an interval exactly, if any.
    pub fn from_interval(interval: TickInterval) -> Option<Speed> {
        Speed::ALL.into_iter().find(|s| s.interval() == interval)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Speed::Fast => "fast",
            Speed::Normal => "normal",
            Speed::Slow => "slow",
        }
    }
}

impl FromStr for Speed {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Speed::Fast),
            "normal" => Ok(Speed::Normal),
            "slow" => Ok(Speed::Slow),
            _ => Err(Error::UnknownSpeed(s.to_string())),
        }
    }
}

/// An armed periodic timer.
///
/// Holds the period and the deadline of the next tick. Dropping the handle
/// cancels the timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackTimer {
    period: Duration,
    deadline: Duration,
}

impl PlaybackTimer {
    /// Arm a timer whose first tick is one period after `now`.
    pub fn arm(now: Duration, interval: TickInterval) -> Self {
        let period = interval.as_duration();
        Self {
            period,
            deadline: now + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Whether a tick is due at `now`.
    pub fn is_due(&self, now: Duration) -> bool {
        now >= self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interval_rejected() {
        assert!(matches!(
            TickInterval::new(0),
            Err(Error::InvalidTickInterval(0))
        ));
        assert_eq!(TickInterval::new(1).unwrap().as_millis(), 1);
    }

    #[test]
    fn test_presets() {
        assert_eq!(Speed::Fast.interval().as_millis(), 1000);
        assert_eq!(Speed::Normal.interval().as_millis(), 2000);
        assert_eq!(Speed::Slow.interval().as_millis(), 3000);
        assert_eq!(TickInterval::default(), Speed::Normal.interval());
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!("fast".parse::<TickInterval>().unwrap().as_millis(), 1000);
        assert_eq!("SLOW".parse::<TickInterval>().unwrap().as_millis(), 3000);
        assert_eq!("1500".parse::<TickInterval>().unwrap().as_millis(), 1500);
        assert_eq!("250ms".parse::<TickInterval>().unwrap().as_millis(), 250);
        assert!(matches!(
            "0".parse::<TickInterval>(),
            Err(Error::InvalidTickInterval(0))
        ));
        assert!(matches!(
            "warp".parse::<TickInterval>(),
            Err(Error::UnknownSpeed(_))
        ));
    }

    #[test]
    fn test_from_interval() {
        assert_eq!(Speed::from_interval(Speed::Slow.interval()), Some(Speed::Slow));
        assert_eq!(Speed::from_interval(TickInterval::new(1234).unwrap()), None);
    }

    #[test]
    fn test_timer_deadline() {
        let now = Duration::from_millis(500);
        let timer = PlaybackTimer::arm(now, Speed::Fast.interval());

        assert_eq!(timer.deadline(), Duration::from_millis(1500));
        assert!(!timer.is_due(Duration::from_millis(1499)));
        assert!(timer.is_due(Duration::from_millis(1500)));
    }
}
