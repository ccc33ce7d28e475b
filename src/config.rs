//! Generation settings coming from the outside: animate or not, and how
//! many steps to take per animation frame.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::warn;

use crate::error::MazeError;

/// Number of steps to take per animation tick, at least 1
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub struct StepsPerTick(usize);

impl StepsPerTick {
    pub const MIN: StepsPerTick = StepsPerTick(1);

    /// Returns [MazeError::InvalidRate] for zero.
    pub fn new(steps: usize) -> Result<Self, MazeError> {
        if steps == 0 {
            return Err(MazeError::InvalidRate(steps.to_string()));
        }
        Ok(Self(steps))
    }

    /// Rate from any integer, raising anything below 1 to 1
    pub fn clamped(steps: i64) -> Self {
        usize::try_from(steps)
            .ok()
            .and_then(|s| Self::new(s).ok())
            .unwrap_or(Self::MIN)
    }

    /// Rate from user input, never failing.
    ///
    /// Invalid input falls back to [Self::MIN] with a warning; negative
    /// numbers are clamped to it.
    pub fn from_input(input: &str) -> Self {
        match input.parse::<Self>() {
            Ok(rate) => rate,
            Err(err) => {
                let clamped = input.trim().parse::<i64>().map(Self::clamped);
                let rate = clamped.unwrap_or(Self::MIN);
                warn!(%err, %rate, "using clamped steps per tick");
                rate
            }
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for StepsPerTick {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for StepsPerTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StepsPerTick {
    type Err = MazeError;

    /// Strict parse: a positive decimal integer. Values too large for
    /// `usize` saturate.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<usize>() {
            Ok(steps) => Self::new(steps).map_err(|_| MazeError::InvalidRate(s.to_string())),
            Err(_) if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) => {
                Ok(Self(usize::MAX))
            }
            Err(_) => Err(MazeError::InvalidRate(s.to_string())),
        }
    }
}

/// Settings for one generation run
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct RunConfig {
    /// Generate step by step under a frame loop instead of all at once
    pub animate: bool,
    pub steps_per_tick: StepsPerTick,
}

/// Source of the steps-per-tick rate, consulted once per tick
pub trait RateSource {
    fn steps_per_tick(&self) -> StepsPerTick;
}

impl RateSource for StepsPerTick {
    fn steps_per_tick(&self) -> StepsPerTick {
        *self
    }
}

impl RateSource for RunConfig {
    fn steps_per_tick(&self) -> StepsPerTick {
        self.steps_per_tick
    }
}

impl<F> RateSource for F
where
    F: Fn() -> StepsPerTick,
{
    fn steps_per_tick(&self) -> StepsPerTick {
        self()
    }
}

/// Rate that can be changed from elsewhere while animating
///
/// Clones share the same value.
#[derive(Clone, Debug)]
pub struct LiveRate(Arc<AtomicUsize>);

impl LiveRate {
    pub fn new(rate: StepsPerTick) -> Self {
        Self(Arc::new(AtomicUsize::new(rate.get())))
    }

    pub fn set(&self, rate: StepsPerTick) {
        self.0.store(rate.get(), Ordering::Relaxed);
    }

    /// Update from raw user input, see [StepsPerTick::from_input]
    pub fn set_input(&self, input: &str) {
        self.set(StepsPerTick::from_input(input));
    }
}

impl RateSource for LiveRate {
    fn steps_per_tick(&self) -> StepsPerTick {
        // Only ever stores values from a StepsPerTick
        StepsPerTick(self.0.load(Ordering::Relaxed).max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::{LiveRate, RateSource, RunConfig, StepsPerTick};
    use crate::error::MazeError;

    #[test]
    fn zero_is_not_a_rate() {
        assert_eq!(
            StepsPerTick::new(0),
            Err(MazeError::InvalidRate("0".into()))
        );
        assert_eq!(StepsPerTick::new(3).unwrap().get(), 3);
    }

    #[test]
    fn strict_parse() {
        assert_eq!("12".parse::<StepsPerTick>().unwrap().get(), 12);
        assert_eq!(" 4 ".parse::<StepsPerTick>().unwrap().get(), 4);
        assert!("0".parse::<StepsPerTick>().is_err());
        assert!("-3".parse::<StepsPerTick>().is_err());
        assert!("".parse::<StepsPerTick>().is_err());
        assert_eq!(
            "fast".parse::<StepsPerTick>(),
            Err(MazeError::InvalidRate("fast".into()))
        );
        assert_eq!(
            "99999999999999999999999".parse::<StepsPerTick>().unwrap().get(),
            usize::MAX
        );
    }

    #[test]
    fn lenient_input_is_clamped() {
        assert_eq!(StepsPerTick::from_input("7").get(), 7);
        assert_eq!(StepsPerTick::from_input("0"), StepsPerTick::MIN);
        assert_eq!(StepsPerTick::from_input("-20"), StepsPerTick::MIN);
        assert_eq!(StepsPerTick::from_input("NaN"), StepsPerTick::MIN);
        assert_eq!(StepsPerTick::from_input(""), StepsPerTick::MIN);
    }

    #[test]
    fn clamped_raises_to_one() {
        assert_eq!(StepsPerTick::clamped(-1), StepsPerTick::MIN);
        assert_eq!(StepsPerTick::clamped(0), StepsPerTick::MIN);
        assert_eq!(StepsPerTick::clamped(25).get(), 25);
    }

    #[test]
    fn rate_sources() {
        let fixed = StepsPerTick::new(5).unwrap();
        assert_eq!(fixed.steps_per_tick(), fixed);

        let config = RunConfig {
            animate: true,
            steps_per_tick: fixed,
        };
        assert_eq!(config.steps_per_tick().get(), 5);

        let from_fn = || StepsPerTick::new(9).unwrap();
        assert_eq!(from_fn.steps_per_tick().get(), 9);
    }

    #[test]
    fn live_rate_is_shared_between_clones() {
        let rate = LiveRate::new(StepsPerTick::MIN);
        let handle = rate.clone();
        handle.set_input("30");
        assert_eq!(rate.steps_per_tick().get(), 30);
        handle.set_input("garbage");
        assert_eq!(rate.steps_per_tick(), StepsPerTick::MIN);
    }
}
