use std::fmt::{self, Display};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local, TimeZone, Utc};
use tracing::{debug, warn};

use crate::error::TimeQueryError;
use crate::totp::TIME_STEP;

pub trait GetTime {
    fn get_now(&self) -> SystemTime;
}

/// A network source of the current time.
pub trait QueryTime {
    fn query_time(&self) -> Result<SystemTime, TimeQueryError>;
}

/// The computer's wall clock.
pub struct Clock {}

impl Clock {
    pub fn new() -> Self {
        Clock {}
    }
}

impl GetTime for Clock {
    fn get_now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOrigin {
    Ntp,
    Computer,
}

impl Display for TimeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeOrigin::Ntp => write!(f, "NTP"),
            TimeOrigin::Computer => write!(f, "computer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTime {
    pub instant: SystemTime,
    pub origin: TimeOrigin,
}

impl ResolvedTime {
    /// Whole seconds since the Unix epoch, negative before it.
    pub fn unix_seconds(&self) -> i64 {
        match self.instant.duration_since(UNIX_EPOCH) {
            Ok(after) => after.as_secs() as i64,
            Err(before) => {
                let before = before.duration();
                let seconds = -(before.as_secs() as i64);
                if before.subsec_nanos() > 0 {
                    seconds - 1
                } else {
                    seconds
                }
            }
        }
    }

    fn subsec_nanos(&self) -> u32 {
        match self.instant.duration_since(UNIX_EPOCH) {
            Ok(after) => after.subsec_nanos(),
            Err(before) => match before.duration().subsec_nanos() {
                0 => 0,
                nanos => 1_000_000_000 - nanos,
            },
        }
    }

    /// The instant on the local calendar, or `None` past the calendar's range.
    pub fn local_time(&self) -> Option<DateTime<Local>> {
        let seconds = self.unix_seconds();
        if !on_calendar(seconds) {
            return None;
        }

        Local.timestamp_opt(seconds, self.subsec_nanos()).single()
    }
}

// A day of margin so any local offset stays on the calendar too.
fn on_calendar(unix_seconds: i64) -> bool {
    const MARGIN: i64 = 86_400;
    let first = DateTime::<Utc>::MIN_UTC.timestamp() + MARGIN;
    let last = DateTime::<Utc>::MAX_UTC.timestamp() - MARGIN;

    (first..=last).contains(&unix_seconds)
}

pub struct TimeSource<C, N> {
    clock: C,
    network: N,
}

impl<C, N> TimeSource<C, N>
where
    C: GetTime,
    N: QueryTime,
{
    pub fn new(clock: C, network: N) -> Self {
        TimeSource { clock, network }
    }

    /// Resolves the current time, then shifts it by `drift_steps` windows.
    ///
    /// A failed network query falls back to the computer clock.
    pub fn now(&self, use_network: bool, drift_steps: i64) -> ResolvedTime {
        let base = if use_network {
            match self.network.query_time() {
                Ok(instant) => ResolvedTime {
                    instant,
                    origin: TimeOrigin::Ntp,
                },
                Err(err) => {
                    warn!(error = %err, "network time unavailable, using computer clock");
                    self.computer_time()
                }
            }
        } else {
            self.computer_time()
        };

        apply_drift(base, drift_steps)
    }

    fn computer_time(&self) -> ResolvedTime {
        ResolvedTime {
            instant: self.clock.get_now(),
            origin: TimeOrigin::Computer,
        }
    }
}

fn apply_drift(time: ResolvedTime, drift_steps: i64) -> ResolvedTime {
    if drift_steps == 0 {
        return time;
    }

    let shift = Duration::from_secs(drift_steps.unsigned_abs().saturating_mul(TIME_STEP as u64));
    let shifted = if drift_steps > 0 {
        time.instant.checked_add(shift)
    } else {
        time.instant.checked_sub(shift)
    };

    let shifted = shifted
        .map(|instant| ResolvedTime { instant, ..time })
        .filter(|shifted| on_calendar(shifted.unix_seconds()));

    match shifted {
        Some(shifted) => {
            debug!(drift_steps, "applied drift");
            shifted
        }
        None => {
            warn!(drift_steps, "drift is out of range, ignoring it");
            time
        }
    }
}
