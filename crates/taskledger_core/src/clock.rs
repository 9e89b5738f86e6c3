use crate::error::AppError;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Source of "now" for id generation and history timestamps.
pub trait Clock {
    fn now(&self) -> OffsetDateTime;

    fn timestamp(&self) -> String {
        format_timestamp(self.now())
    }

    fn unix_millis(&self) -> u64 {
        let millis = self.now().unix_timestamp_nanos() / 1_000_000;
        u64::try_from(millis).unwrap_or(0)
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

pub fn format_timestamp(at: OffsetDateTime) -> String {
    match at.format(&Rfc3339) {
        Ok(formatted) => formatted,
        Err(err) => {
            // Only reachable for years outside 0..=9999.
            tracing::warn!(error = %err, "timestamp outside RFC3339 range");
            at.unix_timestamp().to_string()
        }
    }
}

pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, AppError> {
    OffsetDateTime::parse(raw.trim(), &Rfc3339)
        .map_err(|_| AppError::invalid_data("timestamp must be RFC3339"))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Clock;
    use std::cell::Cell;
    use time::{Duration, OffsetDateTime};

    /// Clock that starts at a fixed instant and advances one second per read.
    pub struct SteppingClock {
        next: Cell<OffsetDateTime>,
    }

    impl SteppingClock {
        pub fn starting_at(start: OffsetDateTime) -> Self {
            Self {
                next: Cell::new(start),
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> OffsetDateTime {
            let current = self.next.get();
            self.next.set(current + Duration::seconds(1));
            current
        }
    }

    /// Clock frozen at one instant.
    pub struct FrozenClock(pub OffsetDateTime);

    impl Clock for FrozenClock {
        fn now(&self) -> OffsetDateTime {
            self.0
        }
    }
}
