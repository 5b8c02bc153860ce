//! Event countdown

use std::fmt;
use std::time::Duration;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::debug;

use crate::{Result, WidgetError};

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Time left before an event, split for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeRemaining {
    fn from_millis(distance: i64) -> Self {
        Self {
            days: distance / MS_PER_DAY,
            hours: (distance % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (distance % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (distance % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }

    /// Days, hours, minutes and seconds, each zero-padded to two digits
    pub fn padded(&self) -> [String; 4] {
        [self.days, self.hours, self.minutes, self.seconds].map(|n| format!("{n:02}"))
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [d, h, m, s] = self.padded();
        write!(f, "{d}d {h}h {m}m {s}s")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStatus {
    Pending(TimeRemaining),
    Started,
}

impl CountdownStatus {
    pub fn is_started(&self) -> bool {
        matches!(self, CountdownStatus::Started)
    }
}

impl fmt::Display for CountdownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountdownStatus::Pending(remaining) => write!(f, "{remaining}"),
            CountdownStatus::Started => f.write_str("Event started!"),
        }
    }
}

/// Countdown to an event's start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    starts_at: DateTime<Utc>,
}

impl Countdown {
    pub fn new(starts_at: DateTime<Utc>) -> Self {
        Self { starts_at }
    }

    /// Parse an RFC 3339 timestamp, or a zone-less `YYYY-MM-DDTHH:MM:SS` taken as UTC
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self::new(dt.with_timezone(&Utc)));
        }

        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
            .map(|naive| Self::new(Utc.from_utc_datetime(&naive)))
            .map_err(|_| WidgetError::InvalidTimestamp(value.to_string()))
    }

    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> CountdownStatus {
        let distance = (self.starts_at - now).num_milliseconds();
        if distance < 0 {
            CountdownStatus::Started
        } else {
            CountdownStatus::Pending(TimeRemaining::from_millis(distance))
        }
    }

    pub fn status(&self) -> CountdownStatus {
        self.status_at(Utc::now())
    }

    /// Report the status now and then every second, stopping once the event has started
    pub fn spawn_ticker<F>(self, runtime: &Handle, mut sink: F) -> JoinHandle<()>
    where
        F: FnMut(CountdownStatus) + Send + 'static,
    {
        runtime.spawn(async move {
            let mut ticker = time::interval(Duration::from_secs(1));
            loop {
                ticker.tick().await;
                let status = self.status();
                let started = status.is_started();
                sink(status);
                if started {
                    debug!(starts_at = %self.starts_at, "countdown finished");
                    break;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn at(value: &str) -> DateTime<Utc> {
        Countdown::parse(value).unwrap().starts_at()
    }

    #[test]
    fn test_breakdown() {
        let countdown = Countdown::parse("2026-10-20T12:00:00Z").unwrap();
        let status = countdown.status_at(at("2026-10-18T09:30:15Z"));
        assert_eq!(
            status,
            CountdownStatus::Pending(TimeRemaining { days: 2, hours: 2, minutes: 29, seconds: 45 })
        );
        assert_eq!(status.to_string(), "02d 02h 29m 45s");
    }

    #[test]
    fn test_started() {
        let countdown = Countdown::parse("2026-10-20T12:00:00+02:00").unwrap();
        assert_eq!(countdown.status_at(at("2026-10-20T10:00:01Z")), CountdownStatus::Started);
        assert_eq!(CountdownStatus::Started.to_string(), "Event started!");

        // exactly at the start the countdown still reads zero
        let zero = countdown.status_at(at("2026-10-20T10:00:00Z"));
        assert_eq!(zero.to_string(), "00d 00h 00m 00s");
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(
            Countdown::parse("2026-03-01T08:00:00").unwrap().starts_at(),
            at("2026-03-01T08:00:00Z")
        );
        assert!(matches!(
            Countdown::parse("next tuesday"),
            Err(WidgetError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_long_countdowns_keep_all_days() {
        let countdown = Countdown::parse("2027-01-01T00:00:00Z").unwrap();
        let status = countdown.status_at(at("2026-01-01T00:00:00Z"));
        assert_eq!(status.to_string(), "365d 00h 00m 00s");
    }

    #[tokio::test]
    async fn test_ticker_stops_after_start() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let countdown = Countdown::new(Utc::now() - chrono::Duration::seconds(5));

        countdown
            .spawn_ticker(&Handle::current(), move |status| sink.lock().push(status))
            .await
            .unwrap();

        assert_eq!(*seen.lock(), vec![CountdownStatus::Started]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_refreshes_every_second() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let countdown = Countdown::new(Utc::now() + chrono::Duration::days(3));

        let task = countdown.spawn_ticker(&Handle::current(), move |status| sink.lock().push(status));
        time::sleep(Duration::from_millis(2500)).await;
        task.abort();

        let seen = seen.lock();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|status| !status.is_started()));
    }
}
