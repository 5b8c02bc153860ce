//! Count-up animation for statistics counters

use std::fmt;
use std::time::Duration;
use tokio::time::{self, Instant};
use wg_core::config::parse_int_prefix;

use crate::config::CounterConfig;

/// One displayed value of a counter animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterFrame {
    /// Intermediate value, rounded up
    Progress(u64),
    /// The exact target; always the last frame
    Final(u64),
}

impl CounterFrame {
    pub fn value(&self) -> u64 {
        match self {
            CounterFrame::Progress(v) | CounterFrame::Final(v) => *v,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, CounterFrame::Final(_))
    }
}

impl fmt::Display for CounterFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_thousands(self.value()))
    }
}

/// Frames counting from zero up to a target.
///
/// Every frame adds `target / (duration / frame)`; the first frame at or past
/// the target is reported as [`CounterFrame::Final`].
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    target: u64,
    increment: f64,
    current: f64,
    frame: Duration,
    done: bool,
}

impl CounterAnimation {
    pub fn new(target: u64, duration: Duration, frame: Duration) -> Self {
        let increment = if frame.is_zero() || duration.is_zero() {
            f64::INFINITY
        } else {
            target as f64 / (duration.as_nanos() as f64 / frame.as_nanos() as f64)
        };

        Self {
            target,
            increment,
            current: 0.0,
            frame,
            done: false,
        }
    }

    pub fn from_config(target: u64, config: &CounterConfig) -> Self {
        Self::new(target, config.duration(), config.frame())
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// Emit each frame to `sink`, one frame interval apart
    pub async fn play<F>(self, mut sink: F)
    where
        F: FnMut(CounterFrame),
    {
        let period = self.frame.max(Duration::from_millis(1));
        let mut ticker = time::interval_at(Instant::now() + period, period);
        for frame in self {
            ticker.tick().await;
            sink(frame);
        }
    }
}

impl Iterator for CounterAnimation {
    type Item = CounterFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.current += self.increment;
        if self.current >= self.target as f64 {
            self.done = true;
            Some(CounterFrame::Final(self.target))
        } else {
            Some(CounterFrame::Progress(self.current.ceil() as u64))
        }
    }
}

/// Read a counter's target from its element text; negative or non-numeric text gives `None`
pub fn parse_counter_value(text: &str) -> Option<u64> {
    parse_int_prefix(text).and_then(|n| u64::try_from(n).ok())
}

/// Group digits in threes with commas
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
