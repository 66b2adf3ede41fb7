//! Event log for front ends.
//!
//! A ring buffer of short lines (key presses, task passes) that the simulator
//! prints under each rendered frame. Nothing in the core writes to it.
//!
//! ```ignore
//! let mut log = EventLog::new();
//! log.push("S1 pressed");
//! for line in log.iter() {
//!     println!("{}", line);
//! }
//! ```

use heapless::{Deque, String};

/// Lines kept before the oldest is dropped.
pub const EVENT_LOG_CAPACITY: usize = 8;

/// Maximum bytes per line, including room for truncation.
pub const EVENT_LINE_LENGTH: usize = 40;

pub type EventLine = String<EVENT_LINE_LENGTH>;

pub struct EventLog {
    lines: Deque<EventLine, EVENT_LOG_CAPACITY>,
    /// Lines pushed since creation, including dropped ones.
    pushed: u32,
}

impl EventLog {
    pub const fn new() -> Self {
        Self {
            lines: Deque::new(),
            pushed: 0,
        }
    }

    /// Append a line, dropping the oldest when full. Long lines are cut.
    pub fn push(
        &mut self,
        msg: &str,
    ) {
        if self.lines.is_full() {
            self.lines.pop_front();
        }

        let mut line = EventLine::new();
        for c in msg.chars() {
            if line.push(c).is_err() {
                break;
            }
        }
        self.lines.push_back(line).ok();
        self.pushed = self.pushed.wrapping_add(1);
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> { self.lines.iter().map(EventLine::as_str) }

    /// Lines pushed after the first `seen` pushes that are still buffered.
    pub fn since(
        &self,
        seen: u32,
    ) -> impl Iterator<Item = &str> {
        let fresh = (self.pushed.wrapping_sub(seen) as usize).min(self.lines.len());
        self.iter().skip(self.lines.len() - fresh)
    }

    /// Total pushes, dropped lines included.
    #[inline]
    pub const fn pushed(&self) -> u32 { self.pushed }

    #[inline]
    pub fn len(&self) -> usize { self.lines.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
}

impl Default for EventLog {
    fn default() -> Self { Self::new() }
}

/// Append a decimal `u32` without going through `core::fmt`.
pub fn push_u32<const N: usize>(
    s: &mut String<N>,
    mut val: u32,
) {
    if val == 0 {
        s.push('0').ok();
        return;
    }

    let mut digits = [0u8; 10];
    let mut i = 0;
    while val > 0 {
        digits[i] = (val % 10) as u8;
        val /= 10;
        i += 1;
    }
    while i > 0 {
        i -= 1;
        s.push((b'0' + digits[i]) as char).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_drops_oldest() {
        let mut log = EventLog::new();
        for i in 0..=EVENT_LOG_CAPACITY as u32 {
            let mut line = EventLine::new();
            push_u32(&mut line, i);
            log.push(&line);
        }
        assert_eq!(log.len(), EVENT_LOG_CAPACITY);
        assert_eq!(log.iter().next(), Some("1"), "entry 0 was dropped");
        assert_eq!(log.iter().last(), Some("8"));
    }

    #[test]
    fn test_event_log_truncates_long_lines() {
        let mut log = EventLog::new();
        log.push(&"x".repeat(EVENT_LINE_LENGTH * 2));
        assert_eq!(log.iter().next().map(str::len), Some(EVENT_LINE_LENGTH));
    }

    #[test]
    fn test_event_log_since() {
        let mut log = EventLog::new();
        log.push("a");
        log.push("b");
        let seen = log.pushed();
        assert_eq!(log.since(seen).count(), 0);

        log.push("c");
        assert_eq!(log.since(seen).collect::<std::vec::Vec<_>>(), ["c"]);

        // More new lines than the ring holds: only the buffered ones come back
        for _ in 0..EVENT_LOG_CAPACITY * 2 {
            log.push("x");
        }
        assert_eq!(log.since(seen).count(), EVENT_LOG_CAPACITY);
    }

    #[test]
    fn test_push_u32() {
        let mut s: String<16> = String::new();
        push_u32(&mut s, 0);
        assert_eq!(s.as_str(), "0");

        let mut s: String<16> = String::new();
        push_u32(&mut s, 4_294_967_295);
        assert_eq!(s.as_str(), "4294967295");
    }
}
