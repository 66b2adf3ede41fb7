//! Tick counters driven by the periodic tick source.
//!
//! The tick source is the only writer that increments; the dispatcher is the
//! only writer that resets. Each counter belongs to exactly one [`TaskId`].
//!
//! Outside this crate the counters are reachable only through the two
//! handles [`SharedState`](crate::SharedState) hands out once each: a
//! [`TickSource`] for the tick handler and a
//! [`Dispatcher`](crate::Dispatcher) for the foreground loop.

use core::sync::atomic::{AtomicU32, Ordering};

/// Number of dispatcher-bound tasks.
pub const TASK_COUNT: usize = 3;

/// Identity of a dispatcher-bound task.
///
/// Discriminant order is the fixed evaluation (priority) order of the
/// dispatcher: button task first, then time, then temperature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TaskId {
    /// Drive-line strobe for the keypad matrix.
    Button = 0,
    /// Wrapping seconds counter.
    Time = 1,
    /// LM35 sampling with decimation.
    Temperature = 2,
}

impl TaskId {
    /// All tasks in evaluation order.
    pub const ALL: [Self; TASK_COUNT] = [Self::Button, Self::Time, Self::Temperature];

    /// Slot of this task in per-task tables.
    #[inline]
    pub const fn index(self) -> usize { self as usize }

    /// Human-readable task name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Time => "time",
            Self::Temperature => "temperature",
        }
    }
}

/// One counter per task, incremented on every tick.
pub struct TickCounters {
    counters: [AtomicU32; TASK_COUNT],
}

impl TickCounters {
    /// All counters start at zero.
    pub const fn new() -> Self {
        Self {
            counters: [const { AtomicU32::new(0) }; TASK_COUNT],
        }
    }

    #[inline]
    pub(crate) fn on_tick(&self) {
        for counter in &self.counters {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Current value of one task's counter.
    #[inline]
    pub(crate) fn count(
        &self,
        task: TaskId,
    ) -> u32 {
        self.counters[task.index()].load(Ordering::Relaxed)
    }

    /// Reset a task's counter to zero if it has reached `period`.
    ///
    /// Returns `true` when the task is due. Only the dispatcher calls this.
    #[inline]
    pub(crate) fn take_if_due(
        &self,
        task: TaskId,
        period: u32,
    ) -> bool {
        let counter = &self.counters[task.index()];
        if counter.load(Ordering::Relaxed) >= period {
            counter.swap(0, Ordering::Relaxed);
            true
        } else {
            false
        }
    }
}

impl Default for TickCounters {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Tick Source
// =============================================================================

/// The one handle allowed to advance the counters.
pub struct TickSource<'a> {
    counters: &'a TickCounters,
}

impl<'a> TickSource<'a> {
    pub(crate) const fn new(counters: &'a TickCounters) -> Self { Self { counters } }

    /// Tick-source handler body: add one to every counter.
    ///
    /// Does nothing else and never fails, so it is safe to call from a
    /// high-priority interrupt.
    #[inline]
    pub fn on_tick(&self) { self.counters.on_tick(); }
}
