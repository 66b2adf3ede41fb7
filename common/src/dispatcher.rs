//! Tick-driven cooperative task dispatcher.
//!
//! The tick source bumps one counter per task; the dispatcher polls those
//! counters in a tight loop and runs a task when its counter reaches the
//! task's period. Task bodies run to completion one at a time, in the fixed
//! order of [`TaskId::ALL`]. There is no backlog: if several periods elapse
//! before a pass, the task still runs once and the counter goes back to zero.

use core::fmt;

use heapless::Vec;

use crate::ticks::{TASK_COUNT, TaskId, TickCounters};

// =============================================================================
// Task Bodies
// =============================================================================

/// A task body. Must not block.
pub trait Task {
    fn run(&mut self);
}

impl<F: FnMut()> Task for F {
    #[inline]
    fn run(&mut self) { self() }
}

/// A task bound to the dispatcher: (name, period in ticks, body).
pub struct TaskBinding<'a> {
    id: TaskId,
    period: u32,
    body: &'a mut dyn Task,
}

impl TaskBinding<'_> {
    #[inline]
    pub const fn id(&self) -> TaskId { self.id }

    #[inline]
    pub const fn name(&self) -> &'static str { self.id.name() }

    #[inline]
    pub const fn period(&self) -> u32 { self.period }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Startup configuration error. Fatal: the firmware never runs with one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A task was bound with a period of zero ticks.
    ZeroPeriod(TaskId),
    /// A task was bound twice.
    AlreadyBound(TaskId),
    /// A task was never bound.
    Unbound(TaskId),
    /// The tick source handle was already taken.
    TickSourceTaken,
    /// The dispatcher was already taken.
    DispatcherTaken,
}

impl fmt::Display for ConfigError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::ZeroPeriod(id) => write!(f, "task `{}` has a zero period", id.name()),
            Self::AlreadyBound(id) => write!(f, "task `{}` is bound twice", id.name()),
            Self::Unbound(id) => write!(f, "task `{}` is not bound", id.name()),
            Self::TickSourceTaken => f.write_str("tick source already taken"),
            Self::DispatcherTaken => f.write_str("dispatcher already taken"),
        }
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Tasks that ran during one dispatcher pass, in execution order.
pub type Pass = Vec<TaskId, TASK_COUNT>;

pub struct Dispatcher<'a> {
    ticks: &'a TickCounters,
    bindings: [Option<TaskBinding<'a>>; TASK_COUNT],
}

impl<'a> Dispatcher<'a> {
    /// Empty dispatcher reading the given counters.
    ///
    /// Boards get theirs from [`SharedState::take_dispatcher`](crate::SharedState::take_dispatcher).
    pub(crate) fn new(ticks: &'a TickCounters) -> Self {
        Self {
            ticks,
            bindings: [const { None }; TASK_COUNT],
        }
    }

    /// Bind a task body to its slot.
    ///
    /// Evaluation order comes from [`TaskId`], not from the order of `bind`
    /// calls.
    pub fn bind(
        &mut self,
        id: TaskId,
        period: u32,
        body: &'a mut dyn Task,
    ) -> Result<(), ConfigError> {
        if period == 0 {
            return Err(ConfigError::ZeroPeriod(id));
        }
        let slot = &mut self.bindings[id.index()];
        if slot.is_some() {
            return Err(ConfigError::AlreadyBound(id));
        }
        *slot = Some(TaskBinding { id, period, body });
        Ok(())
    }

    /// Verify every task is bound. Call once before [`run`](Self::run).
    pub fn check(&self) -> Result<(), ConfigError> {
        for id in TaskId::ALL {
            if self.bindings[id.index()].is_none() {
                return Err(ConfigError::Unbound(id));
            }
        }
        Ok(())
    }

    /// Bound tasks in evaluation order.
    pub fn bindings(&self) -> impl Iterator<Item = &TaskBinding<'a>> { self.bindings.iter().flatten() }

    /// One pass over all bindings.
    ///
    /// Each due task has its counter reset before its body runs, so ticks
    /// arriving during the body count toward the next period.
    pub fn poll(&mut self) -> Pass {
        let mut ran = Pass::new();
        for binding in self.bindings.iter_mut().flatten() {
            if self.ticks.take_if_due(binding.id, binding.period) {
                binding.body.run();
                // Capacity equals the number of slots
                ran.push(binding.id).ok();
            }
        }
        ran
    }

    /// Foreground loop. Never returns, never sleeps.
    pub fn run(&mut self) -> ! {
        loop {
            self.poll();
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::{Cell, RefCell};

    use super::*;
    use crate::config::{BUTTON_TASK_PERIOD, TEMPERATURE_TASK_PERIOD, TIME_TASK_PERIOD};

    #[test]
    fn test_bind_rejects_zero_period() {
        let ticks = TickCounters::new();
        let mut dispatcher = Dispatcher::new(&ticks);
        let mut body = || {};
        assert_eq!(
            dispatcher.bind(TaskId::Time, 0, &mut body),
            Err(ConfigError::ZeroPeriod(TaskId::Time))
        );
    }

    #[test]
    fn test_bind_rejects_duplicate() {
        let ticks = TickCounters::new();
        let mut dispatcher = Dispatcher::new(&ticks);
        let mut a = || {};
        let mut b = || {};
        dispatcher.bind(TaskId::Button, 2, &mut a).unwrap();
        assert_eq!(
            dispatcher.bind(TaskId::Button, 2, &mut b),
            Err(ConfigError::AlreadyBound(TaskId::Button))
        );
    }

    #[test]
    fn test_check_reports_first_unbound() {
        let ticks = TickCounters::new();
        let mut dispatcher = Dispatcher::new(&ticks);
        let mut a = || {};
        dispatcher.bind(TaskId::Button, 2, &mut a).unwrap();
        assert_eq!(dispatcher.check(), Err(ConfigError::Unbound(TaskId::Time)));
    }

    #[test]
    fn test_config_error_display() {
        let msg = format!("{}", ConfigError::ZeroPeriod(TaskId::Temperature));
        assert_eq!(msg, "task `temperature` has a zero period");
    }

    #[test]
    fn test_nothing_runs_before_period() {
        let ticks = TickCounters::new();
        let runs = Cell::new(0);
        let mut body = || runs.set(runs.get() + 1);
        let mut dispatcher = Dispatcher::new(&ticks);
        dispatcher.bind(TaskId::Time, 3, &mut body).unwrap();

        ticks.on_tick();
        ticks.on_tick();
        assert!(dispatcher.poll().is_empty());
        ticks.on_tick();
        assert_eq!(dispatcher.poll().as_slice(), &[TaskId::Time]);
        assert_eq!(runs.get(), 1);
        assert_eq!(ticks.count(TaskId::Time), 0);
    }

    #[test]
    fn test_fixed_evaluation_order_regardless_of_bind_order() {
        let ticks = TickCounters::new();
        let order = RefCell::new(std::vec::Vec::new());
        let mut temperature = || order.borrow_mut().push(TaskId::Temperature);
        let mut time = || order.borrow_mut().push(TaskId::Time);
        let mut button = || order.borrow_mut().push(TaskId::Button);

        let mut dispatcher = Dispatcher::new(&ticks);
        dispatcher.bind(TaskId::Temperature, 1, &mut temperature).unwrap();
        dispatcher.bind(TaskId::Time, 1, &mut time).unwrap();
        dispatcher.bind(TaskId::Button, 1, &mut button).unwrap();
        dispatcher.check().unwrap();

        ticks.on_tick();
        let pass = dispatcher.poll();
        assert_eq!(pass.as_slice(), &[TaskId::Button, TaskId::Time, TaskId::Temperature]);
        assert_eq!(*order.borrow(), pass.as_slice());
    }

    #[test]
    fn test_counter_law_with_reference_periods() {
        // After N ticks, counter == N - runs * period, when the dispatcher
        // polls after every tick.
        let ticks = TickCounters::new();
        let runs = [Cell::new(0u32), Cell::new(0u32), Cell::new(0u32)];
        let mut button = || runs[0].set(runs[0].get() + 1);
        let mut time = || runs[1].set(runs[1].get() + 1);
        let mut temperature = || runs[2].set(runs[2].get() + 1);

        let mut dispatcher = Dispatcher::new(&ticks);
        dispatcher.bind(TaskId::Button, BUTTON_TASK_PERIOD, &mut button).unwrap();
        dispatcher.bind(TaskId::Time, TIME_TASK_PERIOD, &mut time).unwrap();
        dispatcher.bind(TaskId::Temperature, TEMPERATURE_TASK_PERIOD, &mut temperature).unwrap();

        let periods = [BUTTON_TASK_PERIOD, TIME_TASK_PERIOD, TEMPERATURE_TASK_PERIOD];
        for n in 1..=1000u32 {
            ticks.on_tick();
            dispatcher.poll();
            for task in TaskId::ALL {
                let i = task.index();
                assert_eq!(ticks.count(task), n - runs[i].get() * periods[i], "task {} at tick {}", task.name(), n);
                assert!(ticks.count(task) < periods[i]);
            }
        }
        assert_eq!(runs[0].get(), 500);
        assert_eq!(runs[1].get(), 50);
        assert_eq!(runs[2].get(), 125);
    }

    #[test]
    fn test_missed_periods_run_once() {
        let ticks = TickCounters::new();
        let runs = Cell::new(0);
        let mut body = || runs.set(runs.get() + 1);
        let mut dispatcher = Dispatcher::new(&ticks);
        dispatcher.bind(TaskId::Button, 2, &mut body).unwrap();

        // Main loop stalled for 7 ticks
        for _ in 0..7 {
            ticks.on_tick();
        }
        dispatcher.poll();
        dispatcher.poll();
        assert_eq!(runs.get(), 1);
        assert_eq!(ticks.count(TaskId::Button), 0);
    }

    #[test]
    fn test_bindings_expose_name_and_period() {
        let ticks = TickCounters::new();
        let mut a = || {};
        let mut b = || {};
        let mut dispatcher = Dispatcher::new(&ticks);
        dispatcher.bind(TaskId::Temperature, 8, &mut a).unwrap();
        dispatcher.bind(TaskId::Button, 2, &mut b).unwrap();

        let names: std::vec::Vec<_> = dispatcher.bindings().map(|b| (b.name(), b.period())).collect();
        assert_eq!(names, [("button", 2), ("temperature", 8)]);
    }
}
