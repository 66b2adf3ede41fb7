//! Discrete-time simulation of the board.
//!
//! Virtual time advances in [`STEP_MS`] steps. On every step the virtual
//! timer and keypad may raise vectors, whose handlers run to completion, and
//! then the dispatcher makes one polling pass, exactly as the foreground loop
//! would between interrupts.

use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;

use tempclock_common::config::{
    BUTTON_TASK_PERIOD, DISPLAY_REFRESH_MS, TEMPERATURE_TASK_PERIOD, TICK_INTERVAL_MS, TIME_TASK_PERIOD,
};
use tempclock_common::lcd::TextGrid;
use tempclock_common::log::{EventLine, EventLog, push_u32};
use tempclock_common::refresh::DisplayRefresh;
use tempclock_common::tasks::{StrobeTask, TemperatureTask, TimeTask};
use tempclock_common::ticks::TASK_COUNT;
use tempclock_common::vectors::{Vector, Vectors};
use tempclock_common::{Button, ButtonState, ConfigError, KeypadDecoder, SenseLine, SharedState, TaskId};

use crate::hardware::{AdcSource, SimAdc, SimKeypad, SimPins};
use crate::timing::STEP_MS;

/// Input and output side of a simulation run.
pub trait Frontend {
    /// Which of S1..S4 are held down at `now_ms`.
    fn buttons(
        &mut self,
        now_ms: u32,
    ) -> [bool; 4];

    /// Called after every display refresh. Return `Break` to stop.
    fn frame(
        &mut self,
        grid: &TextGrid,
        log: &EventLog,
        now_ms: u32,
    ) -> ControlFlow<()>;
}

#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// Stop after this much virtual time. `None` runs until the front end
    /// breaks.
    pub limit_ms: Option<u32>,
    pub adc: AdcSource,
}

/// Outcome of a finished run.
#[derive(Debug)]
pub struct Report {
    pub elapsed_ms: u32,
    /// Passes per task, indexed by [`TaskId::index`].
    pub passes: [u32; TASK_COUNT],
    /// Edges that decoded to a button.
    pub presses: u32,
    pub buttons: ButtonState,
    pub grid: TextGrid,
}

fn press_line(
    now_ms: u32,
    button: Button,
    state: ButtonState,
) -> EventLine {
    let mut line = EventLine::new();
    push_u32(&mut line, now_ms);
    line.push_str("ms S").ok();
    push_u32(&mut line, u32::from(button.weight()));
    line.push_str(" ind=").ok();
    push_u32(&mut line, state.indicator());
    line
}

fn pass_line(
    now_ms: u32,
    task: TaskId,
) -> EventLine {
    let mut line = EventLine::new();
    push_u32(&mut line, now_ms);
    line.push_str("ms ").ok();
    line.push_str(task.name()).ok();
    line
}

/// Wire the tasks and handlers together and run until the limit or until
/// the front end stops.
pub fn run(
    frontend: &mut dyn Frontend,
    options: Options,
) -> Result<Report, ConfigError> {
    let shared = SharedState::new();
    let clock = Cell::new(0u32);
    let pins = SimPins::new();
    let grid = RefCell::new(TextGrid::new());
    let log = RefCell::new(EventLog::new());
    let presses = Cell::new(0u32);

    // Foreground
    let mut strobe = StrobeTask::new(&shared, &pins);
    let mut time = TimeTask::new(&shared);
    let mut temperature = TemperatureTask::new(&shared, SimAdc::new(&clock, options.adc));

    let mut dispatcher = shared.take_dispatcher()?;
    dispatcher.bind(TaskId::Button, BUTTON_TASK_PERIOD, &mut strobe)?;
    dispatcher.bind(TaskId::Time, TIME_TASK_PERIOD, &mut time)?;
    dispatcher.bind(TaskId::Temperature, TEMPERATURE_TASK_PERIOD, &mut temperature)?;
    dispatcher.check()?;

    // Handlers
    let tick_source = shared.take_tick_source()?;
    let decoder = KeypadDecoder::new(&shared);
    let refresh = DisplayRefresh::new(&shared);
    let on_edge = |line: SenseLine| {
        if let Some(button) = decoder.on_edge(line) {
            presses.set(presses.get() + 1);
            log.borrow_mut().push(&press_line(clock.get(), button, shared.buttons()));
        }
    };
    let mut on_tick = || tick_source.on_tick();
    let mut on_sense_one = || on_edge(SenseLine::One);
    let mut on_sense_two = || on_edge(SenseLine::Two);
    let mut on_refresh = || refresh.refresh(&mut *grid.borrow_mut());

    let mut vectors = Vectors::new();
    vectors.bind(Vector::Tick, &mut on_tick);
    vectors.bind(Vector::SenseEdge(SenseLine::One), &mut on_sense_one);
    vectors.bind(Vector::SenseEdge(SenseLine::Two), &mut on_sense_two);
    vectors.bind(Vector::Refresh, &mut on_refresh);

    let mut keypad = SimKeypad::new();
    let mut passes = [0u32; TASK_COUNT];
    let mut now = 0u32;
    loop {
        now += STEP_MS;
        clock.set(now);

        if now.is_multiple_of(TICK_INTERVAL_MS) {
            vectors.fire(Vector::Tick);
        }

        keypad.set_held(frontend.buttons(now));
        let rising = keypad.sample(&pins);
        for (line, edge) in [SenseLine::One, SenseLine::Two].into_iter().zip(rising) {
            if edge {
                vectors.fire(Vector::SenseEdge(line));
            }
        }

        for task in dispatcher.poll() {
            passes[task.index()] += 1;
            if task != TaskId::Button {
                log.borrow_mut().push(&pass_line(now, task));
            }
        }

        if now.is_multiple_of(DISPLAY_REFRESH_MS) {
            vectors.fire(Vector::Refresh);
            if frontend.frame(&grid.borrow(), &log.borrow(), now).is_break() {
                break;
            }
        }

        if options.limit_ms.is_some_and(|limit| now >= limit) {
            break;
        }
    }

    Ok(Report {
        elapsed_ms: now,
        passes,
        presses: presses.get(),
        buttons: shared.buttons(),
        grid: grid.borrow().clone(),
    })
}
