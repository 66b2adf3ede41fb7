//! Table of hardware handlers, one slot per interrupt source.
//!
//! Boards with a real vector table attach handlers through their runtime.
//! The simulator uses this table instead: it raises a [`Vector`] whenever its
//! virtual timer fires or a sense line sees a rising edge, and the bound
//! handler runs to completion before the simulation continues.

use crate::keypad::SenseLine;

/// Interrupt sources of the system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Vector {
    /// Periodic tick timer.
    Tick,
    /// Rising edge on a keypad sense line.
    SenseEdge(SenseLine),
    /// Display refresh timer.
    Refresh,
}

impl Vector {
    pub const COUNT: usize = 4;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Tick,
        Self::SenseEdge(SenseLine::One),
        Self::SenseEdge(SenseLine::Two),
        Self::Refresh,
    ];

    #[inline]
    const fn slot(self) -> usize {
        match self {
            Self::Tick => 0,
            Self::SenseEdge(SenseLine::One) => 1,
            Self::SenseEdge(SenseLine::Two) => 2,
            Self::Refresh => 3,
        }
    }
}

pub struct Vectors<'a> {
    handlers: [Option<&'a mut dyn FnMut()>; Vector::COUNT],
}

impl<'a> Vectors<'a> {
    pub const fn new() -> Self { Self { handlers: [None, None, None, None] } }

    /// Attach a handler, replacing any previous one.
    pub fn bind(
        &mut self,
        vector: Vector,
        handler: &'a mut dyn FnMut(),
    ) {
        self.handlers[vector.slot()] = Some(handler);
    }

    #[inline]
    pub fn is_bound(
        &self,
        vector: Vector,
    ) -> bool {
        self.handlers[vector.slot()].is_some()
    }

    /// Run the handler for `vector`. An unbound vector is ignored and returns
    /// `false`.
    pub fn fire(
        &mut self,
        vector: Vector,
    ) -> bool {
        match self.handlers[vector.slot()].as_mut() {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

impl Default for Vectors<'_> {
    fn default() -> Self { Self::new() }
}
