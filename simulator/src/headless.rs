//! Console front end: plays the scripted holds and prints the display.

use std::ops::ControlFlow;

use tempclock_common::config::LCD_COLUMNS;
use tempclock_common::lcd::TextGrid;
use tempclock_common::log::EventLog;

use crate::sim::Frontend;
use crate::timing::Hold;

pub struct Headless<'a> {
    script: &'a [Hold],
    print_interval_ms: u32,
    /// Log pushes already printed.
    printed: u32,
}

impl<'a> Headless<'a> {
    pub const fn new(
        script: &'a [Hold],
        print_interval_ms: u32,
    ) -> Self {
        Self {
            script,
            print_interval_ms,
            printed: 0,
        }
    }
}

impl Frontend for Headless<'_> {
    fn buttons(
        &mut self,
        now_ms: u32,
    ) -> [bool; 4] {
        let mut held = [false; 4];
        for hold in self.script.iter().filter(|h| h.active(now_ms)) {
            held[hold.button.index()] = true;
        }
        held
    }

    fn frame(
        &mut self,
        grid: &TextGrid,
        log: &EventLog,
        now_ms: u32,
    ) -> ControlFlow<()> {
        if !now_ms.is_multiple_of(self.print_interval_ms) {
            return ControlFlow::Continue(());
        }

        let border = "-".repeat(LCD_COLUMNS);
        println!("t={:>6} ms +{}+", now_ms, border);
        for row in 0..2 {
            println!("            |{}|", grid.row(row));
        }
        println!("            +{}+", border);

        for line in log.since(self.printed) {
            println!("    {}", line);
        }
        self.printed = log.pushed();

        ControlFlow::Continue(())
    }
}
