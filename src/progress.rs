use std::io::{stdout, Write};
use std::time::Instant;

/**
 * Single-line console progress, redrawn in place. Only drawn when stdout is a terminal.
 */
pub struct Progress {
    label: &'static str,
    every: usize,
    enabled: bool,
    start: Instant
}

impl Progress {
    pub fn new(label: &'static str, every: usize) -> Progress {
        Progress {
            label,
            every: every.max(1),
            enabled: termion::is_tty(&stdout()),
            start: Instant::now()
        }
    }

    pub fn tick(&self, index: usize, total: Option<usize>) {
        if !self.enabled || index % self.every != 0 {
            return;
        }
        let mut out = stdout();
        let _ = match total {
            Some(total) => write!(out, "{}\r{} {} / {}", termion::clear::CurrentLine, self.label, index, total),
            None => write!(out, "{}\r{} {}", termion::clear::CurrentLine, self.label, index)
        };
        let _ = out.flush();
    }

    /**
     * Ends the progress line and returns the elapsed time in seconds.
     */
    pub fn finish(&self) -> f64 {
        if self.enabled {
            println!();
        }
        self.start.elapsed().as_secs_f64()
    }
}
