//! Per-key debounce logic.
//!
//! Each key has a counter of consecutive raw readings that differ from the
//! debounced state. When it reaches the threshold the debounced state flips
//! and the counter restarts; any agreeing reading resets it. Glitches shorter
//! than the threshold never reach the debounced state.

use crate::matrix::MatrixState;

/// Default number of consistent scan cycles required to register a state change.
/// At one update per millisecond, this gives ~5ms debounce time.
pub const DEBOUNCE_THRESHOLD: u8 = 5;

pub struct Debouncer<const ROW: usize, const COL: usize> {
    /// Debounced key states: false = released, true = pressed.
    state: MatrixState<ROW, COL>,
    /// Per-key counters tracking consecutive raw readings that differ from debounced state.
    counters: [[u8; COL]; ROW],
    threshold: u8,
    /// Millisecond of the last update that ran.
    last_update: Option<u32>,
}

impl<const ROW: usize, const COL: usize> Default for Debouncer<ROW, COL> {
    fn default() -> Self {
        Self::new(DEBOUNCE_THRESHOLD)
    }
}

impl<const ROW: usize, const COL: usize> Debouncer<ROW, COL> {
    /// A threshold of 0 is treated as 1.
    pub const fn new(threshold: u8) -> Self {
        Self {
            state: [[false; COL]; ROW],
            counters: [[0; COL]; ROW],
            threshold: if threshold == 0 { 1 } else { threshold },
            last_update: None,
        }
    }

    /// Feed a raw matrix scan taken at `now_ms`.
    ///
    /// At most one update runs per millisecond; a second call within the
    /// same millisecond is ignored and returns `false`.
    pub fn update(&mut self, raw_state: &MatrixState<ROW, COL>, now_ms: u32) -> bool {
        if self.last_update == Some(now_ms) {
            return false;
        }
        self.last_update = Some(now_ms);

        for row in 0..ROW {
            for col in 0..COL {
                let pressed = raw_state[row][col];

                if pressed == self.state[row][col] {
                    self.counters[row][col] = 0;
                } else {
                    self.counters[row][col] += 1;
                    if self.counters[row][col] >= self.threshold {
                        trace!("debounced ({}, {}) -> {}", row, col, pressed);
                        self.state[row][col] = pressed;
                        self.counters[row][col] = 0;
                    }
                }
            }
        }

        true
    }

    pub fn state(&self) -> &MatrixState<ROW, COL> {
        &self.state
    }

    pub fn counter(&self, row: usize, col: usize) -> u8 {
        self.counters[row][col]
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}
