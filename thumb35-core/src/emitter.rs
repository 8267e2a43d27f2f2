//! Press/release edge detection.
//!
//! Compares the debounced matrix with the one seen on the previous pass and
//! turns every transition into a [`KeyEvent`]. The code a key was pressed
//! with is remembered until its release, so a release always carries the
//! press-time code even if the layer changed in between.

use crate::keycode::KeyCode;
use crate::keymap::Keymap;
use crate::matrix::MatrixState;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    Press,
    Release,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub row: usize,
    pub col: usize,
    pub code: KeyCode,
    pub action: KeyAction,
}

/// Counts for one emission pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmitStats {
    pub presses: usize,
    pub releases: usize,
    /// Transitions that would have produced an event but were not delivered.
    pub dropped: usize,
}

pub struct EdgeDetector<const ROW: usize, const COL: usize> {
    previous: MatrixState<ROW, COL>,
    /// Code of every delivered press that has not been released yet.
    held: [[Option<KeyCode>; COL]; ROW],
}

impl<const ROW: usize, const COL: usize> Default for EdgeDetector<ROW, COL> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROW: usize, const COL: usize> EdgeDetector<ROW, COL> {
    pub const fn new() -> Self {
        Self {
            previous: [[false; COL]; ROW],
            held: [[None; COL]; ROW],
        }
    }

    /// Run one emission pass.
    ///
    /// `sink` receives events in row-major order. When `deliver` is false no
    /// event is produced, but `previous` still follows `debounced`: nothing
    /// is queued for later, and a key whose press was not delivered will not
    /// get a release either.
    pub fn emit<F: FnMut(KeyEvent)>(
        &mut self,
        debounced: &MatrixState<ROW, COL>,
        layer: usize,
        keymap: &Keymap<ROW, COL>,
        deliver: bool,
        mut sink: F,
    ) -> EmitStats {
        let mut stats = EmitStats::default();

        for row in 0..ROW {
            for col in 0..COL {
                let now = debounced[row][col];
                if now == self.previous[row][col] {
                    continue;
                }
                self.previous[row][col] = now;

                if keymap.is_layer_select(row, col) {
                    continue;
                }

                if now {
                    let code = keymap.resolve(row, col, layer);
                    if code.is_none() {
                        continue;
                    }
                    if !deliver {
                        stats.dropped += 1;
                        continue;
                    }
                    self.held[row][col] = Some(code);
                    stats.presses += 1;
                    sink(KeyEvent {
                        row,
                        col,
                        code,
                        action: KeyAction::Press,
                    });
                } else if let Some(code) = self.held[row][col].take() {
                    if !deliver {
                        stats.dropped += 1;
                        continue;
                    }
                    stats.releases += 1;
                    sink(KeyEvent {
                        row,
                        col,
                        code,
                        action: KeyAction::Release,
                    });
                }
            }
        }

        stats
    }

    /// Forget every held code. Keys still down will not produce a release.
    pub fn forget_held(&mut self) {
        self.held = [[None; COL]; ROW];
    }

    pub fn previous(&self) -> &MatrixState<ROW, COL> {
        &self.previous
    }

    /// Code captured when the key at (row, col) was pressed, if still held.
    pub fn held(&self, row: usize, col: usize) -> Option<KeyCode> {
        self.held[row][col]
    }
}
