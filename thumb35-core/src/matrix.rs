//! Key matrix scanning.
//!
//! Columns are driven one at a time: the active column is pulled low while
//! every other column floats, and a row that reads low is connected to the
//! active column through a closed switch. Rows are biased high so an open
//! switch reads as released.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// One boolean per switch, `state[row][col]`, true = pressed.
pub type MatrixState<const ROW: usize, const COL: usize> = [[bool; COL]; ROW];

/// Electrical access to the matrix lines.
pub trait MatrixPins<const ROW: usize, const COL: usize> {
    /// Drive `col` to the active level, or release it to high impedance.
    fn set_column_active(&mut self, col: usize, active: bool);

    /// True if `row` currently reads at the active level.
    fn read_row(&mut self, row: usize) -> bool;
}

/// [`MatrixPins`] over `embedded-hal` pins.
///
/// Column pins must be configured open-drain, so that `set_high` releases
/// the line. Row pins must have pull-ups enabled.
pub struct PinMatrix<In: InputPin, Out: OutputPin, const ROW: usize, const COL: usize> {
    rows: [In; ROW],
    cols: [Out; COL],
}

impl<In: InputPin, Out: OutputPin, const ROW: usize, const COL: usize> PinMatrix<In, Out, ROW, COL> {
    pub fn new(rows: [In; ROW], cols: [Out; COL]) -> Self {
        Self { rows, cols }
    }
}

impl<In: InputPin, Out: OutputPin, const ROW: usize, const COL: usize> MatrixPins<ROW, COL>
    for PinMatrix<In, Out, ROW, COL>
{
    fn set_column_active(&mut self, col: usize, active: bool) {
        if let Some(pin) = self.cols.get_mut(col) {
            if active {
                pin.set_low().ok();
            } else {
                pin.set_high().ok();
            }
        }
    }

    fn read_row(&mut self, row: usize) -> bool {
        // A failed read counts as released
        self.rows
            .get_mut(row)
            .map(|pin| pin.is_low().unwrap_or(false))
            .unwrap_or(false)
    }
}

/// Settle time after driving a column, in microseconds.
pub const COLUMN_SETTLE_US: u32 = 30;
/// Gap after releasing a column, in microseconds.
pub const COLUMN_GAP_US: u32 = 5;

pub struct Scanner<P, D, const ROW: usize, const COL: usize> {
    pins: P,
    delay: D,
    settle_us: u32,
    gap_us: u32,
}

impl<P: MatrixPins<ROW, COL>, D: DelayNs, const ROW: usize, const COL: usize> Scanner<P, D, ROW, COL> {
    pub fn new(pins: P, delay: D, settle_us: u32, gap_us: u32) -> Self {
        Self {
            pins,
            delay,
            settle_us,
            gap_us,
        }
    }

    /// Scan the entire matrix once.
    pub fn scan(&mut self) -> MatrixState<ROW, COL> {
        let mut state = [[false; COL]; ROW];

        for col in 0..COL {
            self.pins.set_column_active(col, true);
            // Let the line's parasitic capacitance discharge
            self.delay.delay_us(self.settle_us);

            for (row, row_state) in state.iter_mut().enumerate() {
                row_state[col] = self.pins.read_row(row);
            }

            self.pins.set_column_active(col, false);
            self.delay.delay_us(self.gap_us);
        }

        state
    }

    pub fn pins_mut(&mut self) -> &mut P {
        &mut self.pins
    }

    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }
}
