//! Key matrix pins on the Teensy 2.0.
//!
//! The Thumb35 has a 4×10 matrix wired straight to the ATmega32U4:
//!   Column drive pins: PB0-PB7, PD2, PD3
//!   Row read pins (inputs w/ pull-up): PF0, PF1, PF4, PF5
//!
//! A driven column is pulled low; an idle column is left high impedance, so a
//! row reads low only through a closed switch on the driven column.

use avr_device::atmega32u4::{PORTB, PORTD, PORTF};
use thumb35_core::layout::{COLS, ROWS};
use thumb35_core::matrix::MatrixPins;

/// PORTF bit for each row.
const ROW_BITS: [u8; ROWS] = [0, 1, 4, 5];
/// Mask of all row bits on PORTF.
const ROW_MASK: u8 = 0x33;
/// PORTD bits used by columns 8 and 9.
const PORTD_COL_MASK: u8 = 0x0C;

pub struct TeensyPins<'a> {
    portb: &'a PORTB,
    portd: &'a PORTD,
    portf: &'a PORTF,
}

impl<'a> TeensyPins<'a> {
    /// Configure rows as pulled-up inputs and release every column.
    pub fn new(portb: &'a PORTB, portd: &'a PORTD, portf: &'a PORTF) -> Self {
        portf.ddrf.modify(|r, w| unsafe { w.bits(r.bits() & !ROW_MASK) });
        portf.portf.modify(|r, w| unsafe { w.bits(r.bits() | ROW_MASK) });

        // Columns: input, no pull-up (Hi-Z)
        portb.ddrb.write(|w| unsafe { w.bits(0) });
        portb.portb.write(|w| unsafe { w.bits(0) });
        portd.ddrd.modify(|r, w| unsafe { w.bits(r.bits() & !PORTD_COL_MASK) });
        portd.portd.modify(|r, w| unsafe { w.bits(r.bits() & !PORTD_COL_MASK) });

        Self { portb, portd, portf }
    }
}

impl MatrixPins<ROWS, COLS> for TeensyPins<'_> {
    fn set_column_active(&mut self, col: usize, active: bool) {
        // Output latch stays low; only the direction changes
        match col {
            0..=7 => {
                let bit = 1u8 << col;
                self.portb.portb.modify(|r, w| unsafe { w.bits(r.bits() & !bit) });
                if active {
                    self.portb.ddrb.modify(|r, w| unsafe { w.bits(r.bits() | bit) });
                } else {
                    self.portb.ddrb.modify(|r, w| unsafe { w.bits(r.bits() & !bit) });
                }
            }
            8 | 9 => {
                let bit = 1u8 << (col - 6); // PD2, PD3
                self.portd.portd.modify(|r, w| unsafe { w.bits(r.bits() & !bit) });
                if active {
                    self.portd.ddrd.modify(|r, w| unsafe { w.bits(r.bits() | bit) });
                } else {
                    self.portd.ddrd.modify(|r, w| unsafe { w.bits(r.bits() & !bit) });
                }
            }
            _ => {}
        }
    }

    fn read_row(&mut self, row: usize) -> bool {
        let pinf = self.portf.pinf.read().bits();
        ROW_BITS
            .get(row)
            .map(|&bit| (pinf >> bit) & 1 == 0)
            .unwrap_or(false)
    }
}
