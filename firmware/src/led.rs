//! Teensy on-board LED on PD6.

use avr_device::atmega32u4::PORTD;
use thumb35_core::indicator::{Signal, StatusLed};

const LED_BIT: u8 = 1 << 6;

pub struct OnboardLed<'a> {
    portd: &'a PORTD,
}

impl<'a> OnboardLed<'a> {
    pub fn new(portd: &'a PORTD) -> Self {
        portd.ddrd.modify(|r, w| unsafe { w.bits(r.bits() | LED_BIT) });
        portd.portd.modify(|r, w| unsafe { w.bits(r.bits() & !LED_BIT) });
        Self { portd }
    }
}

impl StatusLed for OnboardLed<'_> {
    // A single colour LED, so only on/off is shown
    fn show(&mut self, signal: Signal) {
        if signal.lit {
            self.portd.portd.modify(|r, w| unsafe { w.bits(r.bits() | LED_BIT) });
        } else {
            self.portd.portd.modify(|r, w| unsafe { w.bits(r.bits() & !LED_BIT) });
        }
    }
}
