//! Millisecond clock from Timer0.
//!
//! 16MHz / 64 = 250kHz; compare match at 249 fires every 1ms.

use core::cell::Cell;

use avr_device::atmega32u4::TC0;
use avr_device::interrupt::Mutex;
use embedded_hal::delay::DelayNs;
use thumb35_core::Clock;

const TIMER_COUNTS: u8 = 250;

static MILLIS: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

#[avr_device::interrupt(atmega32u4)]
fn TIMER0_COMPA() {
    avr_device::interrupt::free(|cs| {
        let millis = MILLIS.borrow(cs);
        millis.set(millis.get().wrapping_add(1));
    })
}

/// Reads the counter kept by the Timer0 interrupt.
pub struct MillisClock;

impl MillisClock {
    /// Start Timer0. Interrupts must be enabled afterwards for time to advance.
    pub fn start(tc0: &TC0) -> Self {
        tc0.tccr0a.write(|w| w.wgm0().ctc());
        tc0.ocr0a.write(|w| w.bits(TIMER_COUNTS - 1));
        tc0.tccr0b.write(|w| w.cs0().prescale_64());
        tc0.timsk0.write(|w| w.ocie0a().set_bit());

        avr_device::interrupt::free(|cs| MILLIS.borrow(cs).set(0));
        Self
    }
}

impl Clock for MillisClock {
    fn now_ms(&self) -> u32 {
        avr_device::interrupt::free(|cs| MILLIS.borrow(cs).get())
    }
}

/// Delays for the scan loop.
///
/// Milliseconds are counted on Timer0, so `delay_ms(n)` returns once the
/// clock has moved on by `n` and the next cycle lands in a new millisecond.
/// Shorter waits (column settle, gap) spin in a loop of about 1µs per pass.
pub struct AvrDelay;

impl DelayNs for AvrDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns.div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        if us >= 1000 {
            self.delay_ms(us / 1000);
        }
        // 12 nops plus u16 counter decrement and branch: 16 cycles at 16MHz
        let mut n = (us % 1000) as u16;
        while n > 0 {
            unsafe {
                core::arch::asm!(
                    "nop", "nop", "nop", "nop", "nop", "nop",
                    "nop", "nop", "nop", "nop", "nop", "nop",
                )
            };
            n -= 1;
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        let clock = MillisClock;
        let start = clock.now_ms();
        while clock.now_ms().wrapping_sub(start) < ms {}
    }
}
