//! Thumb35 keyboard firmware for ATmega32U4 (Teensy 2.0).
//!
//! Wires the board to the keyboard core:
//! - 4×10 matrix on Teensy GPIO
//! - Timer0 millisecond clock
//! - USB boot keyboard
//! - On-board LED as the status indicator

#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]
#![feature(asm_experimental_arch)]

mod clock;
mod hid;
mod led;
mod matrix;

use avr_device::atmega32u4::Peripherals;
use embedded_hal::delay::DelayNs;
use thumb35_core::layout::THUMB35;
use thumb35_core::transport::WiredTransport;
use thumb35_core::{Keyboard, KeyboardConfig, UsbConfig};

use clock::{AvrDelay, MillisClock};
use hid::UsbKeyboard;
use led::OnboardLed;
use matrix::TeensyPins;

/// Panic handler: on AVR we just loop forever.
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {}
}

/// Main entry point.
#[no_mangle]
pub extern "C" fn main() -> ! {
    let dp = unsafe { Peripherals::steal() };

    // Configure system clock (should already be 16MHz from Teensy bootloader fuses)
    // Disable clock prescaler (CLKPR)
    dp.CPU.clkpr.write(|w| w.clkpce().set_bit());
    dp.CPU.clkpr.write(|w| unsafe { w.bits(0) }); // Prescaler = 1

    let usb_config = UsbConfig::default();
    let config = KeyboardConfig::wired();

    let pins = TeensyPins::new(&dp.PORTB, &dp.PORTD, &dp.PORTF);
    let led = OnboardLed::new(&dp.PORTD);
    let clock = MillisClock::start(&dp.TC0);

    let mut usb = UsbKeyboard::new(&dp.USB_DEVICE, &dp.PLL, usb_config);
    usb.init();

    // Timer0 needs interrupts to count
    unsafe { avr_device::interrupt::enable() };

    // Give the host time to see the device before the first report
    let mut delay = AvrDelay;
    for _ in 0..usb_config.startup_settle_ms {
        usb.poll();
        delay.delay_ms(1);
    }

    let mut keyboard = Keyboard::new(
        pins,
        AvrDelay,
        &THUMB35,
        WiredTransport::new(usb),
        led,
        clock,
        config,
    );

    keyboard.run(|transport| transport.writer_mut().poll())
}
