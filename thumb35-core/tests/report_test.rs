//! Full stack: simulated switches in, boot keyboard reports out.

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::{init_log, ManualClock, RecordingLed, SimMatrix, Switches};
use embedded_hal_mock::eh1::delay::NoopDelay;
use thumb35_core::hid::REPORT_LEN;
use thumb35_core::indicator::StatusLed;
use thumb35_core::keyboard::Clock;
use thumb35_core::layout::{COLS, FN_KEY, ROWS, THUMB35};
use thumb35_core::matrix::MatrixPins;
use thumb35_core::transport::{
    BleLink, HidTransport, ReportWriter, WiredTransport, WirelessTransport,
};
use thumb35_core::{BleConfig, Keyboard, KeyboardConfig};

type Report = [u8; REPORT_LEN];

#[derive(Default)]
struct Endpoint(Vec<Report>);

impl ReportWriter for Endpoint {
    fn write_report(&mut self, report: &Report) {
        self.0.push(*report);
    }
}

struct Radio {
    connected: Rc<Cell<bool>>,
    advertising: bool,
    sent: Vec<Report>,
}

impl BleLink for Radio {
    fn advertise(&mut self, _config: &BleConfig<'_>) {
        self.advertising = true;
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn send_report(&mut self, report: &Report) {
        self.sent.push(*report);
    }
}

fn report(modifiers: u8, keys: &[u8]) -> Report {
    let mut bytes = [0; REPORT_LEN];
    bytes[0] = modifiers;
    bytes[2..2 + keys.len()].copy_from_slice(keys);
    bytes
}

fn hold<P, T, L, K>(
    keyboard: &mut Keyboard<'_, P, NoopDelay, T, L, K, ROWS, COLS>,
    time: &Cell<u32>,
    ms: u32,
) where
    P: MatrixPins<ROWS, COLS>,
    T: HidTransport,
    L: StatusLed,
    K: Clock,
{
    for _ in 0..ms {
        time.set(time.get() + 1);
        keyboard.tick();
    }
}

fn parts() -> (Switches, Rc<Cell<u32>>, RecordingLed) {
    init_log();
    (
        Rc::new(RefCell::new([[false; COLS]; ROWS])),
        Rc::new(Cell::new(0)),
        RecordingLed(Rc::new(RefCell::new(Vec::new()))),
    )
}

#[test]
fn wired_reports_track_held_keys() {
    let (switches, time, led) = parts();
    let mut keyboard = Keyboard::new(
        SimMatrix::new(switches.clone()),
        NoopDelay::new(),
        &THUMB35,
        WiredTransport::new(Endpoint::default()),
        led,
        ManualClock(time.clone()),
        KeyboardConfig::wired(),
    );

    // q, then left alt on the thumb row
    switches.borrow_mut()[0][0] = true;
    hold(&mut keyboard, &time, 5);
    switches.borrow_mut()[3][6] = true;
    hold(&mut keyboard, &time, 5);
    switches.borrow_mut()[0][0] = false;
    hold(&mut keyboard, &time, 5);
    switches.borrow_mut()[3][6] = false;
    hold(&mut keyboard, &time, 5);

    assert_eq!(
        keyboard.transport().writer().0,
        [
            report(0x00, &[0x14]),
            report(0x04, &[0x14]),
            report(0x04, &[]),
            report(0x00, &[]),
        ]
    );
}

#[test]
fn wired_fn_layer_sends_navigation_usages() {
    let (switches, time, led) = parts();
    let mut keyboard = Keyboard::new(
        SimMatrix::new(switches.clone()),
        NoopDelay::new(),
        &THUMB35,
        WiredTransport::new(Endpoint::default()),
        led,
        ManualClock(time.clone()),
        KeyboardConfig::wired(),
    );

    switches.borrow_mut()[FN_KEY.0][FN_KEY.1] = true;
    hold(&mut keyboard, &time, 5);
    // Left arrow sits under 'z'
    switches.borrow_mut()[2][0] = true;
    hold(&mut keyboard, &time, 5);
    switches.borrow_mut()[FN_KEY.0][FN_KEY.1] = false;
    hold(&mut keyboard, &time, 5);
    switches.borrow_mut()[2][0] = false;
    hold(&mut keyboard, &time, 5);

    assert_eq!(
        keyboard.transport().writer().0,
        [report(0x00, &[0x50]), report(0x00, &[])]
    );
}

#[test]
fn wireless_sends_nothing_until_connected() {
    let (switches, time, led) = parts();
    let connected = Rc::new(Cell::new(false));
    let mut keyboard = Keyboard::new(
        SimMatrix::new(switches.clone()),
        NoopDelay::new(),
        &THUMB35,
        WirelessTransport::new(
            Radio {
                connected: connected.clone(),
                advertising: false,
                sent: Vec::new(),
            },
            &BleConfig::default(),
        ),
        led,
        ManualClock(time.clone()),
        KeyboardConfig::wireless(),
    );

    assert!(keyboard.transport().link().advertising);

    switches.borrow_mut()[0][1] = true;
    hold(&mut keyboard, &time, 10);
    assert!(keyboard.transport().link().sent.is_empty());
    assert!(keyboard.transport().report().is_empty());

    // The key still held at connect time is not replayed
    connected.set(true);
    hold(&mut keyboard, &time, 10);
    assert_eq!(keyboard.transport().link().sent, [report(0, &[])]);

    switches.borrow_mut()[0][1] = false;
    hold(&mut keyboard, &time, 10);
    switches.borrow_mut()[0][1] = true;
    hold(&mut keyboard, &time, 10);
    assert_eq!(
        keyboard.transport().link().sent,
        [report(0, &[]), report(0, &[0x1A])]
    );
}
