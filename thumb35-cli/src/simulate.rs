//! Run the keyboard core against a scripted switch matrix.
//!
//! Time starts at power-on. The board waits out the transport's startup
//! settle, then scans once every `scan_interval_ms`; the script's switch
//! changes land on the millisecond they are stamped with. Every HID call,
//! report sent and indicator change is written to a trace as it happens.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use thumb35_core::hid::REPORT_LEN;
use thumb35_core::indicator::{Signal, StatusLed};
use thumb35_core::layout::{COLS, ROWS, THUMB35};
use thumb35_core::matrix::MatrixPins;
use thumb35_core::transport::{
    BleLink, HidTransport, ReportWriter, WiredTransport, WirelessTransport,
};
use thumb35_core::{BleConfig, Clock, KeyCode, Keyboard, KeyboardConfig, UsbConfig};

use crate::layout::key_label;
use crate::script::{Action, Step};

/// Which transport the simulated board uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// USB, ready from power-on
    Wired,
    /// BLE, disconnected until the script brings the link up
    Wireless,
}

type Switches = Rc<RefCell<[[bool; COLS]; ROWS]>>;

/// Shared output log stamped with the simulated time.
#[derive(Clone)]
struct Trace {
    now: Rc<Cell<u32>>,
    lines: Rc<RefCell<Vec<String>>>,
}

impl Trace {
    fn push(&self, msg: String) {
        let line = format!("{:>6} ms  {}", self.now.get(), msg);
        log::debug!("{}", line);
        self.lines.borrow_mut().push(line);
    }
}

struct SimPins {
    closed: Switches,
    active: Option<usize>,
}

impl MatrixPins<ROWS, COLS> for SimPins {
    fn set_column_active(&mut self, col: usize, active: bool) {
        self.active = if active { Some(col) } else { None };
    }

    fn read_row(&mut self, row: usize) -> bool {
        self.active
            .map(|col| self.closed.borrow()[row][col])
            .unwrap_or(false)
    }
}

/// Settling delays cost nothing in simulation.
struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

struct SimClock(Rc<Cell<u32>>);

impl Clock for SimClock {
    fn now_ms(&self) -> u32 {
        self.0.get()
    }
}

fn hex_report(report: &[u8; REPORT_LEN]) -> String {
    report
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

struct UsbEndpoint(Trace);

impl ReportWriter for UsbEndpoint {
    fn write_report(&mut self, report: &[u8; REPORT_LEN]) {
        self.0.push(format!("usb report [{}]", hex_report(report)));
    }
}

struct Radio {
    connected: Rc<Cell<bool>>,
    trace: Trace,
}

impl BleLink for Radio {
    fn advertise(&mut self, config: &BleConfig<'_>) {
        self.trace
            .push(format!("ble advertising as {}", config.device_name));
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn send_report(&mut self, report: &[u8; REPORT_LEN]) {
        self.trace
            .push(format!("ble report [{}]", hex_report(report)));
    }
}

/// Writes HID calls to the trace before handing them on.
struct Traced<T> {
    inner: T,
    trace: Trace,
}

fn describe(code: KeyCode) -> String {
    match key_label(code) {
        label if label.is_empty() => format!("{:?}", code),
        label => label,
    }
}

impl<T: HidTransport> HidTransport for Traced<T> {
    fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    fn press(&mut self, code: KeyCode) {
        self.trace.push(format!("press {}", describe(code)));
        self.inner.press(code);
    }

    fn release(&mut self, code: KeyCode) {
        self.trace.push(format!("release {}", describe(code)));
        self.inner.release(code);
    }

    fn release_all(&mut self) {
        self.trace.push("release all".to_string());
        self.inner.release_all();
    }
}

struct TracedLed(Trace);

impl StatusLed for TracedLed {
    fn show(&mut self, signal: Signal) {
        self.0.push(format!(
            "led {:?} {}",
            signal.indication,
            if signal.lit { "on" } else { "off" }
        ));
    }
}

/// Run `steps` for `duration_ms` simulated milliseconds and return the trace.
pub fn simulate(steps: &[Step], link: Link, duration_ms: u32) -> Vec<String> {
    let trace = Trace {
        now: Rc::new(Cell::new(0)),
        lines: Rc::new(RefCell::new(Vec::new())),
    };
    let switches: Switches = Rc::new(RefCell::new([[false; COLS]; ROWS]));
    let connected = Rc::new(Cell::new(false));

    let pins = SimPins {
        closed: switches.clone(),
        active: None,
    };
    let led = TracedLed(trace.clone());
    let clock = SimClock(trace.now.clone());

    match link {
        Link::Wired => {
            let usb = UsbConfig::default();
            let config = KeyboardConfig::wired();
            let transport = Traced {
                inner: WiredTransport::new(UsbEndpoint(trace.clone())),
                trace: trace.clone(),
            };
            let mut keyboard = Keyboard::new(
                pins,
                NoDelay,
                &THUMB35,
                transport,
                led,
                clock,
                config,
            );
            let cadence = Cadence {
                settle_ms: usb.startup_settle_ms,
                interval_ms: config.scan_interval_ms,
            };
            drive(steps, duration_ms, cadence, &trace, &switches, &connected, || {
                keyboard.tick();
            });
        }
        Link::Wireless => {
            let ble = BleConfig::default();
            let config = KeyboardConfig::wireless();
            let radio = Radio {
                connected: connected.clone(),
                trace: trace.clone(),
            };
            let transport = Traced {
                inner: WirelessTransport::new(radio, &ble),
                trace: trace.clone(),
            };
            let mut keyboard = Keyboard::new(
                pins,
                NoDelay,
                &THUMB35,
                transport,
                led,
                clock,
                config,
            );
            let cadence = Cadence {
                settle_ms: ble.startup_settle_ms,
                interval_ms: config.scan_interval_ms,
            };
            drive(steps, duration_ms, cadence, &trace, &switches, &connected, || {
                keyboard.tick();
            });
        }
    }

    let lines = trace.lines.borrow().clone();
    lines
}

/// When the simulated board scans.
#[derive(Debug, Clone, Copy)]
struct Cadence {
    /// No scans before this.
    settle_ms: u32,
    interval_ms: u32,
}

impl Cadence {
    fn scans_at(&self, now: u32) -> bool {
        now >= self.settle_ms && (now - self.settle_ms) % self.interval_ms.max(1) == 0
    }
}

fn drive(
    steps: &[Step],
    duration_ms: u32,
    cadence: Cadence,
    trace: &Trace,
    switches: &Switches,
    connected: &Rc<Cell<bool>>,
    mut tick: impl FnMut(),
) {
    let mut pending = steps.iter().peekable();

    for now in 0..=duration_ms {
        trace.now.set(now);

        while let Some(step) = pending.next_if(|s| s.at_ms <= now) {
            match step.action {
                Action::Press(row, col) => switches.borrow_mut()[row][col] = true,
                Action::Release(row, col) => switches.borrow_mut()[row][col] = false,
                Action::Link(up) => {
                    trace.push(format!("link {}", if up { "up" } else { "down" }));
                    connected.set(up);
                }
            }
        }

        if cadence.scans_at(now) {
            tick();
        }
    }

    if pending.peek().is_some() {
        log::warn!("{} events after {} ms were not run", pending.count(), duration_ms);
    }
}
