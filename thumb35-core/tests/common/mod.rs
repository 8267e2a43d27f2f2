//! Simulated hardware for driving a [`Keyboard`] cycle by cycle.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal_mock::eh1::delay::NoopDelay;
use thumb35_core::indicator::{Signal, StatusLed};
use thumb35_core::layout::{COLS, ROWS, THUMB35};
use thumb35_core::matrix::MatrixPins;
use thumb35_core::transport::HidTransport;
use thumb35_core::{Clock, CycleReport, KeyCode, Keyboard, KeyboardConfig};

pub fn init_log() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub type Switches = Rc<RefCell<[[bool; COLS]; ROWS]>>;

/// Switch matrix where at most one column may be driven at a time.
pub struct SimMatrix {
    closed: Switches,
    active: Option<usize>,
}

impl SimMatrix {
    pub fn new(closed: Switches) -> Self {
        Self {
            closed,
            active: None,
        }
    }
}

impl MatrixPins<ROWS, COLS> for SimMatrix {
    fn set_column_active(&mut self, col: usize, active: bool) {
        if active {
            assert!(self.active.is_none(), "two columns driven at once");
            self.active = Some(col);
        } else {
            self.active = None;
        }
    }

    fn read_row(&mut self, row: usize) -> bool {
        match self.active {
            Some(col) => self.closed.borrow()[row][col],
            None => false,
        }
    }
}

pub struct ManualClock(pub Rc<Cell<u32>>);

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.0.get()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Press(KeyCode),
    Release(KeyCode),
    ReleaseAll,
}

/// Records every call; readiness is controlled by the test.
pub struct RecordingTransport {
    ready: Rc<Cell<bool>>,
    calls: Rc<RefCell<Vec<Call>>>,
}

impl HidTransport for RecordingTransport {
    fn is_ready(&self) -> bool {
        self.ready.get()
    }

    fn press(&mut self, code: KeyCode) {
        self.calls.borrow_mut().push(Call::Press(code));
    }

    fn release(&mut self, code: KeyCode) {
        self.calls.borrow_mut().push(Call::Release(code));
    }

    fn release_all(&mut self) {
        self.calls.borrow_mut().push(Call::ReleaseAll);
    }
}

pub struct RecordingLed(pub Rc<RefCell<Vec<Signal>>>);

impl StatusLed for RecordingLed {
    fn show(&mut self, signal: Signal) {
        self.0.borrow_mut().push(signal);
    }
}

pub type TestKeyboard =
    Keyboard<'static, SimMatrix, NoopDelay, RecordingTransport, RecordingLed, ManualClock, ROWS, COLS>;

/// A keyboard on the reference layout plus handles on its simulated hardware.
pub struct Rig {
    pub keyboard: TestKeyboard,
    switches: Switches,
    time: Rc<Cell<u32>>,
    ready: Rc<Cell<bool>>,
    calls: Rc<RefCell<Vec<Call>>>,
    signals: Rc<RefCell<Vec<Signal>>>,
}

impl Rig {
    pub fn new(ready: bool, config: KeyboardConfig) -> Self {
        init_log();

        let switches: Switches = Rc::new(RefCell::new([[false; COLS]; ROWS]));
        let time = Rc::new(Cell::new(0));
        let ready = Rc::new(Cell::new(ready));
        let calls = Rc::new(RefCell::new(Vec::new()));
        let signals = Rc::new(RefCell::new(Vec::new()));

        let keyboard = Keyboard::new(
            SimMatrix::new(switches.clone()),
            NoopDelay::new(),
            &THUMB35,
            RecordingTransport {
                ready: ready.clone(),
                calls: calls.clone(),
            },
            RecordingLed(signals.clone()),
            ManualClock(time.clone()),
            config,
        );

        Self {
            keyboard,
            switches,
            time,
            ready,
            calls,
            signals,
        }
    }

    pub fn wired() -> Self {
        Self::new(true, KeyboardConfig::wired())
    }

    /// Close or open the switch at (row, col).
    pub fn set(&self, row: usize, col: usize, closed: bool) {
        self.switches.borrow_mut()[row][col] = closed;
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.set(ready);
    }

    /// Advance the clock by one millisecond and run a cycle.
    pub fn step(&mut self) -> CycleReport {
        self.time.set(self.time.get() + 1);
        let report = self.keyboard.tick();
        assert_eq!(
            self.keyboard.previous(),
            self.keyboard.debounced(),
            "previous state lags the debounced state"
        );
        report
    }

    pub fn steps(&mut self, n: usize) -> CycleReport {
        let mut last = None;
        for _ in 0..n {
            last = Some(self.step());
        }
        last.expect("at least one step")
    }

    /// Run a cycle without advancing the clock.
    pub fn tick_same_ms(&mut self) -> CycleReport {
        self.keyboard.tick()
    }

    pub fn now(&self) -> u32 {
        self.time.get()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<Call> {
        self.calls.borrow_mut().drain(..).collect()
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.signals.borrow().clone()
    }
}
