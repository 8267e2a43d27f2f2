//! The scan cycle.
//!
//! One [`Keyboard::tick`] runs, in order: matrix scan, debounce update, layer
//! resolution, edge detection and emission, indicator update. [`Keyboard::run`]
//! repeats it forever with a fixed delay in between. Nothing blocks; a
//! transport that is not ready only makes events get dropped.

use embedded_hal::delay::DelayNs;

use crate::config::KeyboardConfig;
use crate::debounce::Debouncer;
use crate::emitter::{EdgeDetector, EmitStats, KeyAction};
use crate::indicator::{Signal, StatusIndicator, StatusLed};
use crate::keymap::Keymap;
use crate::matrix::{MatrixPins, MatrixState, Scanner};
use crate::transport::HidTransport;

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// What happened during one cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    pub now_ms: u32,
    /// False if the debouncer skipped this cycle (same millisecond).
    pub debounced: bool,
    pub layer: usize,
    pub ready: bool,
    pub active: bool,
    pub events: EmitStats,
    pub signal: Signal,
}

pub struct Keyboard<'a, P, D, T, L, K, const ROW: usize, const COL: usize> {
    scanner: Scanner<P, D, ROW, COL>,
    debouncer: Debouncer<ROW, COL>,
    detector: EdgeDetector<ROW, COL>,
    keymap: &'a Keymap<ROW, COL>,
    transport: T,
    led: L,
    clock: K,
    indicator: StatusIndicator,
    scan_interval_ms: u32,
    /// Transport readiness seen on the previous cycle
    was_ready: bool,
    last_signal: Option<Signal>,
}

impl<'a, P, D, T, L, K, const ROW: usize, const COL: usize> Keyboard<'a, P, D, T, L, K, ROW, COL>
where
    P: MatrixPins<ROW, COL>,
    D: DelayNs,
    T: HidTransport,
    L: StatusLed,
    K: Clock,
{
    pub fn new(
        pins: P,
        delay: D,
        keymap: &'a Keymap<ROW, COL>,
        transport: T,
        led: L,
        clock: K,
        config: KeyboardConfig,
    ) -> Self {
        let was_ready = transport.is_ready();
        Self {
            scanner: Scanner::new(pins, delay, config.settle_us, config.column_gap_us),
            debouncer: Debouncer::new(config.debounce_threshold),
            detector: EdgeDetector::new(),
            keymap,
            transport,
            led,
            clock,
            indicator: StatusIndicator::new(config.indicator),
            scan_interval_ms: config.scan_interval_ms,
            was_ready,
            last_signal: None,
        }
    }

    /// Run one scan cycle.
    pub fn tick(&mut self) -> CycleReport {
        let now_ms = self.clock.now_ms();

        let raw = self.scanner.scan();
        let debounced = self.debouncer.update(&raw, now_ms);
        let state = self.debouncer.state();
        let layer = self.keymap.active_layer(state);

        // Readiness is sampled once and holds for the whole cycle
        let ready = self.transport.is_ready();
        if ready != self.was_ready {
            if ready {
                info!("transport ready");
                // Anything held before the outage is stale on the host side
                self.detector.forget_held();
                self.transport.release_all();
            } else {
                info!("transport not ready, dropping key events");
            }
            self.was_ready = ready;
        }

        let transport = &mut self.transport;
        let events = self.detector.emit(state, layer, self.keymap, ready, |event| {
            debug!("{:?} {:?} at ({}, {})", event.action, event.code, event.row, event.col);
            match event.action {
                KeyAction::Press => transport.press(event.code),
                KeyAction::Release => transport.release(event.code),
            }
        });
        if events.dropped > 0 {
            debug!("dropped {} key events", events.dropped);
        }

        let active = self.keymap.is_active(state, layer);
        let signal = self.indicator.update(active, ready, now_ms);
        if self.last_signal != Some(signal) {
            self.led.show(signal);
            self.last_signal = Some(signal);
        }

        CycleReport {
            now_ms,
            debounced,
            layer,
            ready,
            active,
            events,
            signal,
        }
    }

    /// Scan forever. `service` runs before every cycle, e.g. to poll the
    /// USB controller behind the transport.
    pub fn run<F: FnMut(&mut T)>(&mut self, mut service: F) -> ! {
        info!("scanning {}x{} matrix", ROW, COL);
        loop {
            service(&mut self.transport);
            self.tick();
            self.scanner.delay_mut().delay_ms(self.scan_interval_ms);
        }
    }

    pub fn debounced(&self) -> &MatrixState<ROW, COL> {
        self.debouncer.state()
    }

    /// Debounced state as of the last emission pass.
    pub fn previous(&self) -> &MatrixState<ROW, COL> {
        self.detector.previous()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

}
