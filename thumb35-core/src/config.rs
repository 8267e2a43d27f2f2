//! Keyboard configuration.
//!
//! Everything here is a plain value fixed at build time; there is no runtime
//! configuration protocol and nothing is persisted.

use crate::debounce::DEBOUNCE_THRESHOLD;
use crate::matrix::{COLUMN_GAP_US, COLUMN_SETTLE_US};

/// Blink timing of the status indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorConfig {
    /// Toggle period while the transport is not ready (waiting for pairing).
    pub not_ready_toggle_ms: u32,
    /// Toggle period while the transport is ready.
    pub ready_toggle_ms: u32,
}

impl IndicatorConfig {
    /// Steady one second heartbeat.
    pub const fn wired() -> Self {
        Self {
            not_ready_toggle_ms: 250,
            ready_toggle_ms: 1000,
        }
    }

    /// Fast blink while unpaired, slow blink once connected.
    pub const fn wireless() -> Self {
        Self {
            not_ready_toggle_ms: 250,
            ready_toggle_ms: 2000,
        }
    }
}

/// Scan loop configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardConfig {
    /// Consecutive disagreeing scans before a key changes state.
    pub debounce_threshold: u8,
    /// Delay between scan cycles.
    pub scan_interval_ms: u32,
    /// Settle time after driving a column, before reading rows.
    pub settle_us: u32,
    /// Gap after releasing a column, before driving the next.
    pub column_gap_us: u32,
    pub indicator: IndicatorConfig,
}

impl KeyboardConfig {
    pub const fn wired() -> Self {
        Self {
            debounce_threshold: DEBOUNCE_THRESHOLD,
            scan_interval_ms: 1,
            settle_us: COLUMN_SETTLE_US,
            column_gap_us: COLUMN_GAP_US,
            indicator: IndicatorConfig::wired(),
        }
    }

    /// A longer cycle eases pressure on the BLE stack.
    pub const fn wireless() -> Self {
        Self {
            scan_interval_ms: 5,
            indicator: IndicatorConfig::wireless(),
            ..Self::wired()
        }
    }
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self::wired()
    }
}

/// USB device identity for the wired board.
#[derive(Clone, Copy, Debug)]
pub struct UsbConfig<'a> {
    pub vid: u16,
    pub pid: u16,
    pub manufacturer: &'a str,
    pub product: &'a str,
    /// Wait after enabling the USB controller before scanning.
    pub startup_settle_ms: u32,
}

impl Default for UsbConfig<'_> {
    fn default() -> Self {
        Self {
            vid: 0x16C0,
            pid: 0x047E,
            manufacturer: "MicroKeyboard",
            product: "Thumb35",
            startup_settle_ms: 100,
        }
    }
}

/// BLE identity for the wireless board.
#[derive(Clone, Copy, Debug)]
pub struct BleConfig<'a> {
    /// Name the keyboard advertises under.
    pub device_name: &'a str,
    pub manufacturer: &'a str,
    /// Reported battery level, in percent.
    pub battery_level: u8,
    /// Wait for the BLE stack to come up and start advertising.
    pub startup_settle_ms: u32,
}

impl Default for BleConfig<'_> {
    fn default() -> Self {
        Self {
            device_name: "Thumb35",
            manufacturer: "MicroKeyboard",
            battery_level: 100,
            startup_settle_ms: 1000,
        }
    }
}
