//! Firmware core for the Thumb35 keyboard.
//!
//! This crate is `no_std` so it can be used by both the board firmware and
//! the native CLI tool. It covers:
//! - Matrix scanning over a narrow pin capability
//! - Per-key debouncing
//! - Two-layer keymap with a momentary Fn key
//! - Press/release edge detection
//! - Wired and wireless boot keyboard transports
//! - The status indicator state machine

#![cfg_attr(not(test), no_std)]

// Must go first so the other modules see its macros
mod fmt;

pub mod config;
pub mod debounce;
pub mod emitter;
pub mod hid;
pub mod indicator;
pub mod keyboard;
pub mod keycode;
pub mod keymap;
pub mod layout;
pub mod matrix;
pub mod transport;

pub use config::{BleConfig, IndicatorConfig, KeyboardConfig, UsbConfig};
pub use keyboard::{Clock, CycleReport, Keyboard};
pub use keycode::{KeyCode, Modifier, NamedKey};
pub use keymap::Keymap;
