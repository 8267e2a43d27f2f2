//! Boot-protocol keyboard report.
//!
//! Layout (8 bytes):
//! ```text
//! Byte 0: modifier keys bitmask (bit 0 = LCtrl .. bit 7 = RGui)
//! Byte 1: reserved (0x00)
//! Byte 2-7: up to 6 simultaneous key usages
//! ```

use crate::keycode::{HidKey, Modifier};

/// Report size in bytes.
pub const REPORT_LEN: usize = 8;
/// Key slots in a boot report.
pub const MAX_KEYS: usize = 6;

/// HID report descriptor for a standard boot keyboard.
pub const BOOT_KEYBOARD_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    // Modifier keys (8 bits)
    0x05, 0x07, //   Usage Page (Key Codes)
    0x19, 0xE0, //   Usage Minimum (224) - LCtrl
    0x29, 0xE7, //   Usage Maximum (231) - RGui
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    // Reserved byte
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Constant)
    // LEDs (5 bits)
    0x95, 0x05, //   Report Count (5)
    0x75, 0x01, //   Report Size (1)
    0x05, 0x08, //   Usage Page (LEDs)
    0x19, 0x01, //   Usage Minimum (1)
    0x29, 0x05, //   Usage Maximum (5)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    // LED padding (3 bits)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x03, //   Report Size (3)
    0x91, 0x01, //   Output (Constant)
    // Key usages (6 bytes)
    0x95, 0x06, //   Report Count (6)
    0x75, 0x08, //   Report Size (8)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x05, 0x07, //   Usage Page (Key Codes)
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0xFF, //   Usage Maximum (255)
    0x81, 0x00, //   Input (Data, Array)
    0xC0, // End Collection
];

/// Result of adding a key to the report.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressOutcome {
    /// The report changed.
    Added,
    /// The key was already in the report.
    AlreadyHeld,
    /// All six slots are taken; the key is dropped.
    Full,
}

/// The set of currently held keys, in boot report form.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootReport {
    modifiers: u8,
    keys: [u8; MAX_KEYS],
    /// Slot needs an implicit Left Shift (shifted ASCII characters).
    shifted: [bool; MAX_KEYS],
}

impl BootReport {
    pub const fn empty() -> Self {
        Self {
            modifiers: 0,
            keys: [0; MAX_KEYS],
            shifted: [false; MAX_KEYS],
        }
    }

    pub fn press(&mut self, key: HidKey) -> PressOutcome {
        match key {
            HidKey::Modifier(bit) => {
                if self.modifiers & bit != 0 {
                    return PressOutcome::AlreadyHeld;
                }
                self.modifiers |= bit;
                PressOutcome::Added
            }
            HidKey::Key { usage, shift } => {
                if self.keys.contains(&usage) {
                    return PressOutcome::AlreadyHeld;
                }
                match self.keys.iter().position(|&k| k == 0) {
                    Some(slot) => {
                        self.keys[slot] = usage;
                        self.shifted[slot] = shift;
                        PressOutcome::Added
                    }
                    None => PressOutcome::Full,
                }
            }
        }
    }

    /// Returns true if the report changed.
    pub fn release(&mut self, key: HidKey) -> bool {
        match key {
            HidKey::Modifier(bit) => {
                let held = self.modifiers & bit != 0;
                self.modifiers &= !bit;
                held
            }
            HidKey::Key { usage, .. } => match self.keys.iter().position(|&k| k == usage) {
                Some(slot) => {
                    self.keys[slot] = 0;
                    self.shifted[slot] = false;
                    true
                }
                None => false,
            },
        }
    }

    pub fn release_all(&mut self) {
        *self = Self::empty();
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers == 0 && self.keys.iter().all(|&k| k == 0)
    }

    /// Modifier byte as sent, including implicit shifts.
    pub fn modifier_byte(&self) -> u8 {
        if self.shifted.iter().any(|&s| s) {
            self.modifiers | Modifier::LeftShift.bit()
        } else {
            self.modifiers
        }
    }

    pub fn keys(&self) -> &[u8; MAX_KEYS] {
        &self.keys
    }

    pub fn to_bytes(&self) -> [u8; REPORT_LEN] {
        let mut bytes = [0u8; REPORT_LEN];
        bytes[0] = self.modifier_byte();
        bytes[2..].copy_from_slice(&self.keys);
        bytes
    }
}
