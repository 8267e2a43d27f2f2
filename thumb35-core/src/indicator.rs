//! Status indicator state machine.
//!
//! Solid while a key is active. Otherwise the light toggles, fast while the
//! transport is not ready and slowly once it is. How a signal looks (a plain
//! LED, a colour on an RGB LED) is up to the [`StatusLed`] implementation.

use crate::config::IndicatorConfig;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indication {
    /// A key is pressed
    Active,
    /// Waiting for the host (unpaired / disconnected)
    NotReady,
    /// Idle and connected
    Ready,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Signal {
    pub indication: Indication,
    /// Whether the light is on
    pub lit: bool,
}

/// Drives the physical indicator.
pub trait StatusLed {
    fn show(&mut self, signal: Signal);
}

pub struct StatusIndicator {
    config: IndicatorConfig,
    blink_on: bool,
    last_toggle_ms: u32,
}

impl StatusIndicator {
    pub const fn new(config: IndicatorConfig) -> Self {
        Self {
            config,
            blink_on: false,
            last_toggle_ms: 0,
        }
    }

    pub fn update(&mut self, active: bool, ready: bool, now_ms: u32) -> Signal {
        if active {
            return Signal {
                indication: Indication::Active,
                lit: true,
            };
        }

        let (indication, period) = if ready {
            (Indication::Ready, self.config.ready_toggle_ms)
        } else {
            (Indication::NotReady, self.config.not_ready_toggle_ms)
        };

        if now_ms.wrapping_sub(self.last_toggle_ms) >= period {
            self.blink_on = !self.blink_on;
            self.last_toggle_ms = now_ms;
        }

        Signal {
            indication,
            lit: self.blink_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_at(indicator: &mut StatusIndicator, ready: bool, times: &[u32]) -> Vec<bool> {
        times
            .iter()
            .map(|&t| indicator.update(false, ready, t).lit)
            .collect()
    }

    #[test]
    fn active_wins_over_everything() {
        let mut indicator = StatusIndicator::new(IndicatorConfig::wireless());
        for ready in [false, true] {
            let signal = indicator.update(true, ready, 10);
            assert_eq!(
                signal,
                Signal {
                    indication: Indication::Active,
                    lit: true
                }
            );
        }
    }

    #[test]
    fn not_ready_blinks_fast() {
        let mut indicator = StatusIndicator::new(IndicatorConfig::wireless());
        assert_eq!(
            lit_at(&mut indicator, false, &[250, 300, 499, 500, 750]),
            [true, true, true, false, true]
        );
        assert_eq!(indicator.update(false, false, 800).indication, Indication::NotReady);
    }

    #[test]
    fn ready_blinks_slowly() {
        let mut indicator = StatusIndicator::new(IndicatorConfig::wireless());
        assert_eq!(
            lit_at(&mut indicator, true, &[0, 1999, 2000, 3999, 4000]),
            [false, false, true, true, false]
        );
        assert_eq!(indicator.update(false, true, 4001).indication, Indication::Ready);
    }

    #[test]
    fn blinking_resumes_after_activity() {
        let mut indicator = StatusIndicator::new(IndicatorConfig::wired());
        assert!(indicator.update(false, true, 1000).lit);
        assert!(indicator.update(true, true, 1500).lit);
        // Phase is kept across the active period
        assert!(indicator.update(false, true, 1600).lit);
        assert!(!indicator.update(false, true, 2000).lit);
    }
}
