//! HID transports.
//!
//! Both transports keep the held keys in a [`BootReport`] and push the whole
//! report to their backend whenever it changes. The wired one is always
//! ready. The wireless one is ready only while its link is connected, and
//! drops calls otherwise.

use crate::config::BleConfig;
use crate::hid::{BootReport, PressOutcome, REPORT_LEN};
use crate::keycode::KeyCode;

/// Destination of key events.
pub trait HidTransport {
    /// Whether press/release calls currently reach the host.
    fn is_ready(&self) -> bool;

    fn press(&mut self, code: KeyCode);

    fn release(&mut self, code: KeyCode);

    /// Release everything and tell the host.
    fn release_all(&mut self);
}

/// Sends raw reports on a wired HID interface, e.g. a USB interrupt endpoint.
pub trait ReportWriter {
    fn write_report(&mut self, report: &[u8; REPORT_LEN]);
}

/// A BLE HID link, managed by the wireless stack.
pub trait BleLink {
    /// Start advertising under the name and manufacturer in `config`.
    fn advertise(&mut self, config: &BleConfig<'_>);

    /// Paired and connected to a host.
    fn is_connected(&self) -> bool;

    fn send_report(&mut self, report: &[u8; REPORT_LEN]);
}

/// Apply a press to `report`; true if it has to be sent.
fn press_into(report: &mut BootReport, code: KeyCode) -> bool {
    let Some(key) = code.to_hid() else {
        debug!("no HID usage for {:?}", code);
        return false;
    };
    match report.press(key) {
        PressOutcome::Added => true,
        PressOutcome::AlreadyHeld => false,
        PressOutcome::Full => {
            warn!("report full, dropping {:?}", code);
            false
        }
    }
}

fn release_from(report: &mut BootReport, code: KeyCode) -> bool {
    code.to_hid().map(|key| report.release(key)).unwrap_or(false)
}

/// Boot keyboard over a wired link.
pub struct WiredTransport<W: ReportWriter> {
    writer: W,
    report: BootReport,
}

impl<W: ReportWriter> WiredTransport<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            report: BootReport::empty(),
        }
    }

    pub fn report(&self) -> &BootReport {
        &self.report
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    fn send(&mut self) {
        self.writer.write_report(&self.report.to_bytes());
    }
}

impl<W: ReportWriter> HidTransport for WiredTransport<W> {
    fn is_ready(&self) -> bool {
        true
    }

    fn press(&mut self, code: KeyCode) {
        if press_into(&mut self.report, code) {
            self.send();
        }
    }

    fn release(&mut self, code: KeyCode) {
        if release_from(&mut self.report, code) {
            self.send();
        }
    }

    fn release_all(&mut self) {
        self.report.release_all();
        self.send();
    }
}

/// Boot keyboard over BLE.
pub struct WirelessTransport<L: BleLink> {
    link: L,
    report: BootReport,
}

impl<L: BleLink> WirelessTransport<L> {
    /// Takes over `link` and starts it advertising.
    pub fn new(mut link: L, config: &BleConfig<'_>) -> Self {
        info!("advertising as {}", config.device_name);
        link.advertise(config);
        Self {
            link,
            report: BootReport::empty(),
        }
    }

    pub fn report(&self) -> &BootReport {
        &self.report
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    fn send(&mut self) {
        self.link.send_report(&self.report.to_bytes());
    }
}

impl<L: BleLink> HidTransport for WirelessTransport<L> {
    fn is_ready(&self) -> bool {
        self.link.is_connected()
    }

    fn press(&mut self, code: KeyCode) {
        if !self.link.is_connected() {
            debug!("link down, dropping press of {:?}", code);
            return;
        }
        if press_into(&mut self.report, code) {
            self.send();
        }
    }

    fn release(&mut self, code: KeyCode) {
        if !self.link.is_connected() {
            debug!("link down, dropping release of {:?}", code);
            return;
        }
        if release_from(&mut self.report, code) {
            self.send();
        }
    }

    fn release_all(&mut self) {
        self.report.release_all();
        if self.link.is_connected() {
            self.send();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycode::{Modifier, NamedKey};
    use core::cell::Cell;

    #[derive(Default)]
    struct Reports(Vec<[u8; REPORT_LEN]>);

    impl ReportWriter for Reports {
        fn write_report(&mut self, report: &[u8; REPORT_LEN]) {
            self.0.push(*report);
        }
    }

    struct Link<'a> {
        connected: &'a Cell<bool>,
        advertised: Option<(String, u8)>,
        sent: Vec<[u8; REPORT_LEN]>,
    }

    impl<'a> Link<'a> {
        fn new(connected: &'a Cell<bool>) -> Self {
            Self {
                connected,
                advertised: None,
                sent: Vec::new(),
            }
        }
    }

    impl BleLink for Link<'_> {
        fn advertise(&mut self, config: &BleConfig<'_>) {
            self.advertised = Some((config.device_name.into(), config.battery_level));
        }

        fn is_connected(&self) -> bool {
            self.connected.get()
        }

        fn send_report(&mut self, report: &[u8; REPORT_LEN]) {
            self.sent.push(*report);
        }
    }

    #[test]
    fn wired_sends_a_report_per_change() {
        let mut wired = WiredTransport::new(Reports::default());
        assert!(wired.is_ready());

        wired.press(KeyCode::Printable('q'));
        wired.press(KeyCode::Modifier(Modifier::LeftAlt));
        // Already held, nothing new to say
        wired.press(KeyCode::Printable('q'));
        wired.release(KeyCode::Printable('q'));
        wired.release(KeyCode::Modifier(Modifier::LeftAlt));

        assert_eq!(
            wired.writer().0,
            [
                [0, 0, 0x14, 0, 0, 0, 0, 0],
                [0x04, 0, 0x14, 0, 0, 0, 0, 0],
                [0x04, 0, 0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0, 0, 0],
            ]
        );
    }

    #[test]
    fn wired_ignores_untypeable_codes() {
        let mut wired = WiredTransport::new(Reports::default());
        wired.press(KeyCode::None);
        wired.press(KeyCode::Printable('\u{e9}'));
        wired.release(KeyCode::Named(NamedKey::Enter));
        assert!(wired.writer().0.is_empty());
    }

    #[test]
    fn wireless_drops_calls_while_disconnected() {
        let connected = Cell::new(false);
        let mut ble = WirelessTransport::new(Link::new(&connected), &BleConfig::default());
        assert!(!ble.is_ready());

        ble.press(KeyCode::Printable('a'));
        ble.release(KeyCode::Printable('a'));
        assert!(ble.link().sent.is_empty());
        assert!(ble.report().is_empty());

        connected.set(true);
        assert!(ble.is_ready());
        ble.press(KeyCode::Printable('a'));
        assert_eq!(ble.link().sent, [[0, 0, 0x04, 0, 0, 0, 0, 0]]);
    }

    #[test]
    fn wireless_release_all_clears_local_state_even_when_down() {
        let connected = Cell::new(true);
        let mut ble = WirelessTransport::new(Link::new(&connected), &BleConfig::default());
        ble.press(KeyCode::Printable('a'));

        connected.set(false);
        ble.release_all();
        assert!(ble.report().is_empty());
        assert_eq!(ble.link().sent.len(), 1);

        connected.set(true);
        ble.release_all();
        assert_eq!(ble.link_mut().sent.pop(), Some([0; REPORT_LEN]));
    }

    #[test]
    fn wireless_advertises_with_the_given_config() {
        let connected = Cell::new(false);
        let ble = WirelessTransport::new(Link::new(&connected), &BleConfig::default());
        assert_eq!(ble.link().advertised, Some(("Thumb35".into(), 100)));

        let config = BleConfig {
            device_name: "Thumb35 Left",
            battery_level: 42,
            ..BleConfig::default()
        };
        let ble = WirelessTransport::new(Link::new(&connected), &config);
        assert_eq!(ble.link().advertised, Some(("Thumb35 Left".into(), 42)));
        assert!(ble.link().sent.is_empty());
    }
}
