//! USB boot keyboard for the ATmega32U4.
//!
//! Register-level driver for the built-in USB controller: enumeration on
//! EP0, 8-byte reports on the EP1 interrupt endpoint. Reports come from
//! [`WiredTransport`](thumb35_core::transport::WiredTransport) through
//! [`ReportWriter`].

use avr_device::atmega32u4::{PLL, USB_DEVICE};
use thumb35_core::hid::{BOOT_KEYBOARD_DESCRIPTOR, REPORT_LEN};
use thumb35_core::transport::ReportWriter;
use thumb35_core::UsbConfig;

// USB endpoint configuration for keyboard HID
const EP0_SIZE: u8 = 64; // Control endpoint size
const EP1_SIZE: u8 = REPORT_LEN as u8; // Interrupt IN endpoint size

/// Longest string descriptor we build, in bytes.
const MAX_STRING_DESC: usize = 64;

fn device_descriptor(config: &UsbConfig<'_>) -> [u8; 18] {
    let [vid_l, vid_h] = config.vid.to_le_bytes();
    let [pid_l, pid_h] = config.pid.to_le_bytes();
    [
        18,   // bLength
        1,    // bDescriptorType (Device)
        0x00, 0x02, // bcdUSB (2.0)
        0,    // bDeviceClass (defined at interface level)
        0,    // bDeviceSubClass
        0,    // bDeviceProtocol
        EP0_SIZE, // bMaxPacketSize0
        vid_l, vid_h, // idVendor
        pid_l, pid_h, // idProduct
        0x01, 0x00, // bcdDevice (1.0)
        1,    // iManufacturer
        2,    // iProduct
        0,    // iSerialNumber
        1,    // bNumConfigurations
    ]
}

static CONFIG_DESCRIPTOR: [u8; 34] = [
    // Configuration descriptor
    9,    // bLength
    2,    // bDescriptorType (Configuration)
    34, 0, // wTotalLength
    1,    // bNumInterfaces
    1,    // bConfigurationValue
    0,    // iConfiguration
    0x80, // bmAttributes (bus powered)
    50,   // bMaxPower (100mA)
    // Interface descriptor
    9,    // bLength
    4,    // bDescriptorType (Interface)
    0,    // bInterfaceNumber
    0,    // bAlternateSetting
    1,    // bNumEndpoints
    3,    // bInterfaceClass (HID)
    1,    // bInterfaceSubClass (Boot)
    1,    // bInterfaceProtocol (Keyboard)
    0,    // iInterface
    // HID descriptor
    9,    // bLength
    0x21, // bDescriptorType (HID)
    0x11, 0x01, // bcdHID (1.11)
    0,    // bCountryCode
    1,    // bNumDescriptors
    0x22, // bDescriptorType (Report)
    BOOT_KEYBOARD_DESCRIPTOR.len() as u8, 0, // wDescriptorLength
    // Endpoint descriptor (EP1 IN, interrupt)
    7,    // bLength
    5,    // bDescriptorType (Endpoint)
    0x81, // bEndpointAddress (EP1 IN)
    0x03, // bmAttributes (Interrupt)
    EP1_SIZE, 0, // wMaxPacketSize
    1,    // bInterval (1ms polling)
];

/// String descriptor 0 (language ID)
static STRING_DESC_0: [u8; 4] = [4, 3, 0x09, 0x04]; // English (US)

/// Encode `text` as a UTF-16LE string descriptor, truncating to fit.
fn string_descriptor(text: &str, buf: &mut [u8; MAX_STRING_DESC]) -> usize {
    let mut len = 2;
    for unit in text.encode_utf16() {
        if len + 2 > buf.len() {
            break;
        }
        buf[len..len + 2].copy_from_slice(&unit.to_le_bytes());
        len += 2;
    }
    buf[0] = len as u8;
    buf[1] = 3;
    len
}

/// USB device state.
pub struct UsbKeyboard<'a> {
    usb: &'a USB_DEVICE,
    pll: &'a PLL,
    config: UsbConfig<'a>,
    configured: bool,
}

impl<'a> UsbKeyboard<'a> {
    pub fn new(usb: &'a USB_DEVICE, pll: &'a PLL, config: UsbConfig<'a>) -> Self {
        Self {
            usb,
            pll,
            config,
            configured: false,
        }
    }

    /// Initialize the ATmega32U4 USB controller.
    pub fn init(&mut self) {
        let usb = self.usb;

        // Enable USB pad regulator
        usb.uhwcon.write(|w| w.uvrege().set_bit());

        // Enable USB controller and VBUS pad
        usb.usbcon
            .write(|w| w.usbe().set_bit().otgpade().set_bit());

        // Configure PLL for 16MHz crystal -> 96MHz PLL -> 48MHz USB clock
        // PLLCSR: PINDIV=1 (16MHz), PLLE=1
        self.pll.pllcsr.write(|w| w.pindiv().set_bit().plle().set_bit());

        // Wait for PLL lock
        while self.pll.pllcsr.read().plock().bit_is_clear() {}

        // Enable USB clock
        usb.usbcon.modify(|_, w| w.frzclk().clear_bit());

        // Attach to bus (clear DETACH)
        usb.udcon.modify(|_, w| w.detach().clear_bit());

        // Reset and setup are polled from the main loop, no USB interrupts
        self.configured = false;
    }

    /// Poll for USB events and handle them. Call this from the main loop.
    pub fn poll(&mut self) {
        let usb = self.usb;

        let udint = usb.udint.read();

        // End of reset
        if udint.eorsti().bit_is_set() {
            usb.udint.modify(|_, w| w.eorsti().clear_bit());
            self.configure_ep0();
            self.configured = false;
        }

        // Check for SETUP packet on EP0
        self.select_endpoint(0);
        let ueintx = usb.ueintx.read();
        if ueintx.rxstpi().bit_is_set() {
            self.handle_setup();
        }
    }

    fn configure_ep0(&self) {
        let usb = self.usb;

        self.select_endpoint(0);
        // Enable EP0 as control endpoint, 64 bytes
        usb.ueconx.write(|w| w.epen().set_bit());
        usb.uecfg0x.write(|w| w.eptype().bits(0b00));
        usb.uecfg1x.write(|w| w.epsize().bits(0b011).alloc().set_bit());
    }

    fn configure_ep1(&self) {
        let usb = self.usb;

        self.select_endpoint(1);
        usb.ueconx.write(|w| w.epen().set_bit());
        // Interrupt IN endpoint
        usb.uecfg0x
            .write(|w| w.eptype().bits(0b11).epdir().set_bit());
        usb.uecfg1x.write(|w| w.epsize().bits(0b000).alloc().set_bit());
    }

    fn select_endpoint(&self, ep: u8) {
        self.usb.uenum.write(|w| w.bits(ep & 0x07));
    }

    fn handle_setup(&mut self) {
        let usb = self.usb;

        // Read 8-byte SETUP packet
        let bm_request_type = usb.uedatx.read().bits();
        let b_request = usb.uedatx.read().bits();
        let w_value_l = usb.uedatx.read().bits();
        let w_value_h = usb.uedatx.read().bits();
        let _w_index_l = usb.uedatx.read().bits();
        let _w_index_h = usb.uedatx.read().bits();
        let w_length_l = usb.uedatx.read().bits();
        let w_length_h = usb.uedatx.read().bits();

        // Acknowledge SETUP
        usb.ueintx.modify(|_, w| w.rxstpi().clear_bit());

        let w_length = (w_length_h as u16) << 8 | w_length_l as u16;

        match (bm_request_type, b_request) {
            // GET_DESCRIPTOR
            (0x80, 0x06) => match w_value_h {
                1 => self.send_descriptor(&device_descriptor(&self.config), w_length),
                2 => self.send_descriptor(&CONFIG_DESCRIPTOR, w_length),
                3 => self.send_string(w_value_l, w_length),
                _ => self.stall(),
            },

            // SET_ADDRESS
            (0x00, 0x05) => {
                // Send ZLP first, then set address
                usb.ueintx.modify(|_, w| w.txini().clear_bit());
                while usb.ueintx.read().txini().bit_is_clear() {}
                usb.udaddr
                    .write(|w| w.uadd().bits(w_value_l & 0x7F).adden().set_bit());
            }

            // SET_CONFIGURATION
            (0x00, 0x09) => {
                // Send ZLP
                usb.ueintx.modify(|_, w| w.txini().clear_bit());
                self.configure_ep1();
                self.configured = true;
            }

            // GET_CONFIGURATION
            (0x80, 0x08) => {
                while usb.ueintx.read().txini().bit_is_clear() {}
                usb.uedatx
                    .write(|w| w.bits(if self.configured { 1 } else { 0 }));
                usb.ueintx.modify(|_, w| w.txini().clear_bit());
            }

            // HID GET_DESCRIPTOR (interface-level)
            (0x81, 0x06) => match w_value_h {
                0x22 => self.send_descriptor(BOOT_KEYBOARD_DESCRIPTOR, w_length),
                _ => self.stall(),
            },

            // HID SET_IDLE, SET_PROTOCOL
            (0x21, 0x0A) | (0x21, 0x0B) => {
                // Send ZLP
                usb.ueintx.modify(|_, w| w.txini().clear_bit());
            }

            _ => self.stall(),
        }
    }

    fn send_string(&self, index: u8, max_length: u16) {
        let text = match index {
            0 => return self.send_descriptor(&STRING_DESC_0, max_length),
            1 => self.config.manufacturer,
            2 => self.config.product,
            _ => return self.stall(),
        };
        let mut buf = [0u8; MAX_STRING_DESC];
        let len = string_descriptor(text, &mut buf);
        self.send_descriptor(&buf[..len], max_length);
    }

    fn send_descriptor(&self, desc: &[u8], max_length: u16) {
        let usb = self.usb;
        let len = core::cmp::min(desc.len(), max_length as usize);
        let mut sent = 0;

        while sent < len {
            while usb.ueintx.read().txini().bit_is_clear() {}

            let chunk_end = core::cmp::min(sent + EP0_SIZE as usize, len);
            for &byte in &desc[sent..chunk_end] {
                usb.uedatx.write(|w| w.bits(byte));
            }

            usb.ueintx.modify(|_, w| w.txini().clear_bit());
            sent = chunk_end;
        }

        // Wait for status stage (host sends ZLP)
        while usb.ueintx.read().rxouti().bit_is_clear() {}
        usb.ueintx.modify(|_, w| w.rxouti().clear_bit());
    }

    fn stall(&self) {
        self.usb.ueconx.modify(|_, w| w.stallrq().set_bit());
    }
}

impl ReportWriter for UsbKeyboard<'_> {
    /// Reports written before the host configures the device are dropped.
    fn write_report(&mut self, report: &[u8; REPORT_LEN]) {
        if !self.configured {
            return;
        }

        let usb = self.usb;
        self.select_endpoint(1);

        // Wait for endpoint ready (RWAL set means we can write)
        let mut timeout: u16 = 0xFFFF;
        while usb.ueintx.read().rwal().bit_is_clear() {
            timeout = timeout.wrapping_sub(1);
            if timeout == 0 {
                return;
            }
        }

        for &byte in report {
            usb.uedatx.write(|w| w.bits(byte));
        }

        // Clear FIFOCON and TXINI to send
        usb.ueintx
            .modify(|_, w| w.fifocon().clear_bit().txini().clear_bit());
    }
}
