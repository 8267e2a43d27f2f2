//! Key codes stored in the keymap and their translation to HID usages.
//!
//! See USB HID Usage Tables, Section 10 (Keyboard/Keypad Page 0x07).

/// A semantic key code, as stored in the keymap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyCode {
    /// Inert position, never produces a HID event
    None,
    /// A character typed through the host's US layout
    Printable(char),
    /// A non-printing key
    Named(NamedKey),
    /// A modifier, reported in the modifier byte
    Modifier(Modifier),
}

/// Non-printing keys, encoded as their HID usage id.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum NamedKey {
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    CapsLock = 0x39,

    // Function keys
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,

    // Navigation
    PrintScreen = 0x46,
    ScrollLock = 0x47,
    Pause = 0x48,
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    Right = 0x4F,
    Left = 0x50,
    Down = 0x51,
    Up = 0x52,
}

impl NamedKey {
    pub fn usage(self) -> u8 {
        self as u8
    }

    /// Short label for layout renderings.
    pub fn label(self) -> &'static str {
        match self {
            NamedKey::Enter => "Ent",
            NamedKey::Escape => "Esc",
            NamedKey::Backspace => "Bksp",
            NamedKey::Tab => "Tab",
            NamedKey::CapsLock => "Caps",
            NamedKey::F1 => "F1",
            NamedKey::F2 => "F2",
            NamedKey::F3 => "F3",
            NamedKey::F4 => "F4",
            NamedKey::F5 => "F5",
            NamedKey::F6 => "F6",
            NamedKey::F7 => "F7",
            NamedKey::F8 => "F8",
            NamedKey::F9 => "F9",
            NamedKey::F10 => "F10",
            NamedKey::F11 => "F11",
            NamedKey::F12 => "F12",
            NamedKey::PrintScreen => "PScr",
            NamedKey::ScrollLock => "ScrL",
            NamedKey::Pause => "Paus",
            NamedKey::Insert => "Ins",
            NamedKey::Home => "Home",
            NamedKey::PageUp => "PgUp",
            NamedKey::Delete => "Del",
            NamedKey::End => "End",
            NamedKey::PageDown => "PgDn",
            NamedKey::Right => "\u{2192}",
            NamedKey::Left => "\u{2190}",
            NamedKey::Down => "\u{2193}",
            NamedKey::Up => "\u{2191}",
        }
    }
}

/// Modifier keys, in modifier-byte bit order (bit 0 = LeftCtrl).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Modifier {
    LeftCtrl = 0,
    LeftShift = 1,
    LeftAlt = 2,
    LeftGui = 3,
    RightCtrl = 4,
    RightShift = 5,
    RightAlt = 6,
    RightGui = 7,
}

impl Modifier {
    /// Bit mask in the report's modifier byte.
    pub fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// HID usage id (0xE0..=0xE7).
    pub fn usage(self) -> u8 {
        0xE0 + self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Modifier::LeftCtrl => "Ctrl",
            Modifier::LeftShift => "Shft",
            Modifier::LeftAlt => "Alt",
            Modifier::LeftGui => "Gui",
            Modifier::RightCtrl => "RCtl",
            Modifier::RightShift => "RSft",
            Modifier::RightAlt => "RAlt",
            Modifier::RightGui => "RGui",
        }
    }
}

/// What a key code becomes inside a boot keyboard report.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidKey {
    /// A key slot entry. `shift` is set for characters that need Shift on a
    /// US layout (uppercase letters, `!`, `?`, ...).
    Key { usage: u8, shift: bool },
    /// A bit in the modifier byte.
    Modifier(u8),
}

impl KeyCode {
    pub fn is_none(self) -> bool {
        self == KeyCode::None
    }

    pub fn is_modifier(self) -> bool {
        matches!(self, KeyCode::Modifier(_))
    }

    /// Translate to a report entry. `None` for inert codes and for characters
    /// the US layout cannot type.
    pub fn to_hid(self) -> Option<HidKey> {
        match self {
            KeyCode::None => None,
            KeyCode::Printable(c) => ascii_usage(c).map(|(usage, shift)| HidKey::Key { usage, shift }),
            KeyCode::Named(key) => Some(HidKey::Key {
                usage: key.usage(),
                shift: false,
            }),
            KeyCode::Modifier(m) => Some(HidKey::Modifier(m.bit())),
        }
    }
}

/// US layout ASCII to (usage, needs shift).
fn ascii_usage(c: char) -> Option<(u8, bool)> {
    let plain = |usage: u8| Some((usage, false));
    let shifted = |usage: u8| Some((usage, true));

    match c {
        'a'..='z' => plain(0x04 + (c as u8 - b'a')),
        'A'..='Z' => shifted(0x04 + (c as u8 - b'A')),
        '1'..='9' => plain(0x1E + (c as u8 - b'1')),
        '0' => plain(0x27),
        '!' => shifted(0x1E),
        '@' => shifted(0x1F),
        '#' => shifted(0x20),
        '$' => shifted(0x21),
        '%' => shifted(0x22),
        '^' => shifted(0x23),
        '&' => shifted(0x24),
        '*' => shifted(0x25),
        '(' => shifted(0x26),
        ')' => shifted(0x27),
        '\n' => plain(0x28),
        '\u{8}' => plain(0x2A),
        '\t' => plain(0x2B),
        ' ' => plain(0x2C),
        '-' => plain(0x2D),
        '_' => shifted(0x2D),
        '=' => plain(0x2E),
        '+' => shifted(0x2E),
        '[' => plain(0x2F),
        '{' => shifted(0x2F),
        ']' => plain(0x30),
        '}' => shifted(0x30),
        '\\' => plain(0x31),
        '|' => shifted(0x31),
        ';' => plain(0x33),
        ':' => shifted(0x33),
        '\'' => plain(0x34),
        '"' => shifted(0x34),
        '`' => plain(0x35),
        '~' => shifted(0x35),
        ',' => plain(0x36),
        '<' => shifted(0x36),
        '.' => plain(0x37),
        '>' => shifted(0x37),
        '/' => plain(0x38),
        '?' => shifted(0x38),
        _ => None,
    }
}
