//! The Thumb35 reference layout: a 4×10 matrix, two layers, Fn at (3, 3).
//!
//! Layer 0: QWERTY letters and punctuation
//! Layer 1: numbers, symbols, arrows and navigation

use crate::keycode::{KeyCode, Modifier, NamedKey};
use crate::keymap::Keymap;

/// Number of rows in the matrix.
pub const ROWS: usize = 4;
/// Number of columns in the matrix.
pub const COLS: usize = 10;
/// Position of the Fn (layer-select) key.
pub const FN_KEY: (usize, usize) = (3, 3);

/// Key is unused in the matrix position.
const ___: KeyCode = KeyCode::None;

const fn p(c: char) -> KeyCode {
    KeyCode::Printable(c)
}

const fn n(key: NamedKey) -> KeyCode {
    KeyCode::Named(key)
}

/// Shorthand aliases for readability.
const ENT: KeyCode = n(NamedKey::Enter);
const ESC: KeyCode = n(NamedKey::Escape);
const BSP: KeyCode = n(NamedKey::Backspace);
const TAB: KeyCode = n(NamedKey::Tab);
const DEL: KeyCode = n(NamedKey::Delete);
const INS: KeyCode = n(NamedKey::Insert);
const HOME: KeyCode = n(NamedKey::Home);
const END: KeyCode = n(NamedKey::End);
const PGUP: KeyCode = n(NamedKey::PageUp);
const PGDN: KeyCode = n(NamedKey::PageDown);
const LEFT: KeyCode = n(NamedKey::Left);
const DOWN: KeyCode = n(NamedKey::Down);
const UP: KeyCode = n(NamedKey::Up);
const RGHT: KeyCode = n(NamedKey::Right);
const LALT: KeyCode = KeyCode::Modifier(Modifier::LeftAlt);
/// The Fn position itself, consumed by the layer resolver.
const FN: KeyCode = KeyCode::None;

pub static THUMB35: Keymap<ROWS, COLS> = Keymap::new(
    [
        // Layer 0
        [
            // Row 0: Q W E R T   Y U I O P
            [p('q'), p('w'), p('e'), p('r'), p('t'), p('y'), p('u'), p('i'), p('o'), p('p')],
            // Row 1: A S D F G   H J K L ;
            [p('a'), p('s'), p('d'), p('f'), p('g'), p('h'), p('j'), p('k'), p('l'), p(';')],
            // Row 2: Z X C V B   N M , . /
            [p('z'), p('x'), p('c'), p('v'), p('b'), p('n'), p('m'), p(','), p('.'), p('/')],
            // Row 3: thumb row, only C2..C6 populated
            [___, ___, p(' '), FN, ENT, BSP, LALT, ___, ___, ___],
        ],
        // Layer 1 (Fn)
        [
            // Row 0: numbers
            [p('1'), p('2'), p('3'), p('4'), p('5'), p('6'), p('7'), p('8'), p('9'), p('0')],
            // Row 1: symbols and editing
            [TAB, ESC, p('-'), p('='), p('`'), p('['), p(']'), p('\\'), p('\''), DEL],
            // Row 2: arrows and navigation
            [LEFT, DOWN, UP, RGHT, n(NamedKey::F1), PGDN, PGUP, HOME, END, INS],
            // Row 3: nothing on the thumb row
            [___, ___, ___, ___, ___, ___, ___, ___, ___, ___],
        ],
    ],
    FN_KEY,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{BASE_LAYER, FN_LAYER};

    #[test]
    fn fn_key_has_no_code_on_either_layer() {
        let (row, col) = FN_KEY;
        assert!(THUMB35.resolve(row, col, BASE_LAYER).is_none());
        assert!(THUMB35.resolve(row, col, FN_LAYER).is_none());
        assert_eq!(THUMB35.layer_select(), FN_KEY);
    }

    #[test]
    fn every_code_is_typeable() {
        for layer in [BASE_LAYER, FN_LAYER] {
            for row in 0..ROWS {
                for col in 0..COLS {
                    let code = THUMB35.resolve(row, col, layer);
                    assert!(
                        code.is_none() || code.to_hid().is_some(),
                        "{:?} at ({}, {}) on layer {}",
                        code,
                        row,
                        col,
                        layer
                    );
                }
            }
        }
    }

    #[test]
    fn top_left_key() {
        assert_eq!(THUMB35.resolve(0, 0, BASE_LAYER), KeyCode::Printable('q'));
        assert_eq!(THUMB35.resolve(0, 0, FN_LAYER), KeyCode::Printable('1'));
    }
}
