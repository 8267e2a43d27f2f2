//! Two-layer keymap and layer resolution.
//!
//! One matrix position is the layer-select key. While it is held, every other
//! position resolves through the Fn layer; it never produces a HID event.

use crate::keycode::KeyCode;
use crate::matrix::MatrixState;

/// Number of layers.
pub const NUM_LAYERS: usize = 2;
/// Layer used while the layer-select key is released.
pub const BASE_LAYER: usize = 0;
/// Layer used while the layer-select key is held.
pub const FN_LAYER: usize = 1;

pub type Layer<const ROW: usize, const COL: usize> = [[KeyCode; COL]; ROW];

pub struct Keymap<const ROW: usize, const COL: usize> {
    layers: [Layer<ROW, COL>; NUM_LAYERS],
    /// (row, col) of the layer-select key
    layer_select: (usize, usize),
}

impl<const ROW: usize, const COL: usize> Keymap<ROW, COL> {
    /// Panics (at compile time in a `const`/`static`) if `layer_select` is
    /// outside the matrix.
    pub const fn new(layers: [Layer<ROW, COL>; NUM_LAYERS], layer_select: (usize, usize)) -> Self {
        assert!(
            layer_select.0 < ROW && layer_select.1 < COL,
            "layer-select key is outside the matrix"
        );
        Self { layers, layer_select }
    }

    pub fn layer_select(&self) -> (usize, usize) {
        self.layer_select
    }

    pub fn is_layer_select(&self, row: usize, col: usize) -> bool {
        (row, col) == self.layer_select
    }

    /// Layer selected by the debounced state of the layer-select key.
    pub fn active_layer(&self, debounced: &MatrixState<ROW, COL>) -> usize {
        let (row, col) = self.layer_select;
        if debounced[row][col] {
            FN_LAYER
        } else {
            BASE_LAYER
        }
    }

    /// Key code at a matrix position on `layer`.
    pub fn resolve(&self, row: usize, col: usize, layer: usize) -> KeyCode {
        self.layers[layer][row][col]
    }

    /// True if any pressed key, other than the layer-select key, maps to a
    /// code on `layer`.
    pub fn is_active(&self, debounced: &MatrixState<ROW, COL>, layer: usize) -> bool {
        debounced.iter().enumerate().any(|(row, cols)| {
            cols.iter().enumerate().any(|(col, &pressed)| {
                pressed && !self.is_layer_select(row, col) && !self.resolve(row, col, layer).is_none()
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycode::NamedKey;

    const ___: KeyCode = KeyCode::None;

    static MAP: Keymap<2, 2> = Keymap::new(
        [
            [[KeyCode::Printable('a'), ___], [___, ___]],
            [[KeyCode::Named(NamedKey::F1), ___], [___, KeyCode::Printable('z')]],
        ],
        (1, 0),
    );

    #[test]
    fn layer_follows_layer_select_key() {
        assert_eq!(MAP.active_layer(&[[false, false], [false, false]]), BASE_LAYER);
        assert_eq!(MAP.active_layer(&[[true, true], [true, false]]), FN_LAYER);
        assert!(MAP.is_layer_select(1, 0));
        assert!(!MAP.is_layer_select(0, 0));
    }

    #[test]
    fn resolve_is_a_table_lookup() {
        assert_eq!(MAP.resolve(0, 0, BASE_LAYER), KeyCode::Printable('a'));
        assert_eq!(MAP.resolve(0, 0, FN_LAYER), KeyCode::Named(NamedKey::F1));
        assert_eq!(MAP.resolve(1, 1, BASE_LAYER), KeyCode::None);
    }

    #[test]
    fn activity_ignores_layer_select_and_unmapped_keys() {
        // Only the layer-select key
        assert!(!MAP.is_active(&[[false, false], [true, false]], FN_LAYER));
        // Unmapped on base, mapped on Fn
        assert!(!MAP.is_active(&[[false, false], [false, true]], BASE_LAYER));
        assert!(MAP.is_active(&[[false, false], [true, true]], FN_LAYER));
        assert!(MAP.is_active(&[[true, false], [false, false]], BASE_LAYER));
    }
}
