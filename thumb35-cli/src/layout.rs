//! Render the Thumb35 keymap as an HTML page with one inline SVG per layer.

use thumb35_core::keymap::{BASE_LAYER, NUM_LAYERS};
use thumb35_core::layout::{COLS, ROWS, THUMB35};
use thumb35_core::KeyCode;

/// Physical key position for SVG rendering.
struct Key {
    x: f64,
    y: f64,
    row: usize,
    col: usize,
}

/// Key unit size in SVG pixels.
const U: f64 = 54.0;
/// Gap between keys.
const GAP: f64 = 4.0;
/// Step: key + gap.
const S: f64 = U + GAP;
/// Key corner radius.
const R: f64 = 4.0;
/// Extra space between the left five columns and the right five.
const HALF_GAP: f64 = 40.0;
/// Margin around the SVG content.
const MARGIN: f64 = 20.0;

/// Column stagger for the left five columns, in units of S; mirrored on the right.
const STAGGER: [f64; 5] = [0.35, 0.15, 0.00, 0.10, 0.20];

fn build_keys() -> Vec<Key> {
    let mut keys = Vec::with_capacity(ROWS * COLS);
    let half = COLS / 2;

    for col in 0..COLS {
        let (local, bx) = if col < half {
            (col, 0.0)
        } else {
            (COLS - 1 - col, HALF_GAP)
        };
        let x = bx + col as f64 * S;
        for row in 0..ROWS {
            keys.push(Key {
                x,
                y: (row as f64 + STAGGER[local.min(STAGGER.len() - 1)]) * S,
                row,
                col,
            });
        }
    }

    keys
}

/// Compute the bounding box of all keys: (max_x + U, max_y + U).
fn bbox(keys: &[Key]) -> (f64, f64) {
    keys.iter().fold((0.0_f64, 0.0_f64), |(w, h), k| {
        (w.max(k.x + U), h.max(k.y + U))
    })
}

/// Text shown on a key cap.
pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::None => String::new(),
        KeyCode::Printable(' ') => "Space".to_string(),
        KeyCode::Printable(c) => c.to_string(),
        KeyCode::Named(key) => key.label().to_string(),
        KeyCode::Modifier(m) => m.label().to_string(),
    }
}

/// Render a single layer as an SVG group.
fn render_layer(keys: &[Key], layer: usize, y_offset: f64) -> String {
    let mut svg = String::new();

    svg.push_str(&format!(
        r#"<g transform="translate({MARGIN}, {y_offset})">"#
    ));

    svg.push_str(&format!(
        r#"<text x="0" y="-10" class="layer-title">Layer {layer}{}</text>"#,
        if layer == BASE_LAYER {
            " (Default)"
        } else {
            " (Fn)"
        }
    ));

    for key in keys {
        let code = THUMB35.resolve(key.row, key.col, layer);
        let is_fn = THUMB35.is_layer_select(key.row, key.col);

        let label = if is_fn {
            "Fn".to_string()
        } else {
            key_label(code)
        };

        let key_class = if is_fn {
            "key layer"
        } else if code.is_none() {
            "key unused"
        } else if code.is_modifier() {
            "key modifier"
        } else {
            "key"
        };

        svg.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{U}" height="{U}" rx="{R}" class="{key_class}"/>"#,
            key.x, key.y,
        ));

        if !label.is_empty() {
            let font_class = if label.chars().count() > 3 { " small" } else { "" };
            svg.push_str(&format!(
                r#"<text x="{}" y="{}" class="label{font_class}">{}</text>"#,
                key.x + U / 2.0,
                key.y + U / 2.0 + 1.0,
                html_escape(&label),
            ));
        }
    }

    svg.push_str("</g>");
    svg
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Generate the complete HTML document with inline SVG.
pub fn generate_html() -> String {
    let keys = build_keys();
    let (content_w, content_h) = bbox(&keys);
    let layer_height = content_h + 60.0;
    let total_width = content_w + 2.0 * MARGIN;
    let total_height = NUM_LAYERS as f64 * layer_height + 2.0 * MARGIN;

    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Thumb35 Layout</title>
<style>
  body {{
    background: #1a1a2e;
    color: #eee;
    font-family: system-ui, -apple-system, sans-serif;
    display: flex;
    justify-content: center;
    padding: 2em;
  }}
  .key {{
    fill: #16213e;
    stroke: #0f3460;
    stroke-width: 1.5;
  }}
  .key.unused {{
    fill: #0d1117;
    stroke: #21262d;
    stroke-dasharray: 3 3;
  }}
  .key.layer {{
    fill: #2d1b4e;
    stroke: #e94560;
    stroke-width: 2;
  }}
  .key.modifier {{
    fill: #1b2e4e;
    stroke: #53a8b6;
  }}
  .label {{
    fill: #eee;
    font-family: "JetBrains Mono", "Fira Code", monospace;
    font-size: 13px;
    text-anchor: middle;
    dominant-baseline: middle;
    pointer-events: none;
  }}
  .label.small {{
    font-size: 10px;
  }}
  .layer-title {{
    fill: #e94560;
    font-size: 16px;
    font-weight: bold;
  }}
</style>
</head>
<body>
<svg width="{total_width}" height="{total_height}" xmlns="http://www.w3.org/2000/svg">
"#
    );

    for layer in 0..NUM_LAYERS {
        let y_offset = MARGIN + layer as f64 * layer_height + 30.0;
        html.push_str(&render_layer(&keys, layer, y_offset));
        html.push('\n');
    }

    html.push_str("</svg>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use thumb35_core::keymap::FN_LAYER;
    use thumb35_core::{Modifier, NamedKey};

    #[test]
    fn every_matrix_position_gets_a_key() {
        let keys = build_keys();
        assert_eq!(keys.len(), ROWS * COLS);
        // Right half starts after the gap
        let left = keys.iter().find(|k| k.col == 4).map(|k| k.x);
        let right = keys.iter().find(|k| k.col == 5).map(|k| k.x);
        assert_eq!(right.zip(left).map(|(r, l)| r - l), Some(S + HALF_GAP));
    }

    #[test]
    fn labels() {
        assert_eq!(key_label(KeyCode::Printable('q')), "q");
        assert_eq!(key_label(KeyCode::Printable(' ')), "Space");
        assert_eq!(key_label(KeyCode::None), "");
        assert_eq!(
            key_label(KeyCode::Named(NamedKey::Enter)),
            NamedKey::Enter.label()
        );
        assert_eq!(
            key_label(KeyCode::Modifier(Modifier::LeftAlt)),
            Modifier::LeftAlt.label()
        );
    }

    #[test]
    fn html_has_both_layers_and_the_fn_key() {
        let html = generate_html();
        assert!(html.contains("Layer 0 (Default)"));
        assert!(html.contains(&format!("Layer {FN_LAYER} (Fn)")));
        assert_eq!(html.matches(">Fn</text>").count(), NUM_LAYERS);
        assert_eq!(html.matches("<rect").count(), NUM_LAYERS * ROWS * COLS);
        assert!(html.contains(">q</text>"));
        assert!(html.contains(">1</text>"));
    }

    #[test]
    fn markup_characters_are_escaped() {
        assert_eq!(html_escape("<&>"), "&lt;&amp;&gt;");
    }
}
