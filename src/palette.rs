//! Deterministic region colors.
//!
//! Detection boxes are colored by label so the same class reads the same
//! on every item; grounding pairs are colored by insertion order with a
//! rotated hue so neighboring pairs stay distinguishable.

/// Fixed palette for detection labels.
const LABEL_PALETTE: [&str; 12] = [
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4",
    "#46f0f0", "#f032e6", "#bcf60c", "#008080", "#9a6324", "#800000",
];

/// Degrees of hue rotation between consecutive grounding pairs.
const PAIR_HUE_STEP: usize = 67;

/// Color for a detection label. Same label, same color, everywhere.
pub fn label_color(label: &str) -> &'static str {
    let hash = label
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
    LABEL_PALETTE[hash as usize % LABEL_PALETTE.len()]
}

/// Color for the `index`-th grounding pair of an item.
pub fn pair_color(index: usize) -> String {
    let hue = (index * PAIR_HUE_STEP) % 360;
    format!("hsl({hue}, 70%, 45%)")
}

/// Parse a `#rrggbb` color string into RGB components.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_label_same_color() {
        assert_eq!(label_color("cat"), label_color("cat"));
        assert!(LABEL_PALETTE.contains(&label_color("anything at all")));
    }

    #[test]
    fn pair_hues_rotate() {
        assert_eq!(pair_color(0), "hsl(0, 70%, 45%)");
        assert_eq!(pair_color(1), "hsl(67, 70%, 45%)");
        assert_eq!(pair_color(6), "hsl(42, 70%, 45%)"); // 402 mod 360
    }

    #[test]
    fn parse_hex_handles_palette_entries() {
        for entry in LABEL_PALETTE {
            assert!(parse_hex(entry).is_some(), "unparsable entry {entry}");
        }
        assert_eq!(parse_hex("#ff0000"), Some((255, 0, 0)));
        assert_eq!(parse_hex("nope"), None);
    }
}
