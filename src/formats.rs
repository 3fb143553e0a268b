//! Bounding-box representation parsing for tabular box sources.
//!
//! Detection datasets often ship prior boxes in CSV columns using one of
//! the common representations. These helpers convert a cell's number
//! list into the engine's normalized form, shrinking overflow past the
//! far edges and rejecting degenerate boxes.

use crate::geometry::NormRect;

/// Pixel dimensions of the source image, needed by the pixel formats.
pub type ImageDims = (u32, u32);

/// Source representation of a bounding-box number list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxFormat {
    /// `x_center y_center width height`, already normalized.
    Yolo,
    /// `x_min y_min x_max y_max` in pixels.
    PascalVoc,
    /// `x y width height` in pixels.
    CocoBbox,
}

impl BoxFormat {
    pub fn name(&self) -> &'static str {
        match self {
            BoxFormat::Yolo => "yolo",
            BoxFormat::PascalVoc => "pascal_voc",
            BoxFormat::CocoBbox => "coco_bbox",
        }
    }

    /// Parse a representation name as stored in dataset configs.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "yolo" => Some(BoxFormat::Yolo),
            "pascal_voc" => Some(BoxFormat::PascalVoc),
            "coco_bbox" => Some(BoxFormat::CocoBbox),
            _ => None,
        }
    }
}

/// Clamp a candidate box into the unit square.
///
/// When `dims` is given and any component exceeds 1, the values are
/// taken as pixels and divided through first. Width/height are shrunk
/// so the far edges stay inside; degenerate results become `None`.
pub fn normalize_box(
    mut x: f32,
    mut y: f32,
    mut width: f32,
    mut height: f32,
    dims: Option<ImageDims>,
) -> Option<NormRect> {
    if let Some((img_w, img_h)) = dims {
        if img_w > 0 && img_h > 0 && (x > 1.0 || y > 1.0 || width > 1.0 || height > 1.0) {
            x /= img_w as f32;
            y /= img_h as f32;
            width /= img_w as f32;
            height /= img_h as f32;
        }
    }
    x = x.clamp(0.0, 1.0);
    y = y.clamp(0.0, 1.0);
    width = width.clamp(0.0, 1.0);
    height = height.clamp(0.0, 1.0);
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    if x + width > 1.0 {
        width = (1.0 - x).max(0.0);
    }
    if y + height > 1.0 {
        height = (1.0 - y).max(0.0);
    }
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some(NormRect {
        x,
        y,
        width,
        height,
    })
}

/// Box spanned by two corners, in either order.
pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32, dims: Option<ImageDims>) -> Option<NormRect> {
    normalize_box(x1.min(x2), y1.min(y2), (x2 - x1).abs(), (y2 - y1).abs(), dims)
}

/// Axis-aligned envelope of a polygon's vertices.
pub fn envelope(points: &[(f32, f32)], dims: Option<ImageDims>) -> Option<NormRect> {
    if points.len() < 2 {
        return None;
    }
    let (mut x_min, mut y_min) = points[0];
    let (mut x_max, mut y_max) = points[0];
    for &(px, py) in &points[1..] {
        x_min = x_min.min(px);
        y_min = y_min.min(py);
        x_max = x_max.max(px);
        y_max = y_max.max(py);
    }
    normalize_box(x_min, y_min, x_max - x_min, y_max - y_min, dims)
}

/// Pull the numbers out of a free-form cell value, in order. Accepts
/// separators of any kind and negative/decimal literals.
pub fn extract_numbers(text: &str) -> Vec<f32> {
    let mut numbers = Vec::new();
    let mut token = String::new();
    for ch in text.chars() {
        if ch.is_ascii_digit() || ch == '.' || (ch == '-' && token.is_empty()) {
            token.push(ch);
        } else if !token.is_empty() {
            if let Ok(v) = token.parse::<f32>() {
                numbers.push(v);
            }
            token.clear();
        }
    }
    if let Ok(v) = token.parse::<f32>() {
        numbers.push(v);
    }
    numbers
}

/// Parse a box from a number list in the given representation.
pub fn parse_box(format: BoxFormat, numbers: &[f32], dims: Option<ImageDims>) -> Option<NormRect> {
    if numbers.len() < 4 {
        return None;
    }
    match format {
        BoxFormat::Yolo => {
            let (cx, cy, w, h) = (numbers[0], numbers[1], numbers[2], numbers[3]);
            normalize_box(cx - w / 2.0, cy - h / 2.0, w, h, None)
        }
        BoxFormat::PascalVoc => {
            let (img_w, img_h) = dims?;
            if img_w == 0 || img_h == 0 {
                return None;
            }
            let (x_min, y_min, x_max, y_max) = (numbers[0], numbers[1], numbers[2], numbers[3]);
            let width = (x_max - x_min).max(0.0);
            let height = (y_max - y_min).max(0.0);
            if width <= 0.0 || height <= 0.0 {
                return None;
            }
            normalize_box(
                x_min / img_w as f32,
                y_min / img_h as f32,
                width / img_w as f32,
                height / img_h as f32,
                None,
            )
        }
        BoxFormat::CocoBbox => {
            let (img_w, img_h) = dims?;
            if img_w == 0 || img_h == 0 {
                return None;
            }
            normalize_box(
                numbers[0] / img_w as f32,
                numbers[1] / img_h as f32,
                numbers[2] / img_w as f32,
                numbers[3] / img_h as f32,
                None,
            )
        }
    }
}

/// Parse a box straight from a cell value.
pub fn parse_box_value(format: BoxFormat, value: &str, dims: Option<ImageDims>) -> Option<NormRect> {
    parse_box(format, &extract_numbers(value), dims)
}
