//! Caption span selection for grounding.
//!
//! Handles: selection tracking from the caption field, and rendering the
//! caption as plain/colored segments for the pair preview.
//!
//! All offsets count Unicode scalar values, matching what a text field's
//! selection API reports.

use crate::palette;
use crate::record::GroundingPair;

/// A selected `[start, end)` character range of the caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanSelection {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Tracks the caption field's live selection.
///
/// Cleared whenever the caption text changes (the indices would go
/// stale) and whenever a draw gesture commits a pair from it.
#[derive(Debug, Default)]
pub struct SpanSelector {
    current: Option<SpanSelection>,
}

impl SpanSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the field's selection. Collapsed selections clear the
    /// tracker instead; out-of-range offsets are clamped to the caption.
    pub fn set_from_field(&mut self, caption: &str, start: usize, end: usize) {
        let len = caption.chars().count();
        let start = start.min(len);
        let end = end.min(len);
        if end <= start {
            self.current = None;
            return;
        }
        let text: String = caption.chars().skip(start).take(end - start).collect();
        self.current = Some(SpanSelection { start, end, text });
    }

    pub fn selection(&self) -> Option<&SpanSelection> {
        self.current.as_ref()
    }

    /// Whether a non-collapsed selection is active.
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

/// One run of the caption preview: plain text, or a pair's colored span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionSegment {
    pub text: String,
    /// `None` for unstyled text, otherwise the pair's color.
    pub color: Option<String>,
}

/// Split the caption into plain and colored segments for the preview.
///
/// Pairs are walked in `span_start` order with a forward-only cursor:
/// emit the unstyled gap before a pair's (clamped) start, then its
/// colored `[start, end)` run, then advance the cursor to `end`. A pair
/// overlapping an earlier one therefore contributes only the part past
/// the cursor, truncating the overlap in the preview.
pub fn segment_caption(caption: &str, pairs: &[GroundingPair]) -> Vec<CaptionSegment> {
    let chars: Vec<char> = caption.chars().collect();
    let len = chars.len();

    let mut ordered: Vec<(usize, &GroundingPair)> = pairs.iter().enumerate().collect();
    ordered.sort_by_key(|(_, p)| p.span_start);

    let mut segments = Vec::new();
    let mut cursor = 0usize;
    let mut emit = |from: usize, to: usize, color: Option<String>, segments: &mut Vec<CaptionSegment>| {
        if to > from {
            segments.push(CaptionSegment {
                text: chars[from..to].iter().collect(),
                color,
            });
        }
    };

    for (index, pair) in ordered {
        let start = pair.span_start.min(len).max(cursor);
        let end = pair.span_end.min(len).max(start);
        emit(cursor, start, None, &mut segments);
        let color = pair
            .color
            .clone()
            .unwrap_or_else(|| palette::pair_color(index));
        emit(start, end, Some(color), &mut segments);
        cursor = cursor.max(end);
    }
    emit(cursor, len, None, &mut segments);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(start: usize, end: usize, color: &str) -> GroundingPair {
        GroundingPair {
            id: format!("p{start}"),
            text: String::new(),
            span_start: start,
            span_end: end,
            x: 0.0,
            y: 0.0,
            width: 0.1,
            height: 0.1,
            color: Some(color.to_string()),
        }
    }

    #[test]
    fn selection_slices_the_caption() {
        let mut sel = SpanSelector::new();
        sel.set_from_field("A red car", 2, 5);
        let s = sel.selection().unwrap();
        assert_eq!(s.text, "red");
        assert_eq!((s.start, s.end), (2, 5));
    }

    #[test]
    fn collapsed_selection_clears() {
        let mut sel = SpanSelector::new();
        sel.set_from_field("A red car", 2, 5);
        sel.set_from_field("A red car", 3, 3);
        assert!(!sel.is_active());
    }

    #[test]
    fn out_of_range_selection_is_clamped() {
        let mut sel = SpanSelector::new();
        sel.set_from_field("short", 2, 99);
        let s = sel.selection().unwrap();
        assert_eq!(s.text, "ort");
        assert_eq!(s.end, 5);
    }

    #[test]
    fn segments_cover_the_whole_caption_in_order() {
        let caption = "A red car on a gray road";
        let pairs = vec![pair(2, 5, "#111111"), pair(15, 19, "#222222")];
        let segs = segment_caption(caption, &pairs);
        let joined: String = segs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, caption);
        assert_eq!(segs[0].color, None);
        assert_eq!(segs[1].color.as_deref(), Some("#111111"));
        assert_eq!(segs[1].text, "red");
        assert_eq!(segs[3].color.as_deref(), Some("#222222"));
        assert_eq!(segs[3].text, "gray");
    }

    #[test]
    fn overlapping_pair_is_truncated_forward() {
        let caption = "abcdefgh";
        // Second pair starts inside the first; only "ef" remains for it.
        let pairs = vec![pair(1, 5, "#aaa111"), pair(3, 6, "#bbb222")];
        let segs = segment_caption(caption, &pairs);
        let joined: String = segs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, caption);
        assert_eq!(segs[1].text, "bcde");
        assert_eq!(segs[2].text, "f");
        assert_eq!(segs[2].color.as_deref(), Some("#bbb222"));
    }
}
