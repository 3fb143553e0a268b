//! The pointer-drag state machine that turns a drag into a region.
//!
//! Handles: begin, update, finish, cancel.
//!
//! One gesture at a time: `begin` while a drag is active is ignored, so
//! the machine itself enforces the single-session rule without external
//! locking. Pointer capture is modeled as a flag the embedding surface
//! mirrors onto its real pointer-capture API; it is released on both the
//! committed and the cancelled transition so it never leaks into an
//! unrelated later gesture.

use crate::geometry::{NormPoint, NormRect};

/// Drags smaller than this on either axis (normalized) are treated as
/// accidental clicks and discarded.
pub const MIN_REGION_EXTENT: f32 = 0.005;

/// Phase of the drawing gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DrawPhase {
    #[default]
    Idle,
    Drawing { anchor: NormPoint, cursor: NormPoint },
}

/// Result of finishing a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOutcome {
    /// The drag was large enough; the region should be appended.
    Committed(NormRect),
    /// Degenerate drag, or no drag was active. Discarded silently.
    Discarded,
}

/// A single in-flight drawing gesture over the image surface.
#[derive(Debug, Default)]
pub struct DrawSession {
    phase: DrawPhase,
    captured: bool,
}

impl DrawSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.phase, DrawPhase::Drawing { .. })
    }

    /// Whether the surface should hold pointer capture right now.
    pub fn has_capture(&self) -> bool {
        self.captured
    }

    /// Pointer-down: enter the Drawing state and acquire capture, so
    /// move/up events keep arriving even when the pointer leaves the
    /// surface bounds. Ignored while a drag is already active.
    pub fn begin(&mut self, at: NormPoint) {
        if self.is_drawing() {
            return;
        }
        self.phase = DrawPhase::Drawing {
            anchor: at,
            cursor: at,
        };
        self.captured = true;
    }

    /// Pointer-move: track the cursor for the dashed preview.
    pub fn update(&mut self, to: NormPoint) {
        if let DrawPhase::Drawing { anchor, .. } = self.phase {
            self.phase = DrawPhase::Drawing {
                anchor,
                cursor: to,
            };
        }
    }

    /// The in-progress rectangle, if a drag is active.
    pub fn preview(&self) -> Option<NormRect> {
        match self.phase {
            DrawPhase::Drawing { anchor, cursor } => Some(NormRect::from_drag(anchor, cursor)),
            DrawPhase::Idle => None,
        }
    }

    /// Pointer-up: commit when both extents reach the minimum, discard
    /// otherwise. Either way the machine returns to Idle and capture is
    /// released.
    pub fn finish(&mut self, at: NormPoint) -> DrawOutcome {
        let DrawPhase::Drawing { anchor, .. } = self.phase else {
            self.captured = false;
            return DrawOutcome::Discarded;
        };
        self.phase = DrawPhase::Idle;
        self.captured = false;

        let rect = NormRect::from_drag(anchor, at);
        if rect.width >= MIN_REGION_EXTENT && rect.height >= MIN_REGION_EXTENT {
            DrawOutcome::Committed(rect)
        } else {
            DrawOutcome::Discarded
        }
    }

    /// Abort the gesture without producing a region.
    pub fn cancel(&mut self) {
        self.phase = DrawPhase::Idle;
        self.captured = false;
    }
}
