//! Annotation records: task kinds, payload shapes, status semantics, and
//! the current-item slot.
//!
//! Payloads are a tagged union per task rather than loose JSON, and are
//! sanitized once, at the upsert boundary, the same way the server does.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The annotation tasks the console supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Classification,
    TextClassification,
    Detection,
    Grounding,
    Captioning,
}

impl TaskKind {
    /// Path segment used by the annotation endpoints.
    pub fn api_name(&self) -> &'static str {
        match self {
            TaskKind::Classification => "classification",
            TaskKind::TextClassification => "text-classification",
            TaskKind::Detection => "detection",
            TaskKind::Grounding => "grounding",
            TaskKind::Captioning => "captioning",
        }
    }

    /// Whether this task has a region-drawing mode at all.
    pub fn draws_regions(&self) -> bool {
        matches!(self, TaskKind::Detection | TaskKind::Grounding)
    }
}

/// Lifecycle status of one item's annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Unlabeled,
    Labeled,
    Skipped,
}

/// A labeled box in normalized image coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionBox {
    pub id: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A caption span linked to an image region.
///
/// `span_start`/`span_end` count Unicode scalar values, matching the
/// selection offsets a text field reports. `text` is the slice of the
/// caption at creation time; it is not rewritten when the caption is
/// edited later, so it can go stale until the pair is re-linked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingPair {
    pub id: String,
    pub text: String,
    pub span_start: usize,
    pub span_end: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Per-task annotation payload for one item.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationPayload {
    /// Selected class names, in selection order.
    Labels(Vec<String>),
    /// Detection boxes.
    Boxes(Vec<DetectionBox>),
    /// Caption plus span-to-region links.
    Grounding {
        caption: String,
        pairs: Vec<GroundingPair>,
    },
    /// Bare caption.
    Caption(String),
}

impl AnnotationPayload {
    /// The empty payload for a task, used before the first fetch and
    /// after a skip.
    pub fn empty_for(task: TaskKind) -> Self {
        match task {
            TaskKind::Classification | TaskKind::TextClassification => {
                AnnotationPayload::Labels(Vec::new())
            }
            TaskKind::Detection => AnnotationPayload::Boxes(Vec::new()),
            TaskKind::Grounding => AnnotationPayload::Grounding {
                caption: String::new(),
                pairs: Vec::new(),
            },
            TaskKind::Captioning => AnnotationPayload::Caption(String::new()),
        }
    }

    /// Whether the payload carries any annotation content.
    ///
    /// A grounding caption without pairs does not count as content; a
    /// captioning caption must be non-blank.
    pub fn is_empty(&self) -> bool {
        match self {
            AnnotationPayload::Labels(labels) => labels.is_empty(),
            AnnotationPayload::Boxes(boxes) => boxes.is_empty(),
            AnnotationPayload::Grounding { pairs, .. } => pairs.is_empty(),
            AnnotationPayload::Caption(caption) => caption.trim().is_empty(),
        }
    }

    /// Status a save of this payload should carry: `labeled` when there
    /// is content, `unlabeled` otherwise. Skips never go through here.
    pub fn derived_status(&self) -> RecordStatus {
        if self.is_empty() {
            RecordStatus::Unlabeled
        } else {
            RecordStatus::Labeled
        }
    }
}

/// One item's annotation state as held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    pub status: RecordStatus,
    pub payload: AnnotationPayload,
}

impl AnnotationRecord {
    /// Fresh unlabeled record for a task.
    pub fn empty(task: TaskKind) -> Self {
        Self {
            status: RecordStatus::Unlabeled,
            payload: AnnotationPayload::empty_for(task),
        }
    }

    /// Record representing an explicit skip: empty payload, skipped
    /// status. Replaces any in-progress draft.
    pub fn skipped(task: TaskKind) -> Self {
        Self {
            status: RecordStatus::Skipped,
            payload: AnnotationPayload::empty_for(task),
        }
    }
}

/// Fresh opaque id for a new box or pair.
pub fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// Clamp a box into the unit square the way the server does before
/// persisting: each coordinate clamped, then width/height shrunk so the
/// far edges stay inside. Degenerate results are dropped by callers.
fn clamp_region(x: f32, y: f32, width: f32, height: f32) -> (f32, f32, f32, f32) {
    let x = clamp01(x);
    let y = clamp01(y);
    let mut width = clamp01(width);
    let mut height = clamp01(height);
    if x + width > 1.0 {
        width = clamp01(1.0 - x);
    }
    if y + height > 1.0 {
        height = clamp01(1.0 - y);
    }
    (x, y, width, height)
}

/// Sanitize detection boxes for upsert: clamp into the unit square,
/// drop degenerate boxes, fill in missing ids.
pub fn sanitize_boxes(boxes: &[DetectionBox]) -> Vec<DetectionBox> {
    let mut out = Vec::with_capacity(boxes.len());
    for b in boxes {
        let (x, y, width, height) = clamp_region(b.x, b.y, b.width, b.height);
        if width <= 0.0 || height <= 0.0 {
            continue;
        }
        out.push(DetectionBox {
            id: if b.id.is_empty() { fresh_id() } else { b.id.clone() },
            label: b.label.clone(),
            x,
            y,
            width,
            height,
        });
    }
    out
}

/// Sanitize grounding pairs for upsert: drop pairs with blank text or an
/// inverted/empty span, clamp the region, drop degenerate regions, fill
/// in missing ids.
pub fn sanitize_pairs(pairs: &[GroundingPair]) -> Vec<GroundingPair> {
    let mut out = Vec::with_capacity(pairs.len());
    for p in pairs {
        let text = p.text.trim();
        if text.is_empty() || p.span_end <= p.span_start {
            continue;
        }
        let (x, y, width, height) = clamp_region(p.x, p.y, p.width, p.height);
        if width <= 0.0 || height <= 0.0 {
            continue;
        }
        out.push(GroundingPair {
            id: if p.id.is_empty() { fresh_id() } else { p.id.clone() },
            text: text.to_string(),
            span_start: p.span_start,
            span_end: p.span_end,
            x,
            y,
            width,
            height,
            color: p.color.clone().filter(|c| !c.trim().is_empty()),
        });
    }
    out
}

/// Sanitized copy of a payload, ready to upsert.
pub fn sanitize_payload(payload: &AnnotationPayload) -> AnnotationPayload {
    match payload {
        AnnotationPayload::Labels(labels) => AnnotationPayload::Labels(
            labels
                .iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect(),
        ),
        AnnotationPayload::Boxes(boxes) => AnnotationPayload::Boxes(sanitize_boxes(boxes)),
        AnnotationPayload::Grounding { caption, pairs } => AnnotationPayload::Grounding {
            caption: caption.trim().to_string(),
            pairs: sanitize_pairs(pairs),
        },
        AnnotationPayload::Caption(caption) => {
            AnnotationPayload::Caption(caption.trim().to_string())
        }
    }
}

/// Token identifying one load of the current item. Responses carrying an
/// out-of-date token are discarded instead of clobbering the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken {
    generation: u64,
}

/// In-memory state for the item currently on screen.
///
/// Records are discarded on navigation and re-fetched on return; the
/// server stays the source of truth, so nothing else is cached.
#[derive(Debug, Default)]
pub struct RecordSlot {
    generation: u64,
    path: Option<String>,
    record: Option<AnnotationRecord>,
}

impl RecordSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `path`. The previous record is dropped immediately
    /// and any fetch still in flight becomes stale.
    pub fn begin_load(&mut self, path: &str) -> LoadToken {
        self.generation += 1;
        self.path = Some(path.to_string());
        self.record = None;
        LoadToken {
            generation: self.generation,
        }
    }

    /// Install a fetched record. Returns `false` (leaving the slot
    /// untouched) when a newer load has started since `token` was issued.
    pub fn install(&mut self, token: LoadToken, record: AnnotationRecord) -> bool {
        if token.generation != self.generation {
            return false;
        }
        self.record = Some(record);
        true
    }

    /// Path of the item being shown or loaded.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn record(&self) -> Option<&AnnotationRecord> {
        self.record.as_ref()
    }

    pub fn record_mut(&mut self) -> Option<&mut AnnotationRecord> {
        self.record.as_mut()
    }

    /// Drop everything, e.g. when the dataset changes.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.path = None;
        self.record = None;
    }
}
