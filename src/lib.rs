//! Interactive annotation engine for the siwa data-curation console.
//!
//! The console's annotator screens (classification, detection, visual
//! grounding, captioning, text classification) share this engine: it
//! turns pointer drags over an image into normalized regions, links
//! caption spans to regions, tracks per-item labeling state and
//! navigation over large file lists, and persists records through the
//! curation API with deterministic status semantics.
//!
//! The embedding shell owns rendering and the event loop. It forwards
//! gestures into an [`session::AnnotatorSession`] and draws from the
//! session's component state; the engine never touches image bytes.

pub mod config;
pub mod draw;
pub mod error;
pub mod formats;
pub mod gateway;
pub mod geometry;
pub mod labels;
pub mod nav;
pub mod palette;
pub mod progress;
pub mod record;
pub mod session;
pub mod span;

pub use config::AppConfig;
pub use draw::{DrawOutcome, DrawPhase, DrawSession, MIN_REGION_EXTENT};
pub use error::{ApiError, EngineError};
pub use gateway::{AnnotationApi, FileListPage};
pub use labels::{LabelMode, LabelSet};
pub use geometry::{ImageViewport, NormPoint, NormRect};
pub use nav::{FileNavigator, NavKey, PickerEntry};
pub use progress::{AnnotationSummary, ProgressTracker, progress_percent};
pub use record::{
    AnnotationPayload, AnnotationRecord, DetectionBox, GroundingPair, RecordSlot, RecordStatus,
    TaskKind,
};
pub use session::{AnnotatorSession, DatasetInfo, SessionContext};
pub use span::{CaptionSegment, SpanSelection, SpanSelector, segment_caption};
