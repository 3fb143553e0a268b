//! Session wiring for one annotator screen.
//!
//! The navigator selects the current item, the record slot holds its
//! payload, draw/span gestures mutate it, the gateway persists it, and
//! the progress tracker follows the server summary. The embedding shell
//! forwards pointer/keyboard events here and renders from the public
//! component state.
//!
//! Failure policy, uniformly: a failed save or skip surfaces its error,
//! keeps the draft, and does not advance navigation.

use crate::config::AppConfig;
use crate::draw::{DrawOutcome, DrawSession};
use crate::error::EngineError;
use crate::gateway::AnnotationApi;
use crate::geometry::{ImageViewport, NormRect};
use crate::labels::{LabelMode, LabelSet, load_label_styles};
use crate::nav::{FileNavigator, NavKey, PickerEntry};
use crate::palette;
use crate::progress::ProgressTracker;
use crate::record::{
    AnnotationPayload, AnnotationRecord, DetectionBox, GroundingPair, RecordSlot, RecordStatus,
    TaskKind, fresh_id,
};
use crate::span::{CaptionSegment, SpanSelector, segment_caption};

const MSG_SELECT_CLASS: &str = "Select a class before drawing a box.";
const MSG_SELECT_SNIPPET: &str = "Select a snippet of text before linking a bounding box.";
const MSG_STILL_LOADING: &str = "The item is still loading.";

/// Session-scoped values created once at sign-in and passed explicitly
/// into every screen.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub base_url: String,
    pub token: String,
    pub user: String,
}

/// The dataset-level facts an annotator screen needs.
#[derive(Debug, Clone)]
pub struct DatasetInfo {
    pub id: String,
    pub task: TaskKind,
    pub class_names: Vec<String>,
    pub label_mode: LabelMode,
}

/// One annotator screen's engine state.
pub struct AnnotatorSession {
    api: AnnotationApi,
    dataset: DatasetInfo,
    pub viewport: ImageViewport,
    pub draw: DrawSession,
    pub spans: SpanSelector,
    pub labels: LabelSet,
    pub nav: FileNavigator,
    pub progress: ProgressTracker,
    pub slot: RecordSlot,
    page_limit: u64,
    picker_cap: usize,
    randomize_order: bool,
}

impl AnnotatorSession {
    pub fn new(ctx: &SessionContext, dataset: DatasetInfo, config: &AppConfig) -> Self {
        let styles = load_label_styles(config.labels.style_file.as_deref());
        let labels =
            LabelSet::new(dataset.class_names.clone(), dataset.label_mode).with_styles(styles);
        Self {
            api: AnnotationApi::new(ctx.base_url.clone(), ctx.token.clone()),
            dataset,
            viewport: ImageViewport::default(),
            draw: DrawSession::new(),
            spans: SpanSelector::new(),
            labels,
            nav: FileNavigator::new(),
            progress: ProgressTracker::new(),
            slot: RecordSlot::new(),
            page_limit: config.api.page_limit,
            picker_cap: config.navigation.picker_thumbnail_cap,
            randomize_order: config.navigation.randomize_order,
        }
    }

    pub fn task(&self) -> TaskKind {
        self.dataset.task
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset.id
    }

    pub fn api(&self) -> &AnnotationApi {
        &self.api
    }

    /// Refresh the image element's rectangle. Call on window resize and
    /// on image load.
    pub fn set_viewport(&mut self, left: f32, top: f32, width: f32, height: f32) {
        self.viewport = ImageViewport::new(left, top, width, height);
    }

    // ------------------------------------------------------------------
    // Loading and navigation
    // ------------------------------------------------------------------

    /// Fetch the file list and the first item, honoring the
    /// randomize-order preference.
    pub async fn open(&mut self) -> Result<(), EngineError> {
        self.refresh_files().await?;
        if self.randomize_order {
            self.nav.jump_random();
        }
        self.load_current().await?;
        self.refresh_summary().await;
        Ok(())
    }

    /// Re-fetch the working file list. The unlabeled-only flag maps to
    /// the server's status filter, so the returned list is already
    /// filtered; the cursor resets with the new list.
    pub async fn refresh_files(&mut self) -> Result<(), EngineError> {
        let filter = if self.nav.only_unlabeled() {
            Some("unlabeled")
        } else {
            None
        };
        let page = self
            .api
            .list_files(&self.dataset.id, 0, self.page_limit, filter)
            .await?;
        self.nav.set_files(page.files, page.file_statuses);
        Ok(())
    }

    /// Flip the unlabeled-only filter and reload.
    pub async fn toggle_only_unlabeled(&mut self) -> Result<(), EngineError> {
        self.nav.toggle_only_unlabeled();
        self.refresh_files().await?;
        self.load_current().await
    }

    /// Load the item under the cursor. Any draft gesture or selection
    /// from the previous item is dropped first. Responses that lose a
    /// race against a later load are discarded by the slot.
    pub async fn load_current(&mut self) -> Result<(), EngineError> {
        self.draw.cancel();
        self.spans.clear();
        let Some(path) = self.nav.current().map(str::to_string) else {
            self.slot.clear();
            return Ok(());
        };
        let token = self.slot.begin_load(&path);
        let record = self
            .api
            .fetch_annotation(&self.dataset.id, self.dataset.task, &path)
            .await?;
        if !self.slot.install(token, record) {
            tracing::debug!(%path, "discarding stale item fetch");
        }
        Ok(())
    }

    /// Arrow-key navigation; loads the newly selected item when the
    /// cursor moved. Suppressed while typing in a text field.
    pub async fn handle_key(&mut self, key: NavKey, typing: bool) -> Result<bool, EngineError> {
        if self.nav.handle_key(key, typing) {
            self.load_current().await?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Jump to a picker row's item.
    pub async fn jump_to(&mut self, index: usize) -> Result<(), EngineError> {
        if self.nav.jump_to(index) {
            self.load_current().await?;
        }
        Ok(())
    }

    /// Rows for the jump-to picker, capped per config.
    pub fn picker_entries(&self) -> Vec<PickerEntry> {
        self.nav.picker_entries(self.picker_cap)
    }

    /// Digit shortcut: picks the class for detection, toggles the label
    /// for classification tasks. Suppressed while typing.
    pub fn handle_digit(&mut self, digit: char, typing: bool) {
        if typing {
            return;
        }
        let Some(label) = self.labels.label_for_digit(digit).map(str::to_string) else {
            return;
        };
        match self.dataset.task {
            TaskKind::Detection => {
                self.labels.set_active(&label);
            }
            TaskKind::Classification | TaskKind::TextClassification => {
                self.toggle_label(&label);
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    /// Pointer-down over the image surface. Starts a draw when the
    /// task's precondition holds; positions outside a loaded image are
    /// ignored.
    pub fn pointer_down(&mut self, client_x: f32, client_y: f32) -> Result<(), EngineError> {
        if !self.dataset.task.draws_regions() {
            return Ok(());
        }
        let Some(point) = self.viewport.normalize(client_x, client_y) else {
            return Ok(());
        };
        match self.dataset.task {
            TaskKind::Detection if self.labels.active_label().is_none() => {
                return Err(EngineError::Validation(MSG_SELECT_CLASS.into()));
            }
            TaskKind::Grounding if !self.spans.is_active() => {
                return Err(EngineError::Validation(MSG_SELECT_SNIPPET.into()));
            }
            _ => {}
        }
        self.draw.begin(point);
        Ok(())
    }

    /// Pointer-move while drawing: updates the dashed preview.
    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) {
        if !self.draw.is_drawing() {
            return;
        }
        if let Some(point) = self.viewport.normalize(client_x, client_y) {
            self.draw.update(point);
        }
    }

    /// Pointer-up: commits the region into the current record when the
    /// drag is large enough, discards it silently otherwise.
    pub fn pointer_up(&mut self, client_x: f32, client_y: f32) -> Result<(), EngineError> {
        let Some(point) = self.viewport.normalize(client_x, client_y) else {
            self.draw.cancel();
            return Ok(());
        };
        match self.draw.finish(point) {
            DrawOutcome::Discarded => Ok(()),
            DrawOutcome::Committed(rect) => self.commit_region(rect),
        }
    }

    fn commit_region(&mut self, rect: NormRect) -> Result<(), EngineError> {
        match self.dataset.task {
            TaskKind::Detection => {
                let Some(label) = self.labels.active_label().map(str::to_string) else {
                    return Err(EngineError::Validation(MSG_SELECT_CLASS.into()));
                };
                let Some(record) = self.slot.record_mut() else {
                    return Err(EngineError::Validation(MSG_STILL_LOADING.into()));
                };
                if let AnnotationPayload::Boxes(boxes) = &mut record.payload {
                    boxes.push(DetectionBox {
                        id: fresh_id(),
                        label,
                        x: rect.x,
                        y: rect.y,
                        width: rect.width,
                        height: rect.height,
                    });
                }
                Ok(())
            }
            TaskKind::Grounding => {
                // The selection must still be alive at commit time; a
                // caption edit mid-drag clears it.
                let Some(selection) = self.spans.selection().cloned() else {
                    return Err(EngineError::Validation(MSG_SELECT_SNIPPET.into()));
                };
                let Some(record) = self.slot.record_mut() else {
                    return Err(EngineError::Validation(MSG_STILL_LOADING.into()));
                };
                if let AnnotationPayload::Grounding { pairs, .. } = &mut record.payload {
                    let color = palette::pair_color(pairs.len());
                    pairs.push(GroundingPair {
                        id: fresh_id(),
                        text: selection.text,
                        span_start: selection.start,
                        span_end: selection.end,
                        x: rect.x,
                        y: rect.y,
                        width: rect.width,
                        height: rect.height,
                        color: Some(color),
                    });
                }
                self.spans.clear();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Payload edits
    // ------------------------------------------------------------------

    /// Replace the caption text. The live span selection is cleared
    /// since its indices no longer apply; existing pairs keep their
    /// recorded spans until re-linked.
    pub fn set_caption(&mut self, text: &str) {
        if let Some(record) = self.slot.record_mut() {
            match &mut record.payload {
                AnnotationPayload::Grounding { caption, .. } => *caption = text.to_string(),
                AnnotationPayload::Caption(caption) => *caption = text.to_string(),
                _ => {}
            }
        }
        self.spans.clear();
    }

    /// Track the caption field's selection.
    pub fn select_caption_range(&mut self, start: usize, end: usize) {
        let caption = match self.slot.record().map(|r| &r.payload) {
            Some(AnnotationPayload::Grounding { caption, .. }) => caption.clone(),
            _ => return,
        };
        self.spans.set_from_field(&caption, start, end);
    }

    /// Re-link an existing pair to the current selection.
    pub fn apply_selection_to_pair(&mut self, pair_id: &str) -> Result<(), EngineError> {
        let Some(selection) = self.spans.selection().cloned() else {
            return Err(EngineError::Validation(MSG_SELECT_SNIPPET.into()));
        };
        let Some(record) = self.slot.record_mut() else {
            return Err(EngineError::Validation(MSG_STILL_LOADING.into()));
        };
        let AnnotationPayload::Grounding { pairs, .. } = &mut record.payload else {
            return Ok(());
        };
        let Some(pair) = pairs.iter_mut().find(|p| p.id == pair_id) else {
            return Err(EngineError::Validation(
                "That bounding box no longer exists.".into(),
            ));
        };
        pair.text = selection.text;
        pair.span_start = selection.start;
        pair.span_end = selection.end;
        Ok(())
    }

    /// Toggle a class label on the current item per the label mode.
    pub fn toggle_label(&mut self, label: &str) {
        let Some(record) = self.slot.record_mut() else {
            return;
        };
        if let AnnotationPayload::Labels(labels) = &mut record.payload {
            self.labels.toggle(labels, label);
        }
    }

    /// Remove a drawn box. Returns whether anything was removed.
    pub fn remove_box(&mut self, box_id: &str) -> bool {
        let Some(record) = self.slot.record_mut() else {
            return false;
        };
        if let AnnotationPayload::Boxes(boxes) = &mut record.payload {
            let before = boxes.len();
            boxes.retain(|b| b.id != box_id);
            return boxes.len() != before;
        }
        false
    }

    /// Remove a grounding pair. Returns whether anything was removed.
    pub fn remove_pair(&mut self, pair_id: &str) -> bool {
        let Some(record) = self.slot.record_mut() else {
            return false;
        };
        if let AnnotationPayload::Grounding { pairs, .. } = &mut record.payload {
            let before = pairs.len();
            pairs.retain(|p| p.id != pair_id);
            return pairs.len() != before;
        }
        false
    }

    /// The box under a viewport point, for selection by click. When
    /// regions overlap, the last one in the paint list wins (it renders
    /// on top), not the smallest or the first by area.
    pub fn box_at(&self, client_x: f32, client_y: f32) -> Option<&DetectionBox> {
        let point = self.viewport.normalize(client_x, client_y)?;
        match self.slot.record().map(|r| &r.payload) {
            Some(AnnotationPayload::Boxes(boxes)) => boxes.iter().rev().find(|b| {
                NormRect {
                    x: b.x,
                    y: b.y,
                    width: b.width,
                    height: b.height,
                }
                .contains(point)
            }),
            _ => None,
        }
    }

    /// The grounding pair under a viewport point, topmost painted first.
    pub fn pair_at(&self, client_x: f32, client_y: f32) -> Option<&GroundingPair> {
        let point = self.viewport.normalize(client_x, client_y)?;
        match self.slot.record().map(|r| &r.payload) {
            Some(AnnotationPayload::Grounding { pairs, .. }) => pairs.iter().rev().find(|p| {
                NormRect {
                    x: p.x,
                    y: p.y,
                    width: p.width,
                    height: p.height,
                }
                .contains(point)
            }),
            _ => None,
        }
    }

    /// Caption preview segments for the current grounding record.
    pub fn caption_segments(&self) -> Vec<CaptionSegment> {
        match self.slot.record().map(|r| &r.payload) {
            Some(AnnotationPayload::Grounding { caption, pairs }) => {
                segment_caption(caption, pairs)
            }
            _ => Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Save the current item. On success the record takes the server's
    /// echo, the badge updates, and the summary refreshes. On failure
    /// nothing local changes.
    pub async fn save(&mut self) -> Result<RecordStatus, EngineError> {
        let Some(record) = self.slot.record() else {
            return Err(EngineError::Validation(MSG_STILL_LOADING.into()));
        };
        let payload = record.payload.clone();
        let path = self
            .slot
            .path()
            .map(str::to_string)
            .unwrap_or_default();

        let saved = self
            .api
            .save_annotation(&self.dataset.id, self.dataset.task, &path, &payload)
            .await?;
        let status = saved.status;

        // The user may have navigated while the request was in flight;
        // only the matching item takes the echo.
        if self.slot.path() == Some(path.as_str()) {
            if let Some(record) = self.slot.record_mut() {
                *record = saved;
            }
        }
        self.nav.set_status(&path, status);
        self.refresh_summary().await;
        Ok(status)
    }

    /// Save, then move to `next_index` (default: the next item), so
    /// "Save & Next" is one action. A failed save never advances.
    pub async fn save_and_advance(
        &mut self,
        next_index: Option<usize>,
    ) -> Result<RecordStatus, EngineError> {
        let status = self.save().await?;
        let target = next_index.unwrap_or_else(|| self.nav.index() + 1);
        if self.nav.jump_to(target) {
            self.load_current().await?;
        }
        Ok(status)
    }

    /// Skip the current item: empty payload, skipped status. Destroys
    /// any in-progress draft on success.
    pub async fn skip(&mut self) -> Result<(), EngineError> {
        let Some(path) = self.slot.path().map(str::to_string) else {
            return Err(EngineError::Validation(MSG_STILL_LOADING.into()));
        };
        self.api
            .skip_annotation(&self.dataset.id, self.dataset.task, &path)
            .await?;

        self.draw.cancel();
        self.spans.clear();
        // Reinstall through a fresh token so a fetch still in flight for
        // this item cannot resurrect the pre-skip payload.
        if self.slot.path() == Some(path.as_str()) {
            let token = self.slot.begin_load(&path);
            self.slot.install(token, AnnotationRecord::skipped(self.dataset.task));
        }
        self.nav.set_status(&path, RecordStatus::Skipped);
        self.refresh_summary().await;
        Ok(())
    }

    /// Re-fetch the summary. A failure keeps the previous snapshot (the
    /// next save retries), so progress can lag but never lies about a
    /// save having happened.
    pub async fn refresh_summary(&mut self) {
        match self
            .api
            .fetch_summary(&self.dataset.id, self.dataset.task)
            .await
        {
            Ok(summary) => self.progress.update(summary),
            Err(e) => tracing::warn!("summary refresh failed: {e}"),
        }
    }
}
