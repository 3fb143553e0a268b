//! File navigation for an annotator screen.
//!
//! Handles: next, prev, first, last, random jump, jump-to picker,
//! search filtering, and status badges.
//!
//! The navigator holds the working file list as fetched (the
//! unlabeled-only toggle changes what the server returns, so toggling
//! means refetching). The search query filters only what the jump-to
//! picker shows; the index always addresses the working list.

use std::collections::HashMap;

use rand::Rng;

use crate::record::RecordStatus;

/// Keys the global shortcut handler reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
}

/// One row of the jump-to picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerEntry {
    /// Position in the working list, what `jump_to` expects.
    pub index: usize,
    pub path: String,
    pub status: RecordStatus,
}

/// Ordered file list with a clamped cursor.
#[derive(Debug, Default)]
pub struct FileNavigator {
    files: Vec<String>,
    statuses: HashMap<String, RecordStatus>,
    index: usize,
    search: String,
    only_unlabeled: bool,
}

impl FileNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the working list (dataset change, page change, or filter
    /// refetch). The cursor resets to the start.
    pub fn set_files(&mut self, files: Vec<String>, statuses: HashMap<String, RecordStatus>) {
        self.files = files;
        self.statuses = statuses;
        self.index = 0;
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Path under the cursor, if any files are loaded.
    pub fn current(&self) -> Option<&str> {
        self.files.get(self.index).map(String::as_str)
    }

    /// Status badge for a path; unknown paths read as unlabeled.
    pub fn status_of(&self, path: &str) -> RecordStatus {
        self.statuses.get(path).copied().unwrap_or_default()
    }

    /// Update one badge after a save or skip.
    pub fn set_status(&mut self, path: &str, status: RecordStatus) {
        self.statuses.insert(path.to_string(), status);
    }

    /// Move one forward, clamped at the end. Returns whether the cursor
    /// moved.
    pub fn next(&mut self) -> bool {
        if self.index + 1 < self.files.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Move one back, clamped at the start.
    pub fn prev(&mut self) -> bool {
        if self.index > 0 && !self.files.is_empty() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    pub fn first(&mut self) -> bool {
        let moved = self.index != 0;
        self.index = 0;
        moved
    }

    pub fn last(&mut self) -> bool {
        if self.files.is_empty() {
            return false;
        }
        let target = self.files.len() - 1;
        let moved = self.index != target;
        self.index = target;
        moved
    }

    /// Jump to a position in the working list, clamped into range.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if self.files.is_empty() {
            return false;
        }
        let clamped = index.min(self.files.len() - 1);
        let moved = clamped != self.index;
        self.index = clamped;
        moved
    }

    /// Jump to a uniformly random item.
    pub fn jump_random(&mut self) -> bool {
        if self.files.is_empty() {
            return false;
        }
        let mut rng = rand::thread_rng();
        self.jump_to(rng.gen_range(0..self.files.len()))
    }

    /// Arrow-key navigation. Suppressed while focus is inside a text
    /// input or text area so typing keeps its cursor movement.
    pub fn handle_key(&mut self, key: NavKey, typing: bool) -> bool {
        if typing {
            return false;
        }
        match key {
            NavKey::ArrowLeft => self.prev(),
            NavKey::ArrowRight => self.next(),
        }
    }

    /// Set the picker's search query. The cursor resets when the query
    /// actually changes, since the visible list changes identity.
    pub fn set_search(&mut self, query: &str) {
        if self.search != query {
            self.search = query.to_string();
            self.index = 0;
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn only_unlabeled(&self) -> bool {
        self.only_unlabeled
    }

    /// Flip the unlabeled-only flag. Returns the new value; the caller
    /// must refetch the file list, which resets the cursor.
    pub fn toggle_only_unlabeled(&mut self) -> bool {
        self.only_unlabeled = !self.only_unlabeled;
        self.only_unlabeled
    }

    /// Rows for the jump-to picker: case-insensitive substring match of
    /// the query against each path, capped at `cap` rows so the picker
    /// stays interactive on large datasets.
    pub fn picker_entries(&self, cap: usize) -> Vec<PickerEntry> {
        let needle = self.search.to_lowercase();
        self.files
            .iter()
            .enumerate()
            .filter(|(_, path)| needle.is_empty() || path.to_lowercase().contains(&needle))
            .take(cap)
            .map(|(index, path)| PickerEntry {
                index,
                path: path.clone(),
                status: self.status_of(path),
            })
            .collect()
    }
}
