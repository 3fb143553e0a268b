//! Class-label state for the classification and detection annotators.
//!
//! The label set comes from the dataset record on the server; an
//! optional local YAML file can override colors and keyboard shortcuts
//! per label.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::palette;

/// Whether an item may carry one label or several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelMode {
    #[default]
    Single,
    Multi,
}

/// Optional per-label style override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelStyle {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
}

/// Contents of a labels.yaml override file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelStyleFile {
    #[serde(default)]
    pub labels: Vec<LabelStyle>,
}

/// The dataset's class names plus the annotator's current pick.
#[derive(Debug, Default)]
pub struct LabelSet {
    names: Vec<String>,
    mode: LabelMode,
    active: Option<usize>,
    styles: Vec<LabelStyle>,
}

impl LabelSet {
    pub fn new(names: Vec<String>, mode: LabelMode) -> Self {
        Self {
            names,
            mode,
            active: None,
            styles: Vec::new(),
        }
    }

    pub fn with_styles(mut self, styles: LabelStyleFile) -> Self {
        self.styles = styles.labels;
        self
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn mode(&self) -> LabelMode {
        self.mode
    }

    /// Select the class used for the next drawn box. Unknown names are
    /// ignored so a stale shortcut can't select nothing silently.
    pub fn set_active(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(idx) => {
                self.active = Some(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// The currently selected class, the detection draw precondition.
    pub fn active_label(&self) -> Option<&str> {
        self.active.map(|i| self.names[i].as_str())
    }

    /// Label bound to a digit key: an explicit shortcut override wins,
    /// otherwise "1" through "9" select classes positionally.
    pub fn label_for_digit(&self, digit: char) -> Option<&str> {
        if let Some(style) = self
            .styles
            .iter()
            .find(|s| s.shortcut.as_deref() == Some(digit.to_string().as_str()))
        {
            if self.names.iter().any(|n| *n == style.name) {
                return Some(style.name.as_str());
            }
        }
        let pos = digit.to_digit(10)? as usize;
        if pos == 0 {
            return None;
        }
        self.names.get(pos - 1).map(String::as_str)
    }

    /// Display color for a label: style override, else the fixed palette.
    pub fn color_for(&self, label: &str) -> String {
        self.styles
            .iter()
            .find(|s| s.name == label)
            .and_then(|s| s.color.clone())
            .unwrap_or_else(|| palette::label_color(label).to_string())
    }

    /// Toggle `label` on an item's label list per the label mode:
    /// single-label replaces (or clears, when re-picking the current
    /// label); multi-label toggles membership preserving order.
    pub fn toggle(&self, labels: &mut Vec<String>, label: &str) {
        match self.mode {
            LabelMode::Single => {
                if labels.len() == 1 && labels[0] == label {
                    labels.clear();
                } else {
                    labels.clear();
                    labels.push(label.to_string());
                }
            }
            LabelMode::Multi => {
                if let Some(pos) = labels.iter().position(|l| l == label) {
                    labels.remove(pos);
                } else {
                    labels.push(label.to_string());
                }
            }
        }
    }
}

/// Load label style overrides, searching the usual spots.
///
/// Search order: explicit path (if given), ./labels.yaml, then the
/// platform config directory. Missing or unparsable files fall through
/// to the next candidate.
pub fn load_label_styles(path: Option<&str>) -> LabelStyleFile {
    let mut candidates: Vec<String> = Vec::new();
    if let Some(p) = path {
        candidates.push(p.to_string());
    }
    candidates.push("./labels.yaml".to_string());
    if let Some(dirs) = directories::ProjectDirs::from("", "", "siwa-annotator") {
        candidates.push(dirs.config_dir().join("labels.yaml").display().to_string());
    }

    for candidate in candidates {
        let expanded = shellexpand::tilde(&candidate);
        let path_obj = Path::new(expanded.as_ref());
        if !path_obj.exists() {
            continue;
        }
        match std::fs::read_to_string(path_obj) {
            Ok(content) => match serde_yaml::from_str::<LabelStyleFile>(&content) {
                Ok(file) => return file,
                Err(e) => {
                    tracing::warn!("ignoring label styles {}: {e}", path_obj.display());
                }
            },
            Err(e) => {
                tracing::warn!("ignoring label styles {}: {e}", path_obj.display());
            }
        }
    }
    LabelStyleFile::default()
}
