//! Issue record data model

use crate::hierarchy::HierarchyDepth;
use serde::{Deserialize, Serialize};

/// One requirement item destined for the tracker.
///
/// The `summary` carries a leading dotted numeric prefix ("1.", "1.2.",
/// "1.2.3.") that encodes the record's position in the Epic/Story/Subtask
/// hierarchy. The `issue_type` label is kept verbatim as generated; it is
/// authoritative for creation, while the numeric prefix only resolves
/// parentage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    pub external_id: String,
    pub summary: String,
    pub issue_type: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Canonical issue types, forming the fixed three-level hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueType {
    Epic,
    Story,
    Subtask,
}

impl IssueRecord {
    /// Resolve the raw issue type label to its canonical type.
    ///
    /// Returns `None` for labels the importer does not recognize; the
    /// schema validator rejects such records before scheduling.
    pub fn canonical_type(&self) -> Option<IssueType> {
        IssueType::from_label(&self.issue_type)
    }
}

impl IssueType {
    /// Map a raw label to a canonical type.
    ///
    /// Accepts the English names and the localized labels emitted by the
    /// generation step ("Эпик", "История", "Подзадача").
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Epic" | "Эпик" => Some(IssueType::Epic),
            "Story" | "История" => Some(IssueType::Story),
            "Subtask" | "Sub-task" | "Подзадача" => Some(IssueType::Subtask),
            _ => None,
        }
    }

    /// Canonical English name
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Epic => "Epic",
            IssueType::Story => "Story",
            IssueType::Subtask => "Subtask",
        }
    }

    /// Depth this type occupies in a well-formed hierarchy.
    ///
    /// A record whose summary numbering disagrees with this is still
    /// created under its declared type; the numbering only drives parent
    /// resolution.
    pub fn expected_depth(&self) -> HierarchyDepth {
        match self {
            IssueType::Epic => HierarchyDepth::Root,
            IssueType::Story => HierarchyDepth::Mid,
            IssueType::Subtask => HierarchyDepth::Leaf,
        }
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
