//! Hierarchy resolution from numeric summary prefixes
//!
//! Generated summaries encode their position in the Epic/Story/Subtask
//! hierarchy as a leading dotted numeric prefix: "1." for a root item,
//! "1.2." for a mid-level item, "1.2.3." for a leaf. This module derives
//! structural depth and parent prefixes from that text. It is pure and
//! infallible; malformed summaries simply resolve to `None` and are
//! reported by the scheduler.

use std::fmt;

/// Structural depth encoded by a summary's numeric prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyDepth {
    /// One group ("1."): an Epic-level record
    Root,
    /// Two groups ("1.2."): a Story-level record
    Mid,
    /// Three groups ("1.2.3."): a Subtask-level record
    Leaf,
}

/// Parsed leading numeric prefix of a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPrefix {
    groups: Vec<u64>,
}

impl SummaryPrefix {
    /// Parse the leading dotted numeric groups of a summary.
    ///
    /// A group is a run of ASCII digits terminated by '.'; parsing stops at
    /// the first character that does not continue the pattern. Returns
    /// `None` when the summary has no complete leading group.
    pub fn parse(summary: &str) -> Option<Self> {
        let mut rest = summary.trim_start();
        let mut groups = Vec::new();

        loop {
            let digits_end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            if digits_end == 0 || rest.as_bytes().get(digits_end) != Some(&b'.') {
                break;
            }

            match rest[..digits_end].parse::<u64>() {
                Ok(value) => groups.push(value),
                Err(_) => break,
            }
            rest = &rest[digits_end + 1..];
        }

        if groups.is_empty() {
            None
        } else {
            Some(Self { groups })
        }
    }

    pub fn groups(&self) -> &[u64] {
        &self.groups
    }

    /// Structural depth, when the group count maps onto the three-level
    /// hierarchy. Deeper prefixes are unsupported and yield `None`.
    pub fn depth(&self) -> Option<HierarchyDepth> {
        match self.groups.len() {
            1 => Some(HierarchyDepth::Root),
            2 => Some(HierarchyDepth::Mid),
            3 => Some(HierarchyDepth::Leaf),
            _ => None,
        }
    }

    /// The two-group prefix naming this record's required parent.
    ///
    /// Only leaf-depth prefixes carry enough groups to name one; everything
    /// else resolves to `None`.
    pub fn parent_prefix(&self) -> Option<String> {
        match self.depth()? {
            HierarchyDepth::Leaf => Some(format!("{}.{}.", self.groups[0], self.groups[1])),
            _ => None,
        }
    }
}

impl fmt::Display for SummaryPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.groups {
            write!(f, "{}.", group)?;
        }
        Ok(())
    }
}

/// Depth of a summary's numeric prefix, or `None` when it has no usable one.
pub fn summary_depth(summary: &str) -> Option<HierarchyDepth> {
    SummaryPrefix::parse(summary)?.depth()
}

/// Parent prefix of a leaf-level summary ("1.2.3. X" yields "1.2."), or
/// `None` for summaries at other depths or without a usable numeric prefix.
pub fn parent_prefix(summary: &str) -> Option<String> {
    SummaryPrefix::parse(summary)?.parent_prefix()
}
