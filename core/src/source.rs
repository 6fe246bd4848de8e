//! Line-indexed view of the raw source backing a parsed tree.

use crate::error::{Error, Result};

/// 1-indexed access to source lines, matching the tree's line numbering.
///
/// Lines are stored without their terminators; line `n` in the tree maps to
/// index `n - 1` here. Requests beyond the line count are a contract
/// violation, not a recoverable condition.
#[derive(Debug, Clone)]
pub struct SourceIndex {
    lines: Vec<String>,
}

impl SourceIndex {
    pub fn new(source: &str) -> Self {
        Self {
            lines: source.lines().map(str::to_owned).collect(),
        }
    }

    /// Fetch line `n` (1-indexed) without its trailing terminator.
    pub fn line(&self, n: usize) -> Result<&str> {
        if n == 0 {
            return Err(Error::LineOutOfRange(n));
        }
        self.lines
            .get(n - 1)
            .map(String::as_str)
            .ok_or(Error::LineOutOfRange(n))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
