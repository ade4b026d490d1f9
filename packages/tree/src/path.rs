//! Block paths: non-owning handles to blocks inside a tree.
//!
//! Each step names a line of the current block and a position on it: the
//! column index for a fixed line, the child index for a stack line. The
//! parent of a block is its path minus the last step.
//!
//! Paths render as `line.position` steps joined by `/`, so the second child
//! of the first stack of the third top-level block reads `0.2/1.1`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One step from a block to a nested block.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Step {
    pub line: usize,
    pub position: usize,
}

impl Step {
    pub fn new(line: usize, position: usize) -> Self {
        Self { line, position }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.line, self.position)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid block path step '{step}' at position {position}")]
pub struct PathError {
    pub step: String,
    pub position: usize,
}

/// A sequence of steps. The empty path names the block it is resolved from.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BlockPath {
    steps: Vec<Step>,
}

impl BlockPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Parse `"0.2/1.1"`. Empty input is the root path.
    pub fn parse(s: &str) -> Result<Self, PathError> {
        let mut steps = Vec::new();
        for (position, raw) in s.split('/').filter(|c| !c.is_empty()).enumerate() {
            let invalid = || PathError {
                step: raw.to_string(),
                position,
            };
            let (line, index) = raw.split_once('.').ok_or_else(invalid)?;
            steps.push(Step {
                line: line.parse().map_err(|_| invalid())?,
                position: index.parse().map_err(|_| invalid())?,
            });
        }
        Ok(Self { steps })
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn first(&self) -> Option<Step> {
        self.steps.first().copied()
    }

    pub fn last(&self) -> Option<Step> {
        self.steps.last().copied()
    }

    /// This path extended by one step.
    #[must_use]
    pub fn child(&self, step: Step) -> BlockPath {
        let mut steps = self.steps.clone();
        steps.push(step);
        BlockPath { steps }
    }

    /// The parent path and the step leading from it, or `None` at the root.
    pub fn split_last(&self) -> Option<(BlockPath, Step)> {
        let (last, rest) = self.steps.split_last()?;
        Some((BlockPath::from_steps(rest.to_vec()), *last))
    }

    pub fn parent(&self) -> Option<BlockPath> {
        self.split_last().map(|(parent, _)| parent)
    }

    /// The path without its first step.
    #[must_use]
    pub fn tail(&self) -> BlockPath {
        BlockPath {
            steps: self.steps.iter().skip(1).copied().collect(),
        }
    }

    #[must_use]
    pub fn join(&self, other: &BlockPath) -> BlockPath {
        let mut steps = self.steps.clone();
        steps.extend_from_slice(&other.steps);
        BlockPath { steps }
    }

    pub fn has_prefix(&self, prefix: &BlockPath) -> bool {
        prefix.steps.len() <= self.steps.len() && prefix.steps == self.steps[..prefix.steps.len()]
    }

    pub(crate) fn prepend(&mut self, step: Step) {
        self.steps.insert(0, step);
    }
}

impl fmt::Display for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

impl FromStr for BlockPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockPath::parse(s)
    }
}

impl From<Vec<Step>> for BlockPath {
    fn from(steps: Vec<Step>) -> Self {
        BlockPath::from_steps(steps)
    }
}
