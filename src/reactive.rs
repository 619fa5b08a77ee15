//! Derived state over asynchronously resolved inputs.
//!
//! Inputs push invalidation through a [`DependencyGraph`]; derived values are
//! pulled, recomputed only when read while dirty, and memoized in a [`Memo`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::CompareError;

/// A value produced by an upstream provider that may not have resolved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remote<T> {
    Pending,
    Complete(T),
    Error(String),
}

impl<T> Default for Remote<T> {
    fn default() -> Self {
        Remote::Pending
    }
}

impl<T> Remote<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Remote::Pending)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Remote::Complete(_))
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            Remote::Complete(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Remote<&T> {
        match self {
            Remote::Pending => Remote::Pending,
            Remote::Complete(value) => Remote::Complete(value),
            Remote::Error(message) => Remote::Error(message.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Remote<U> {
        match self {
            Remote::Pending => Remote::Pending,
            Remote::Complete(value) => Remote::Complete(f(value)),
            Remote::Error(message) => Remote::Error(message),
        }
    }

    /// The resolved value, or `NotReady` / `UpstreamFailed` naming `what`.
    pub fn require(&self, what: &str) -> Result<&T, CompareError> {
        match self {
            Remote::Complete(value) => Ok(value),
            Remote::Pending => Err(CompareError::NotReady(what.to_string())),
            Remote::Error(message) => Err(CompareError::UpstreamFailed {
                what: what.to_string(),
                message: message.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(&'static str);

impl CellId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependents: BTreeMap<CellId, BTreeSet<CellId>>,
    dirty: BTreeSet<CellId>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `cell` as derived from `upstream`. A freshly declared cell
    /// starts dirty.
    pub fn declare(&mut self, cell: CellId, upstream: &[CellId]) {
        for source in upstream {
            self.dependents.entry(*source).or_default().insert(cell);
        }
        self.dirty.insert(cell);
    }

    /// Marks every transitive dependent of `cell` dirty and returns them in
    /// visit order.
    pub fn invalidate(&mut self, cell: CellId) -> Vec<CellId> {
        let mut marked = Vec::new();
        let mut stack = vec![cell];
        let mut seen = BTreeSet::new();
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(dependents) = self.dependents.get(&current) {
                for dependent in dependents {
                    if self.dirty.insert(*dependent) {
                        marked.push(*dependent);
                    }
                    stack.push(*dependent);
                }
            }
        }
        if !marked.is_empty() {
            tracing::debug!(source = %cell, marked = marked.len(), "invalidated derived cells");
        }
        marked
    }

    pub fn is_dirty(&self, cell: CellId) -> bool {
        self.dirty.contains(&cell)
    }

    pub fn mark_clean(&mut self, cell: CellId) {
        self.dirty.remove(&cell);
    }
}

/// Slot for a derived value plus the number of times it was computed.
#[derive(Debug, Clone)]
pub struct Memo<T> {
    value: Option<T>,
    computations: u64,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self {
            value: None,
            computations: 0,
        }
    }
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes when `dirty` is set or nothing was computed yet.
    pub fn get_or_compute(&mut self, dirty: bool, compute: impl FnOnce() -> T) -> &T {
        if dirty {
            self.value = None;
        }
        let computations = &mut self.computations;
        self.value.get_or_insert_with(|| {
            *computations += 1;
            compute()
        })
    }

    pub fn computations(&self) -> u64 {
        self.computations
    }
}
