use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::tag::Compound;

/// Reserved identifier for the world of the active session.
pub const CURRENT_WORLD: &str = "current";

/// Which world a caller is addressing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WorldSelector {
    Current,
    Named(String),
}

impl WorldSelector {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.eq_ignore_ascii_case(CURRENT_WORLD) {
            WorldSelector::Current
        } else {
            WorldSelector::Named(text.to_string())
        }
    }
}

impl FromStr for WorldSelector {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for WorldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldSelector::Current => f.write_str(CURRENT_WORLD),
            WorldSelector::Named(name) => f.write_str(name),
        }
    }
}

/// Source and sink of tag trees.
///
/// A resolved tree is owned by the caller for one operation: read or mutate
/// through [`TreeProvider::root`], then hand it back to
/// [`TreeProvider::persist`] if it changed. Implementations do no locking;
/// hosts that run operations concurrently must serialise per world.
pub trait TreeProvider {
    type Tree;

    /// `Ok(None)` when nothing matches `world`.
    fn resolve(&self, world: &WorldSelector) -> Result<Option<Self::Tree>>;

    fn root<'t>(&self, tree: &'t mut Self::Tree) -> &'t mut Compound;

    fn persist(&self, tree: &Self::Tree) -> Result<()>;
}

/// A tree handed out by [`MemoryProvider`].
#[derive(Debug, Clone)]
pub struct MemoryTree {
    pub name: String,
    pub root: Compound,
}

/// Provider over trees held in memory, keyed by world name.
///
/// Persisting stores the tree back under its name and bumps a counter.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    worlds: RefCell<BTreeMap<String, Compound>>,
    current: Option<String>,
    persists: Cell<usize>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_world(self, name: impl Into<String>, root: Compound) -> Self {
        self.worlds.borrow_mut().insert(name.into(), root);
        self
    }

    pub fn with_current(mut self, name: impl Into<String>) -> Self {
        self.current = Some(name.into());
        self
    }

    /// Snapshot of a stored world.
    pub fn world(&self, name: &str) -> Option<Compound> {
        self.worlds.borrow().get(name).cloned()
    }

    pub fn persist_count(&self) -> usize {
        self.persists.get()
    }
}

impl TreeProvider for MemoryProvider {
    type Tree = MemoryTree;

    fn resolve(&self, world: &WorldSelector) -> Result<Option<MemoryTree>> {
        let name = match world {
            WorldSelector::Current => match &self.current {
                Some(name) => name.as_str(),
                None => return Ok(None),
            },
            WorldSelector::Named(name) => name.as_str(),
        };
        Ok(self.worlds.borrow().get(name).map(|root| MemoryTree {
            name: name.to_string(),
            root: root.clone(),
        }))
    }

    fn root<'t>(&self, tree: &'t mut MemoryTree) -> &'t mut Compound {
        &mut tree.root
    }

    fn persist(&self, tree: &MemoryTree) -> Result<()> {
        self.worlds
            .borrow_mut()
            .insert(tree.name.clone(), tree.root.clone());
        self.persists.set(self.persists.get() + 1);
        Ok(())
    }
}
