//! tpe-core: tag tree model, dotted-path resolution, typed edits and checks
//!
//! This crate focuses on a small, well-factored surface:
//! - Tag tree model (`TagNode`) with one rendering rule for all readers
//! - Path resolver: total reads, autovivifying writes with conflict detection
//! - Type coercion for edits and operator evaluation for checks
//! - Provider trait with in-memory and save-directory implementations
//! - Three caller-facing surfaces: set, query, requirement check
//!
pub mod backup;
pub mod coerce;
pub mod compare;
pub mod error;
pub mod path;
pub mod provider;
pub mod saves;
pub mod surface;
pub mod tag;

pub use backup::{backup_world, list_backups};
pub use coerce::{TypeHint, coerce};
pub use compare::{Operator, evaluate};
pub use error::{Error, Result};
pub use path::{ChildInfo, TagPath, children, read, write, write_with};
pub use provider::{CURRENT_WORLD, MemoryProvider, MemoryTree, TreeProvider, WorldSelector};
pub use saves::{SaveDir, World, list_worlds};
pub use surface::{QueryParams, SetOutcome, check_requirement, query_value, set_value};
pub use tag::{Compound, TagKind, TagNode};
