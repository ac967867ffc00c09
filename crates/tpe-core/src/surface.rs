// The three caller-facing entry points. Each takes a single delimited text
// input, shares one resolver and one rendering rule, and degrades differently:
// - `set_value` is loud: failures are logged at error level and returned.
// - `query_value` always yields displayable text, a diagnostic on failure.
// - `check_requirement` folds every failure into `false`.
use std::fmt;

use serde::Deserialize;

use crate::coerce::{TypeHint, coerce};
use crate::compare::Operator;
use crate::error::{Error, Result};
use crate::path::{TagPath, read, write_with};
use crate::provider::{CURRENT_WORLD, TreeProvider, WorldSelector};
use crate::tag::TagNode;

/// Text a query yields for a missing value when no default was given.
pub const NULL_TEXT: &str = "null";
/// Diagnostic a query yields when it names no path.
pub const PATH_MISSING: &str = "ERROR: path not specified";

/// What a successful `set_value` changed.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOutcome {
    pub world: String,
    pub path: TagPath,
    pub previous: Option<TagNode>,
    pub value: TagNode,
}

impl fmt::Display for SetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} = {} ({})", self.world, self.path, self.value, self.value.kind())
    }
}

/// Apply `world|path|value|type` and persist the world.
///
/// `type` is optional and defaults to `auto`. Nothing is written or persisted
/// unless every step succeeds.
pub fn set_value<P: TreeProvider>(provider: &P, input: &str) -> Result<SetOutcome> {
    match apply_set(provider, input) {
        Ok(outcome) => {
            tracing::info!("value changed: {}", outcome);
            Ok(outcome)
        }
        Err(e) => {
            tracing::error!("error when changing value: {}", e);
            Err(e)
        }
    }
}

fn apply_set<P: TreeProvider>(provider: &P, input: &str) -> Result<SetOutcome> {
    let fields = split_fields(input)?;
    if fields.len() < 3 {
        return Err(Error::format(format!(
            "expected world|path|value|type, got {} field(s)",
            fields.len()
        )));
    }
    let world = required(fields[0], "world")?;
    let path = TagPath::parse(required(fields[1], "path")?)?;
    let value = fields[2];
    let hint: TypeHint = match fields.get(3) {
        Some(t) => t.parse()?,
        None => TypeHint::Auto,
    };

    let selector = WorldSelector::parse(world);
    let mut tree = provider
        .resolve(&selector)?
        .ok_or_else(|| Error::NotFound(world.to_string()))?;

    let mut previous = None;
    write_with(provider.root(&mut tree), &path, |prev| {
        previous = prev.cloned();
        coerce(value, hint, prev)
    })?;
    let value = read(provider.root(&mut tree), &path)
        .cloned()
        .ok_or_else(|| Error::format(format!("value vanished after write: {}", path)))?;
    provider.persist(&tree)?;

    Ok(SetOutcome { world: world.to_string(), path, previous, value })
}

/// Named parameters of a value query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QueryParams {
    pub world: Option<String>,
    pub path: Option<String>,
    pub default: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QueryForm {
    Placeholder { values: QueryParams },
    Bare(QueryParams),
}

impl QueryParams {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: Some(path.into()), ..Self::default() }
    }

    pub fn world(mut self, world: impl Into<String>) -> Self {
        self.world = Some(world.into());
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Accepts a bare `{"world":..,"path":..,"default":..}` object or the
    /// placeholder wrapper `{"placeholder":..,"values":{..}}`.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(match serde_json::from_str::<QueryForm>(s)? {
            QueryForm::Placeholder { values } => values,
            QueryForm::Bare(params) => params,
        })
    }
}

/// Rendered value at `params.path`, the default when the world or value is
/// absent, or an `ERROR: ...` diagnostic.
pub fn query_value<P: TreeProvider>(provider: &P, params: &QueryParams) -> String {
    let world = params.world.as_deref().unwrap_or(CURRENT_WORLD);
    let default = params.default.as_deref().unwrap_or(NULL_TEXT);
    let path = match params.path.as_deref().map(str::trim) {
        Some(path) if !path.is_empty() => path,
        _ => return PATH_MISSING.to_string(),
    };
    match lookup(provider, world, path) {
        Ok(Some(text)) => text,
        Ok(None) => default.to_string(),
        Err(Error::NotFound(w)) => {
            tracing::debug!("query on unknown world '{}', using default", w);
            default.to_string()
        }
        Err(e) => {
            tracing::warn!("error in query: {}", e);
            format!("ERROR: {}", e)
        }
    }
}

/// Evaluate `world|path|operator|value`. Any failure, including a missing
/// world or value, is `false`.
pub fn check_requirement<P: TreeProvider>(provider: &P, input: &str) -> bool {
    match evaluate_requirement(provider, input) {
        Ok(met) => met,
        Err(e) => {
            tracing::warn!("requirement check failed: {}", e);
            false
        }
    }
}

fn evaluate_requirement<P: TreeProvider>(provider: &P, input: &str) -> Result<bool> {
    let fields = split_fields(input)?;
    if fields.len() != 4 {
        return Err(Error::format(format!(
            "expected world|path|operator|value, got {} field(s)",
            fields.len()
        )));
    }
    let world = required(fields[0], "world")?;
    let path = required(fields[1], "path")?;
    let op: Operator = required(fields[2], "operator")?.parse()?;
    let expected = fields[3];

    match lookup(provider, world, path)? {
        Some(actual) => Ok(op.apply(&actual, expected)),
        None => {
            tracing::debug!("no value at {} in '{}'", path, world);
            Ok(false)
        }
    }
}

// Rendered value at `path`; `Ok(None)` when the path does not exist and
// `NotFound` when the world does not.
fn lookup<P: TreeProvider>(provider: &P, world: &str, path: &str) -> Result<Option<String>> {
    let path = TagPath::parse(path)?;
    let selector = WorldSelector::parse(world);
    let mut tree = provider
        .resolve(&selector)?
        .ok_or_else(|| Error::NotFound(selector.to_string()))?;
    Ok(read(provider.root(&mut tree), &path).map(TagNode::render))
}

fn split_fields(input: &str) -> Result<Vec<&str>> {
    if input.trim().is_empty() {
        return Err(Error::format("no value specified"));
    }
    Ok(input.split('|').map(str::trim).collect())
}

fn required<'a>(field: &'a str, name: &str) -> Result<&'a str> {
    if field.is_empty() {
        Err(Error::format(format!("{} is empty", name)))
    } else {
        Ok(field)
    }
}
