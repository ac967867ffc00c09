// Dotted-path addressing over a tag tree.
// - `read` descends compounds by key and lists by index; any miss is `None`.
// - `write_with` creates missing compounds on the way down, but refuses to
//   step through a leaf or list. All checks run before the first mutation.
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::tag::{Compound, TagKind, TagNode};

/// A parsed `a.b.c` path. Always holds at least one non-empty segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagPath {
    segments: Vec<String>,
}

impl TagPath {
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::format("path is empty"));
        }
        let segments: Vec<String> = text.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(Error::format(format!("path has an empty segment: {}", text)));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Intermediate segments and the final key.
    pub fn split_last(&self) -> (&[String], &str) {
        match self.segments.split_last() {
            Some((last, parents)) => (parents, last.as_str()),
            None => (&[], ""),
        }
    }
}

impl FromStr for TagPath {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TagPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

pub fn read<'a>(root: &'a Compound, path: &TagPath) -> Option<&'a TagNode> {
    let mut segments = path.segments().iter();
    let first = segments.next()?;
    let mut current = root.get(first.as_str())?;
    for seg in segments {
        current = match current {
            TagNode::Compound(map) => map.get(seg.as_str())?,
            TagNode::List(items) => items.get(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Set the node at `path`, building it from whatever currently sits there.
///
/// Missing intermediate compounds are created. An intermediate that exists but
/// is not a compound is a [`Error::PathConflict`]. If `build` fails or a
/// conflict is found the tree is left untouched.
pub fn write_with<F>(root: &mut Compound, path: &TagPath, build: F) -> Result<()>
where
    F: FnOnce(Option<&TagNode>) -> Result<TagNode>,
{
    let (parents, last) = path.split_last();

    let mut existing: Option<&Compound> = Some(&*root);
    for seg in parents {
        let Some(map) = existing else { break };
        existing = match map.get(seg.as_str()) {
            None => None,
            Some(TagNode::Compound(child)) => Some(child),
            Some(other) => return Err(conflict(seg, other.kind())),
        };
    }
    let node = build(existing.and_then(|map| map.get(last)))?;

    let mut target: &mut Compound = root;
    for seg in parents {
        let slot = target
            .entry(seg.clone())
            .or_insert_with(|| TagNode::Compound(Compound::new()));
        target = match slot {
            TagNode::Compound(child) => child,
            other => return Err(conflict(seg, other.kind())),
        };
    }
    target.insert(last.to_string(), node);
    Ok(())
}

pub fn write(root: &mut Compound, path: &TagPath, node: TagNode) -> Result<()> {
    write_with(root, path, |_| Ok(node))
}

fn conflict(segment: &str, found: TagKind) -> Error {
    Error::PathConflict { segment: segment.to_string(), found }
}

#[derive(Debug, Clone)]
pub struct ChildInfo {
    pub key_or_index: String,
    pub kind: TagKind,
    pub len: Option<usize>,
}

/// Direct children of the container at `path` (the root itself when `path`
/// is `None`). Leaves have no children; a missing path is `None`.
pub fn children(root: &Compound, path: Option<&TagPath>) -> Option<Vec<ChildInfo>> {
    let info = |key: String, v: &TagNode| ChildInfo {
        key_or_index: key,
        kind: v.kind(),
        len: v.child_count(),
    };
    let entries = |map: &Compound| -> Vec<ChildInfo> {
        map.iter().map(|(k, v)| info(k.clone(), v)).collect()
    };
    let Some(path) = path else {
        return Some(entries(root));
    };
    match read(root, path)? {
        TagNode::Compound(map) => Some(entries(map)),
        TagNode::List(items) => Some(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| info(i.to_string(), v))
                .collect(),
        ),
        _ => Some(Vec::new()),
    }
}
