use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Keyed container. Lookup is exact and case-sensitive; iteration keeps
/// insertion order so a rewritten file reads back in the same shape.
pub type Compound = IndexMap<String, TagNode>;

/// One node of a tag tree: a scalar leaf or a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagNode {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Compound(Compound),
    List(Vec<TagNode>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Compound,
    List,
}

impl TagKind {
    pub fn name(self) -> &'static str {
        match self {
            TagKind::Byte => "byte",
            TagKind::Short => "short",
            TagKind::Int => "int",
            TagKind::Long => "long",
            TagKind::Float => "float",
            TagKind::Double => "double",
            TagKind::String => "string",
            TagKind::Compound => "compound",
            TagKind::List => "list",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TagNode {
    pub fn kind(&self) -> TagKind {
        match self {
            TagNode::Byte(_) => TagKind::Byte,
            TagNode::Short(_) => TagKind::Short,
            TagNode::Int(_) => TagKind::Int,
            TagNode::Long(_) => TagKind::Long,
            TagNode::Float(_) => TagKind::Float,
            TagNode::Double(_) => TagKind::Double,
            TagNode::String(_) => TagKind::String,
            TagNode::Compound(_) => TagKind::Compound,
            TagNode::List(_) => TagKind::List,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            TagNode::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            TagNode::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TagNode]> {
        match self {
            TagNode::List(items) => Some(items),
            _ => None,
        }
    }

    /// Number of direct children for containers, `None` for leaves.
    pub fn child_count(&self) -> Option<usize> {
        match self {
            TagNode::Compound(c) => Some(c.len()),
            TagNode::List(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Text form shared by queries and comparisons. Containers render as
    /// opaque placeholders, never as their contents.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TagNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagNode::Byte(v) => write!(f, "{}", v),
            TagNode::Short(v) => write!(f, "{}", v),
            TagNode::Int(v) => write!(f, "{}", v),
            TagNode::Long(v) => write!(f, "{}", v),
            TagNode::Float(v) => write_float(f, *v as f64, &v.to_string(), &format!("{:e}", v)),
            TagNode::Double(v) => write_float(f, *v, &v.to_string(), &format!("{:e}", v)),
            TagNode::String(s) => f.write_str(s),
            TagNode::Compound(_) => f.write_str("{compound}"),
            TagNode::List(items) => write!(f, "[list:{}]", items.len()),
        }
    }
}

// Plain decimals for 1e-3 <= |v| < 1e7, `1.5E10` style outside that range.
// Integral values keep a ".0" so they stay distinguishable from ints.
fn write_float(f: &mut fmt::Formatter<'_>, v: f64, plain: &str, sci: &str) -> fmt::Result {
    if v.is_nan() {
        return f.write_str("NaN");
    }
    if v.is_infinite() {
        return f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
    }
    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-3..1e7).contains(&magnitude) {
        let (mantissa, exp) = sci.split_once('e').unwrap_or((sci, "0"));
        if mantissa.contains('.') {
            write!(f, "{}E{}", mantissa, exp)
        } else {
            write!(f, "{}.0E{}", mantissa, exp)
        }
    } else if plain.contains('.') {
        f.write_str(plain)
    } else {
        write!(f, "{}.0", plain)
    }
}

impl From<i8> for TagNode {
    fn from(v: i8) -> Self {
        TagNode::Byte(v)
    }
}
impl From<i16> for TagNode {
    fn from(v: i16) -> Self {
        TagNode::Short(v)
    }
}
impl From<i32> for TagNode {
    fn from(v: i32) -> Self {
        TagNode::Int(v)
    }
}
impl From<i64> for TagNode {
    fn from(v: i64) -> Self {
        TagNode::Long(v)
    }
}
impl From<f32> for TagNode {
    fn from(v: f32) -> Self {
        TagNode::Float(v)
    }
}
impl From<f64> for TagNode {
    fn from(v: f64) -> Self {
        TagNode::Double(v)
    }
}
impl From<&str> for TagNode {
    fn from(v: &str) -> Self {
        TagNode::String(v.to_string())
    }
}
impl From<String> for TagNode {
    fn from(v: String) -> Self {
        TagNode::String(v)
    }
}
impl From<Compound> for TagNode {
    fn from(v: Compound) -> Self {
        TagNode::Compound(v)
    }
}
impl From<Vec<TagNode>> for TagNode {
    fn from(v: Vec<TagNode>) -> Self {
        TagNode::List(v)
    }
}
