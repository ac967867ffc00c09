use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::tag::TagNode;

/// Requested leaf type for an edit. `Auto` keeps whatever type the target
/// already has, or falls back to a string when there is no target yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeHint {
    Auto,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
}

impl TypeHint {
    /// The hint that reproduces `node`'s variant. Containers have no scalar
    /// form and map to `String`.
    pub fn of(node: &TagNode) -> Self {
        match node {
            TagNode::Byte(_) => TypeHint::Byte,
            TagNode::Short(_) => TypeHint::Short,
            TagNode::Int(_) => TypeHint::Int,
            TagNode::Long(_) => TypeHint::Long,
            TagNode::Float(_) => TypeHint::Float,
            TagNode::Double(_) => TypeHint::Double,
            TagNode::String(_) | TagNode::Compound(_) | TagNode::List(_) => TypeHint::String,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeHint::Auto => "auto",
            TypeHint::Byte => "byte",
            TypeHint::Short => "short",
            TypeHint::Int => "int",
            TypeHint::Long => "long",
            TypeHint::Float => "float",
            TypeHint::Double => "double",
            TypeHint::String => "string",
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeHint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hint = match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => TypeHint::Auto,
            "byte" | "bool" | "boolean" => TypeHint::Byte,
            "short" => TypeHint::Short,
            "int" | "integer" => TypeHint::Int,
            "long" => TypeHint::Long,
            "float" => TypeHint::Float,
            "double" => TypeHint::Double,
            "string" => TypeHint::String,
            _ => return Err(Error::UnknownType(s.trim().to_string())),
        };
        Ok(hint)
    }
}

/// Build the leaf that `value` becomes under `hint`.
///
/// `previous` is the node currently at the target path, consulted only when
/// the hint is `Auto`.
pub fn coerce(value: &str, hint: TypeHint, previous: Option<&TagNode>) -> Result<TagNode> {
    let hint = match (hint, previous) {
        (TypeHint::Auto, Some(prev)) => TypeHint::of(prev),
        (hint, _) => hint,
    };
    let node = match hint {
        TypeHint::Auto | TypeHint::String => TagNode::String(value.to_string()),
        TypeHint::Byte => TagNode::Byte(parse_byte(value)?),
        TypeHint::Short => TagNode::Short(parse(value, hint)?),
        TypeHint::Int => TagNode::Int(parse(value, hint)?),
        TypeHint::Long => TagNode::Long(parse(value, hint)?),
        TypeHint::Float => TagNode::Float(finite(parse(value, hint)?, f32::is_finite, value, hint)?),
        TypeHint::Double => TagNode::Double(finite(parse(value, hint)?, f64::is_finite, value, hint)?),
    };
    Ok(node)
}

fn parse_byte(value: &str) -> Result<i8> {
    if value.eq_ignore_ascii_case("true") {
        Ok(1)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(0)
    } else {
        parse(value, TypeHint::Byte)
    }
}

// NaN and infinities have no stored form; overflow to infinity is refused too.
fn finite<T: Copy>(v: T, is_finite: fn(T) -> bool, value: &str, hint: TypeHint) -> Result<T> {
    if is_finite(v) {
        Ok(v)
    } else {
        Err(Error::Parse {
            hint,
            text: value.to_string(),
        })
    }
}

fn parse<T: FromStr>(value: &str, hint: TypeHint) -> Result<T> {
    value.parse::<T>().map_err(|_| Error::Parse {
        hint,
        text: value.to_string(),
    })
}
