use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Binary check between a rendered value and an expected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Contains,
    Gt,
    Lt,
    Ge,
    Le,
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let op = match s.trim().to_ascii_lowercase().as_str() {
            "==" | "equals" => Operator::Eq,
            "!=" | "notequals" => Operator::Ne,
            "contains" => Operator::Contains,
            ">" | "greater" => Operator::Gt,
            "<" | "less" => Operator::Lt,
            ">=" | "greaterorequals" => Operator::Ge,
            "<=" | "lessorequals" => Operator::Le,
            _ => return Err(Error::UnknownOperator(s.trim().to_string())),
        };
        Ok(op)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Contains => "contains",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
        })
    }
}

impl Operator {
    /// Equality is exact text comparison, `contains` ignores case, and the
    /// ordering operators compare as `f64`. Ordering on text that does not
    /// parse as a number is always `false`.
    pub fn apply(self, actual: &str, expected: &str) -> bool {
        match self {
            Operator::Eq => actual == expected,
            Operator::Ne => actual != expected,
            Operator::Contains => actual.to_lowercase().contains(&expected.to_lowercase()),
            Operator::Gt => numeric(actual, expected, |a, b| a > b),
            Operator::Lt => numeric(actual, expected, |a, b| a < b),
            Operator::Ge => numeric(actual, expected, |a, b| a >= b),
            Operator::Le => numeric(actual, expected, |a, b| a <= b),
        }
    }
}

fn numeric(actual: &str, expected: &str, cmp: fn(f64, f64) -> bool) -> bool {
    match (actual.trim().parse::<f64>(), expected.trim().parse::<f64>()) {
        (Ok(a), Ok(b)) => cmp(a, b),
        _ => false,
    }
}

/// Parse `operator` and apply it. An unknown operator is reported as an
/// error; callers that gate on the result treat that as `false`.
pub fn evaluate(actual: &str, operator: &str, expected: &str) -> Result<bool> {
    let op: Operator = operator.parse()?;
    Ok(op.apply(actual, expected))
}
