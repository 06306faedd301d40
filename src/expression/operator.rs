//! Comparison operators shared by predicates and selectivity estimation.

use anyhow::{bail, Result};
use std::fmt;
use std::str::FromStr;

/// The six comparison operators a predicate can apply between two values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOp {
    /// All operators, in declaration order
    pub const ALL: [ComparisonOp; 6] = [
        ComparisonOp::Eq,
        ComparisonOp::Ne,
        ComparisonOp::Lt,
        ComparisonOp::Le,
        ComparisonOp::Gt,
        ComparisonOp::Ge,
    ];

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
        }
    }

    /// The operator obtained by swapping the operands (`a < b` becomes `b > a`)
    pub fn flip(&self) -> Self {
        match self {
            ComparisonOp::Eq => ComparisonOp::Eq,
            ComparisonOp::Ne => ComparisonOp::Ne,
            ComparisonOp::Lt => ComparisonOp::Gt,
            ComparisonOp::Le => ComparisonOp::Ge,
            ComparisonOp::Gt => ComparisonOp::Lt,
            ComparisonOp::Ge => ComparisonOp::Le,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonOp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "=" | "==" => Ok(ComparisonOp::Eq),
            "!=" | "<>" => Ok(ComparisonOp::Ne),
            "<" => Ok(ComparisonOp::Lt),
            "<=" => Ok(ComparisonOp::Le),
            ">" => Ok(ComparisonOp::Gt),
            ">=" => Ok(ComparisonOp::Ge),
            other => bail!("Unknown comparison operator: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_strings() {
        assert_eq!(ComparisonOp::Eq.as_str(), "=");
        assert_eq!(ComparisonOp::Ne.as_str(), "!=");
        assert_eq!(ComparisonOp::Lt.as_str(), "<");
        assert_eq!(ComparisonOp::Le.as_str(), "<=");
        assert_eq!(ComparisonOp::Gt.as_str(), ">");
        assert_eq!(ComparisonOp::Ge.as_str(), ">=");
        assert_eq!(format!("{}", ComparisonOp::Ge), ">=");
    }

    #[test]
    fn test_parse_operator() -> Result<()> {
        for op in ComparisonOp::ALL {
            assert_eq!(op.as_str().parse::<ComparisonOp>()?, op);
        }
        assert_eq!("<>".parse::<ComparisonOp>()?, ComparisonOp::Ne);
        assert_eq!(" == ".parse::<ComparisonOp>()?, ComparisonOp::Eq);
        assert!("LIKE".parse::<ComparisonOp>().is_err());
        Ok(())
    }

    #[test]
    fn test_flip() {
        assert_eq!(ComparisonOp::Lt.flip(), ComparisonOp::Gt);
        assert_eq!(ComparisonOp::Ge.flip(), ComparisonOp::Le);
        assert_eq!(ComparisonOp::Eq.flip(), ComparisonOp::Eq);
        for op in ComparisonOp::ALL {
            assert_eq!(op.flip().flip(), op);
        }
    }
}
