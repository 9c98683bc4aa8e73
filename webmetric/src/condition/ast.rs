//! Abstract Syntax Tree definitions for the condition language.

use crate::value::PrimitiveValue;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// Equal (==, =)
    Eq,
    /// Not equal (!=)
    NotEq,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    LtEq,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    GtEq,
}

impl ComparisonOp {
    /// Returns true for the operators that require an ordering.
    #[must_use]
    pub fn is_ordering(self) -> bool {
        matches!(self, Self::Lt | Self::LtEq | Self::Gt | Self::GtEq)
    }
}

impl std::fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eq => write!(f, "=="),
            Self::NotEq => write!(f, "!="),
            Self::Lt => write!(f, "<"),
            Self::LtEq => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::GtEq => write!(f, ">="),
        }
    }
}

/// Logical operators for combining expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// Logical AND
    And,
    /// Logical OR
    Or,
}

impl std::fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => write!(f, "&&"),
            Self::Or => write!(f, "||"),
        }
    }
}

/// Built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// `isNaN(x)`: true if `x` is a float NaN.
    IsNaN,
    /// `isInf(x)`: true if `x` is an infinite float.
    IsInf,
}

impl Function {
    /// Looks a function up by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "isNaN" => Some(Self::IsNaN),
            "isInf" => Some(Self::IsInf),
            _ => None,
        }
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IsNaN => write!(f, "isNaN"),
            Self::IsInf => write!(f, "isInf"),
        }
    }
}

/// A value-producing term.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A literal value.
    Literal(PrimitiveValue),
    /// A variable reference (`result`).
    Identifier(String),
    /// A function call.
    Call {
        /// The function.
        function: Function,
        /// The single argument.
        argument: Box<Operand>,
    },
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(PrimitiveValue::String(s)) => write!(f, "'{s}'"),
            Self::Literal(v) => write!(f, "{v}"),
            Self::Identifier(name) => write!(f, "{name}"),
            Self::Call { function, argument } => write!(f, "{function}({argument})"),
        }
    }
}

/// A boolean expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A bare operand, which must evaluate to a boolean.
    Operand(Operand),
    /// A comparison between two operands.
    Compare {
        /// Left-hand side.
        left: Operand,
        /// The comparison operator.
        operator: ComparisonOp,
        /// Right-hand side.
        right: Operand,
    },
    /// Logical negation.
    Not(Box<Expr>),
    /// Two expressions combined with a logical operator.
    Combined {
        /// Left-hand side expression.
        left: Box<Expr>,
        /// The logical operator.
        operator: LogicalOp,
        /// Right-hand side expression.
        right: Box<Expr>,
    },
    /// A grouped expression (parentheses).
    Grouped(Box<Expr>),
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Operand(operand) => write!(f, "{operand}"),
            Self::Compare {
                left,
                operator,
                right,
            } => write!(f, "{left} {operator} {right}"),
            Self::Not(inner) => write!(f, "!{inner}"),
            Self::Combined {
                left,
                operator,
                right,
            } => write!(f, "{left} {operator} {right}"),
            Self::Grouped(inner) => write!(f, "({inner})"),
        }
    }
}
