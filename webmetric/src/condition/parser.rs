//! Condition expression parser using nom.
//!
//! Parses expressions like:
//! - `result >= 5`
//! - `result == 'healthy'`
//! - `result > 0.5 && result < 0.9`
//! - `!(result == false) or isNaN(result)`

use super::ast::{ComparisonOp, Expr, Function, LogicalOp, Operand};
use crate::value::PrimitiveValue;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit1, multispace0, one_of, satisfy},
    combinator::{map, map_res, not, opt, recognize, value, verify},
    error::{Error as NomError, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
    IResult, Parser,
};
use thiserror::Error;

/// Errors that can occur during condition parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The expression syntax is invalid.
    #[error("Invalid condition syntax: {0}")]
    SyntaxError(String),

    /// The expression is empty.
    #[error("Empty condition")]
    EmptyExpression,
}

/// Parses a condition string into an expression AST.
///
/// # Errors
///
/// Returns a `ParseError` if:
/// - The expression is empty
/// - The syntax is invalid
/// - There is unexpected trailing content
///
/// # Examples
///
/// ```
/// use webmetric::condition::{parse_condition, ComparisonOp, Expr};
///
/// let expr = parse_condition("result >= 5").unwrap();
/// assert!(matches!(expr, Expr::Compare { operator: ComparisonOp::GtEq, .. }));
/// ```
pub fn parse_condition(input: &str) -> Result<Expr, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::EmptyExpression);
    }

    match expression(input) {
        Ok((remaining, expr)) => {
            let remaining = remaining.trim();
            if remaining.is_empty() {
                Ok(expr)
            } else {
                Err(ParseError::SyntaxError(format!(
                    "Unexpected trailing content: '{remaining}'"
                )))
            }
        }
        Err(e) => Err(ParseError::SyntaxError(format!("{e}"))),
    }
}

// ============================================================================
// Logical expressions
// ============================================================================

fn expression(input: &str) -> IResult<&str, Expr> {
    or_expression(input)
}

fn or_expression(input: &str) -> IResult<&str, Expr> {
    let (input, first) = and_expression(input)?;
    let (input, rest) = many0(preceded(or_operator, and_expression)).parse(input)?;

    let result = rest.into_iter().fold(first, |left, right| Expr::Combined {
        left: Box::new(left),
        operator: LogicalOp::Or,
        right: Box::new(right),
    });

    Ok((input, result))
}

fn and_expression(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(preceded(and_operator, unary)).parse(input)?;

    let result = rest.into_iter().fold(first, |left, right| Expr::Combined {
        left: Box::new(left),
        operator: LogicalOp::And,
        right: Box::new(right),
    });

    Ok((input, result))
}

fn or_operator(input: &str) -> IResult<&str, ()> {
    value(
        (),
        delimited(multispace0, alt((tag("||"), keyword("or"))), multispace0),
    )
    .parse(input)
}

fn and_operator(input: &str) -> IResult<&str, ()> {
    value(
        (),
        delimited(multispace0, alt((tag("&&"), keyword("and"))), multispace0),
    )
    .parse(input)
}

/// Matches `word` only when no identifier character follows it.
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input| terminated(tag(word), not(satisfy(is_identifier_char))).parse(input)
}

fn is_keyword(name: &str) -> bool {
    matches!(name, "and" | "or" | "not")
}

// A comparison is tried before a group so `(result) > 5` keeps its operator
fn unary(input: &str) -> IResult<&str, Expr> {
    alt((negation, comparison, grouped)).parse(input)
}

fn negation(input: &str) -> IResult<&str, Expr> {
    let (input, ()) = alt((
        value((), (char('!'), multispace0)),
        value((), (keyword("not"), multispace0)),
    ))
    .parse(input)?;
    let (input, inner) = unary(input)?;

    Ok((input, Expr::Not(Box::new(inner))))
}

fn grouped(input: &str) -> IResult<&str, Expr> {
    let (input, _) = (char('('), multispace0).parse(input)?;
    let (input, expr) = expression(input)?;
    let (input, _) = (multispace0, char(')')).parse(input)?;

    Ok((input, Expr::Grouped(Box::new(expr))))
}

// ============================================================================
// Comparisons
// ============================================================================

fn comparison(input: &str) -> IResult<&str, Expr> {
    let (input, left) = operand(input)?;
    let (input, rest) =
        opt((delimited(multispace0, comparison_op, multispace0), operand)).parse(input)?;

    let expr = match rest {
        Some((operator, right)) => Expr::Compare {
            left,
            operator,
            right,
        },
        None => Expr::Operand(left),
    };

    Ok((input, expr))
}

fn comparison_op(input: &str) -> IResult<&str, ComparisonOp> {
    alt((
        value(ComparisonOp::Eq, tag("==")),
        value(ComparisonOp::NotEq, tag("!=")),
        value(ComparisonOp::LtEq, tag("<=")),
        value(ComparisonOp::GtEq, tag(">=")),
        value(ComparisonOp::Lt, char('<')),
        value(ComparisonOp::Gt, char('>')),
        value(ComparisonOp::Eq, char('=')),
    ))
    .parse(input)
}

// ============================================================================
// Operands
// ============================================================================

fn operand(input: &str) -> IResult<&str, Operand> {
    alt((
        map(literal, Operand::Literal),
        call,
        map(identifier, |name: &str| Operand::Identifier(name.to_string())),
        parenthesized_operand,
    ))
    .parse(input)
}

fn parenthesized_operand(input: &str) -> IResult<&str, Operand> {
    delimited((char('('), multispace0), operand, (multispace0, char(')'))).parse(input)
}

fn call(input: &str) -> IResult<&str, Operand> {
    let (rest, name) = identifier(input)?;
    let (rest, _) = (multispace0, char('('), multispace0).parse(rest)?;

    let Some(function) = Function::from_name(name) else {
        return Err(nom::Err::Failure(NomError::new(input, ErrorKind::Verify)));
    };

    let (rest, argument) = operand(rest)?;
    let (rest, _) = (multispace0, char(')')).parse(rest)?;

    Ok((
        rest,
        Operand::Call {
            function,
            argument: Box::new(argument),
        },
    ))
}

fn identifier(input: &str) -> IResult<&str, &str> {
    verify(
        recognize(pair(
            satisfy(|c: char| c.is_alphabetic() || c == '_'),
            take_while(is_identifier_char),
        )),
        |name: &str| !is_keyword(name),
    )
    .parse(input)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

// ============================================================================
// Literals
// ============================================================================

fn literal(input: &str) -> IResult<&str, PrimitiveValue> {
    alt((boolean_value, float_value, integer_value, string_value)).parse(input)
}

fn boolean_value(input: &str) -> IResult<&str, PrimitiveValue> {
    let (input, b) = alt((value(true, tag("true")), value(false, tag("false")))).parse(input)?;
    let (input, ()) = not(satisfy(is_identifier_char)).parse(input)?;
    Ok((input, PrimitiveValue::Bool(b)))
}

fn float_value(input: &str) -> IResult<&str, PrimitiveValue> {
    let (input, num) = map_res(
        alt((
            recognize((opt(char('-')), digit1, char('.'), digit1, opt(exponent))),
            recognize((opt(char('-')), digit1, exponent)),
        )),
        |s: &str| s.parse::<f64>(),
    )
    .parse(input)?;
    Ok((input, PrimitiveValue::Float(num)))
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize((one_of("eE"), opt(one_of("+-")), digit1)).parse(input)
}

fn integer_value(input: &str) -> IResult<&str, PrimitiveValue> {
    let (input, num) = map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>()
    })
    .parse(input)?;
    Ok((input, PrimitiveValue::Int(num)))
}

fn string_value(input: &str) -> IResult<&str, PrimitiveValue> {
    let (input, s) = alt((
        delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
    ))
    .parse(input)?;
    Ok((input, PrimitiveValue::String(s.to_string())))
}

// ============================================================================
// Tests
// ============================================================================
