//! # Formula Parser Module
//!
//! ## Aim
//! Recursive-descent parser from formula text to an [`Equation`] tree, with
//! exhaustive syntax validation and positional error reporting.
//!
//! ## Grammar
//! ```text
//! equation := term ('+' term)* '=' term ('+' term)*
//! term     := (group | element)+ ('^' number? sign)?
//! group    := '(' (group | element)+ ')' number?
//! element  := NAME number?
//! number   := DIGITS            // default 1 when absent
//! sign     := '+' | '-'
//! ```
//!
//! ## Error Reporting
//! All failures produce a [`SyntaxError`] carrying a human-readable message
//! and a half-open `[start, end)` byte span into the original string, so a
//! caller can highlight the offending piece of input; `end == start` when no
//! better span is known.
//!
//! ## Electron Handling
//! The identifier `e` is the single legal lowercase-starting name. A term
//! whose elements reduce to `e` alone, with charge 0 or -1, is canonicalized
//! to the free-electron term (no items, charge -1). Every other all-lowercase
//! name is rejected, which keeps stray identifiers and charge markers from
//! being read as elements.

use crate::Formulas::chem_types::{
    ChemicalComposition, ELECTRON_NAME, Element, ElementSet, Equation, FormulaNode, Group, Term,
};
use crate::Formulas::tokenizer::Tokenizer;
use crate::Utils::checked_math::checked_parse_int;
use thiserror::Error;

/// Malformed input, with a `[start, end)` span for highlighting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub start: usize,
    pub end: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, start: usize) -> Self {
        Self {
            message: message.into(),
            start,
            end: start,
        }
    }

    pub fn with_span(message: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            message: message.into(),
            start,
            end,
        }
    }
}

/// Parses a formula string into an [`Equation`].
pub fn parse(formula: &str) -> Result<Equation, SyntaxError> {
    let mut tok = Tokenizer::new(formula);
    parse_equation(&mut tok)
}

fn parse_equation(tok: &mut Tokenizer) -> Result<Equation, SyntaxError> {
    let mut left = vec![parse_term(tok)?];
    loop {
        match tok.peek()? {
            Some("=") => {
                tok.consume("=")?;
                break;
            }
            Some("+") => {
                tok.consume("+")?;
                left.push(parse_term(tok)?);
            }
            Some(_) => return Err(SyntaxError::new("Plus expected", tok.position())),
            None => {
                return Err(SyntaxError::new(
                    "Plus or equal sign expected",
                    tok.position(),
                ));
            }
        }
    }
    let mut right = vec![parse_term(tok)?];
    loop {
        match tok.peek()? {
            None => break,
            Some("+") => {
                tok.consume("+")?;
                right.push(parse_term(tok)?);
            }
            Some(_) => return Err(SyntaxError::new("Plus or end expected", tok.position())),
        }
    }
    Ok(Equation::new(left, right))
}

fn parse_term(tok: &mut Tokenizer) -> Result<Term, SyntaxError> {
    let start = tok.position();

    let mut items: Vec<FormulaNode> = Vec::new();
    loop {
        match tok.peek()? {
            Some("(") => items.push(FormulaNode::from(parse_group(tok)?)),
            Some(token) if is_name_token(token) => {
                items.push(FormulaNode::from(parse_element(tok)?))
            }
            _ => break,
        }
    }

    let mut charge = 0;
    if let Some("^") = tok.peek()? {
        tok.consume("^")?;
        if tok.peek()?.is_none() {
            return Err(SyntaxError::new("Number or sign expected", tok.position()));
        }
        charge = parse_optional_number(tok)?;
        match tok.peek()? {
            Some("+") => {}
            Some("-") => charge = -charge,
            _ => return Err(SyntaxError::new("Sign expected", tok.position())),
        }
        tok.take()?;
    }

    if items.is_empty() {
        return Err(SyntaxError::with_span(
            "Invalid term - empty",
            start,
            tok.position(),
        ));
    }

    let mut elems = ElementSet::new();
    for item in &items {
        item.collect_elements(&mut elems);
    }
    if elems.contains(ELECTRON_NAME) {
        // the electron special case: `e` must stand alone and its term
        // collapses to the canonical form
        if items.len() > 1 {
            return Err(SyntaxError::with_span(
                "Invalid term - electron needs to stand alone",
                start,
                tok.position(),
            ));
        }
        if charge != 0 && charge != -1 {
            return Err(SyntaxError::with_span(
                "Invalid term - invalid charge for electron",
                start,
                tok.position(),
            ));
        }
        return Ok(Term::new(Vec::new(), -1));
    }
    for name in elems.names() {
        if is_all_lowercase(name) {
            return Err(SyntaxError::with_span(
                format!("Invalid element name \"{}\"", name),
                start,
                tok.position(),
            ));
        }
    }

    Ok(Term::new(items, charge))
}

fn parse_group(tok: &mut Tokenizer) -> Result<Group, SyntaxError> {
    let start = tok.position();
    tok.consume("(")?;
    let mut items: Vec<FormulaNode> = Vec::new();
    loop {
        match tok.peek()? {
            Some("(") => items.push(FormulaNode::from(parse_group(tok)?)),
            Some(token) if is_name_token(token) => {
                items.push(FormulaNode::from(parse_element(tok)?))
            }
            Some(")") => {
                tok.consume(")")?;
                if items.is_empty() {
                    return Err(SyntaxError::with_span("Empty group", start, tok.position()));
                }
                break;
            }
            _ => {
                return Err(SyntaxError::new(
                    "Element, group, or closing parenthesis expected",
                    tok.position(),
                ));
            }
        }
    }
    let count = parse_positive_number(tok, start)?;
    Ok(Group::new(items, count))
}

fn parse_element(tok: &mut Tokenizer) -> Result<Element, SyntaxError> {
    let start = tok.position();
    let name = tok.take()?;
    debug_assert!(is_name_token(name));
    let count = parse_positive_number(tok, start)?;
    Ok(Element::new(name, count))
}

/// A number token, defaulting to 1 when absent, rejected when below 1.
fn parse_positive_number(tok: &mut Tokenizer, start: usize) -> Result<i64, SyntaxError> {
    let count = parse_optional_number(tok)?;
    if count < 1 {
        return Err(SyntaxError::with_span(
            "Count must be a positive integer",
            start,
            tok.position(),
        ));
    }
    Ok(count)
}

fn parse_optional_number(tok: &mut Tokenizer) -> Result<i64, SyntaxError> {
    match tok.peek()? {
        Some(token) if is_digit_token(token) => {
            let start = tok.position();
            let token = tok.take()?;
            checked_parse_int(token)
                .map_err(|err| SyntaxError::with_span(err.to_string(), start, start + token.len()))
        }
        _ => Ok(1),
    }
}

fn is_name_token(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

fn is_digit_token(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn is_all_lowercase(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_equation() {
        let eqn = parse("H2 + O2 = H2O").unwrap();
        assert_eq!(eqn.get_left_side().len(), 2);
        assert_eq!(eqn.get_right_side().len(), 1);
        let water = &eqn.get_right_side()[0];
        assert_eq!(water.count_element("H"), Ok(2));
        assert_eq!(water.count_element("O"), Ok(1));
        assert_eq!(water.get_charge(), 0);
    }

    #[test]
    fn test_parse_groups_and_nesting() {
        let eqn = parse("Fe(CN)6 = Fe + (C(N)1)6").unwrap();
        let ferricyanide = &eqn.get_left_side()[0];
        assert_eq!(ferricyanide.count_element("Fe"), Ok(1));
        assert_eq!(ferricyanide.count_element("C"), Ok(6));
        assert_eq!(ferricyanide.count_element("N"), Ok(6));
        let nested = &eqn.get_right_side()[1];
        assert_eq!(nested.count_element("C"), Ok(6));
        assert_eq!(nested.count_element("N"), Ok(6));
    }

    #[test]
    fn test_parse_charges() {
        let eqn = parse("H^+ + OH^- = H2O").unwrap();
        assert_eq!(eqn.get_left_side()[0].get_charge(), 1);
        assert_eq!(eqn.get_left_side()[1].get_charge(), -1);

        let eqn = parse("Fe^3+ = Fe^2+ + X^0+").unwrap();
        assert_eq!(eqn.get_left_side()[0].get_charge(), 3);
        assert_eq!(eqn.get_right_side()[0].get_charge(), 2);
        assert_eq!(eqn.get_right_side()[1].get_charge(), 0);
    }

    #[test]
    fn test_electron_canonicalization() {
        let eqn = parse("H^2+ = e").unwrap();
        let electron = &eqn.get_right_side()[0];
        assert!(electron.is_electron());
        assert!(electron.get_items().is_empty());
        assert_eq!(electron.get_charge(), -1);

        // an explicit charge of -1 is also accepted
        let eqn = parse("H = e^-").unwrap();
        assert!(eqn.get_right_side()[0].is_electron());
    }

    #[test]
    fn test_electron_must_stand_alone() {
        let err = parse("He + e H = H").unwrap_err();
        assert_eq!(err.message, "Invalid term - electron needs to stand alone");

        let err = parse("e^2- = H").unwrap_err();
        assert_eq!(err.message, "Invalid term - invalid charge for electron");
    }

    #[test]
    fn test_invalid_lowercase_element() {
        let err = parse("xyz = H").unwrap_err();
        assert_eq!(err.message, "Invalid element name \"xyz\"");
        assert_eq!(err.start, 0);
        assert_eq!(err.end, 4);
    }

    #[test]
    fn test_empty_term_rejected() {
        let err = parse("H2 + = O2").unwrap_err();
        assert_eq!(err.message, "Invalid term - empty");

        let err = parse("^2+ = H").unwrap_err();
        assert_eq!(err.message, "Invalid term - empty");
    }

    #[test]
    fn test_empty_group_rejected() {
        let err = parse("()2 = H").unwrap_err();
        assert_eq!(err.message, "Empty group");
        assert_eq!(err.start, 0);
        assert_eq!(err.end, 2);
    }

    #[test]
    fn test_zero_count_rejected() {
        let err = parse("H0 = H").unwrap_err();
        assert_eq!(err.message, "Count must be a positive integer");

        let err = parse("(OH)0 = H").unwrap_err();
        assert_eq!(err.message, "Count must be a positive integer");
    }

    #[test]
    fn test_missing_equal_sign() {
        let err = parse("H2 + O2").unwrap_err();
        assert_eq!(err.message, "Plus or equal sign expected");
        assert_eq!(err.start, 7);
    }

    #[test]
    fn test_trailing_garbage() {
        let err = parse("H = H = H").unwrap_err();
        assert_eq!(err.message, "Plus or end expected");
    }

    #[test]
    fn test_charge_suffix_errors() {
        let err = parse("H^ = H").unwrap_err();
        assert_eq!(err.message, "Sign expected");

        let err = parse("H^2 = H").unwrap_err();
        assert_eq!(err.message, "Sign expected");

        let err = parse("H^").unwrap_err();
        assert_eq!(err.message, "Number or sign expected");
    }

    #[test]
    fn test_invalid_symbol_position() {
        let err = parse("H2 ! O2 = H2O").unwrap_err();
        assert_eq!(err.message, "Invalid symbol");
        assert_eq!(err.start, 3);
    }

    #[test]
    fn test_literal_overflow_is_syntax_error() {
        let err = parse("H99999999999999999999 = H").unwrap_err();
        assert_eq!(err.message, "Arithmetic overflow");
        assert_eq!(err.start, 1);
        assert_eq!(err.end, 21);
    }
}
