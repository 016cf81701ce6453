//! # Result Rendering Module
//!
//! ## Aim
//! Turns a balanced equation into things a caller can show or store: the
//! one-line text form (`2 H2 + O2 → 2 H2O`), a caret highlight of a syntax
//! error span, a per-element conservation table and a serializable JSON
//! payload with file export.
//!
//! Rendering conventions follow the data model: zero-coefficient terms are
//! skipped entirely, unit coefficients are left implicit and negative
//! coefficients use the true minus sign.

use crate::Balancer::solver::BalanceError;
use crate::Formulas::chem_types::{Equation, Term};
use crate::Formulas::parser::SyntaxError;
use crate::Utils::checked_math::{checked_add, checked_mul};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Plain-text form of a single term, e.g. `H3O⁺` or `e⁻`.
pub fn format_term(term: &Term) -> String {
    let mut out = String::new();
    term.render(&mut out);
    out
}

/// One-line text form of the balanced equation.
pub fn format_balanced(eqn: &Equation, coefs: &[i64]) -> Result<String, BalanceError> {
    if coefs.len() != eqn.term_count() {
        return Err(BalanceError::Internal(
            "mismatched number of coefficients".to_string(),
        ));
    }
    let left_len = eqn.get_left_side().len();
    let mut out = String::new();
    append_side(&mut out, eqn.get_left_side(), &coefs[..left_len]);
    out.push_str(" → ");
    append_side(&mut out, eqn.get_right_side(), &coefs[left_len..]);
    Ok(out)
}

fn append_side(out: &mut String, terms: &[Term], coefs: &[i64]) {
    let mut head = true;
    for (term, &coef) in terms.iter().zip(coefs) {
        if coef == 0 {
            continue;
        }
        if head {
            head = false;
        } else {
            out.push_str(" + ");
        }
        if coef != 1 {
            out.push_str(&coef.to_string().replacen('-', "−", 1));
            out.push(' ');
        }
        term.render(out);
    }
}

/// Two-line caret highlight of a syntax-error span within the formula.
/// Trailing whitespace is trimmed off the span and an empty span is widened
/// to one caret, possibly pointing one past the end of the input.
pub fn highlight_span(formula: &str, err: &SyntaxError) -> String {
    let bytes = formula.as_bytes();
    let start = err.start.min(formula.len());
    let mut end = err.end.max(start).min(formula.len());
    while end > start && (bytes[end - 1] == b' ' || bytes[end - 1] == b'\t') {
        end -= 1;
    }
    if start == end {
        end += 1;
    }
    let mut out = String::with_capacity(formula.len() + end + 2);
    out.push_str(formula);
    out.push('\n');
    out.push_str(&" ".repeat(start));
    out.push_str(&"^".repeat(end - start));
    out
}

/// Per-element conservation table: one row per element (charge row `e`
/// included), one column per term with its signed weighted contribution and
/// a final sum column, all zeros for a verified answer.
pub fn composition_table(eqn: &Equation, coefs: &[i64]) -> Result<Table, BalanceError> {
    if coefs.len() != eqn.term_count() {
        return Err(BalanceError::Internal(
            "mismatched number of coefficients".to_string(),
        ));
    }

    let mut table = Table::new();
    let mut header = vec![Cell::new("element")];
    for term in eqn.get_left_side().iter().chain(eqn.get_right_side()) {
        header.push(Cell::new(&format_term(term)));
    }
    header.push(Cell::new("sum"));
    table.add_row(Row::new(header));

    for name in eqn.get_elements().names() {
        let mut cells = vec![Cell::new(name)];
        let mut sum = 0;
        let mut j = 0;
        for term in eqn.get_left_side() {
            let value = checked_mul(term.count_element(name)?, coefs[j])?;
            sum = checked_add(sum, value)?;
            cells.push(Cell::new(&value.to_string()));
            j += 1;
        }
        for term in eqn.get_right_side() {
            let value = checked_mul(term.count_element(name)?, -coefs[j])?;
            sum = checked_add(sum, value)?;
            cells.push(Cell::new(&value.to_string()));
            j += 1;
        }
        cells.push(Cell::new(&sum.to_string()));
        table.add_row(Row::new(cells));
    }
    Ok(table)
}

/// Serializable result of one balance run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalancedEquation {
    pub input: String,
    pub rendered: String,
    pub coefficients: Vec<i64>,
    pub terms: Vec<String>,
}

impl BalancedEquation {
    pub fn from_parts(
        input: &str,
        eqn: &Equation,
        coefficients: Vec<i64>,
    ) -> Result<Self, BalanceError> {
        let rendered = format_balanced(eqn, &coefficients)?;
        let terms = eqn
            .get_left_side()
            .iter()
            .chain(eqn.get_right_side())
            .map(format_term)
            .collect();
        Ok(Self {
            input: input.to_string(),
            rendered,
            coefficients,
            terms,
        })
    }

    /// Writes the result as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<(), io::Error> {
        let mut file = File::create(path)?;
        file.write_all(serde_json::to_string_pretty(self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Balancer::solver::balance;
    use crate::Formulas::parser::parse;
    use tempfile::NamedTempFile;

    #[test]
    fn test_format_balanced() {
        let eqn = parse("H2 + O2 = H2O").unwrap();
        let coefs = balance(&eqn).unwrap();
        assert_eq!(format_balanced(&eqn, &coefs).unwrap(), "2 H2 + O2 → 2 H2O");
    }

    #[test]
    fn test_format_balanced_skips_zero_terms() {
        let eqn = parse("H2 + O2 = H2O").unwrap();
        assert_eq!(format_balanced(&eqn, &[2, 0, 2]).unwrap(), "2 H2 → 2 H2O");
    }

    #[test]
    fn test_format_balanced_with_charges() {
        let eqn = parse("Fe^3+ + e = Fe^2+").unwrap();
        let coefs = balance(&eqn).unwrap();
        assert_eq!(format_balanced(&eqn, &coefs).unwrap(), "Fe³⁺ + e⁻ → Fe²⁺");
    }

    #[test]
    fn test_format_balanced_length_mismatch() {
        let eqn = parse("H2 + O2 = H2O").unwrap();
        assert!(matches!(
            format_balanced(&eqn, &[1, 2]),
            Err(BalanceError::Internal(_))
        ));
    }

    #[test]
    fn test_highlight_span() {
        let err = SyntaxError::with_span("Empty group", 0, 2);
        assert_eq!(highlight_span("()2 = H", &err), "()2 = H\n^^");
    }

    #[test]
    fn test_highlight_span_point_error() {
        let err = SyntaxError::new("Invalid symbol", 3);
        assert_eq!(highlight_span("H2 ! O2", &err), "H2 ! O2\n   ^");
    }

    #[test]
    fn test_highlight_span_at_end_of_input() {
        let err = SyntaxError::new("Plus or equal sign expected", 7);
        assert_eq!(highlight_span("H2 + O2", &err), "H2 + O2\n       ^");
    }

    #[test]
    fn test_highlight_span_trims_trailing_whitespace() {
        let err = SyntaxError::with_span("Invalid term - empty", 3, 6);
        assert_eq!(highlight_span("H2 +  ", &err), "H2 +  \n   ^");
    }

    #[test]
    fn test_composition_table_shape() {
        let eqn = parse("H2 + O2 = H2O").unwrap();
        let coefs = balance(&eqn).unwrap();
        let table = composition_table(&eqn, &coefs).unwrap();
        // header + one row per element (e, H, O)
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_json_round_trip() {
        let eqn = parse("Fe + O2 = Fe2O3").unwrap();
        let coefs = balance(&eqn).unwrap();
        let result = BalancedEquation::from_parts("Fe + O2 = Fe2O3", &eqn, coefs).unwrap();

        let file = NamedTempFile::new().unwrap();
        result.save_json(file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let loaded: BalancedEquation = serde_json::from_str(&contents).unwrap();
        assert_eq!(loaded, result);
        assert_eq!(loaded.coefficients, vec![4, 3, 2]);
        assert_eq!(loaded.rendered, "4 Fe + 3 O2 → 2 Fe2O3");
    }
}
