//! # Formula Data Model
//!
//! ## Aim
//! Structured representation of a parsed chemical equation: `Element` leaves,
//! parenthesized `Group`s with multipliers, additive `Term`s with charges and
//! the two-sided `Equation`. Every node answers element-counting and
//! element-set queries; those answers are what the balancer turns into a
//! linear system.
//!
//! ## Main Data Structures
//! - `FormulaNode`: closed enum over `Element` | `Group`, dispatched through
//!   the `ChemicalComposition` trait
//! - `Term`: one side-member of the equation, e.g. `H3O^+`; the special
//!   zero-item term with charge -1 is a free electron, rendered `e⁻`
//! - `Equation`: left and right term lists plus the deduplicated element set
//! - `ElementSet`: insertion-ordered set of element names, so repeated runs
//!   always see the same row order
//!
//! Charge is tracked under the synthetic element name `"e"`: for a term,
//! `count_element("e") == -charge`, and every term contributes the `"e"` row.
//! All values are built once by the parser and never mutated afterward.

use crate::Utils::checked_math::{ArithmeticError, checked_add, checked_mul};
use enum_dispatch::enum_dispatch;

/// Synthetic element name carrying the charge balance.
pub const ELECTRON_NAME: &str = "e";

const SUPERSCRIPT_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

/// Element-counting and rendering queries shared by the formula-tree node
/// kinds. The node family is closed, so dispatch goes through `FormulaNode`.
#[enum_dispatch]
pub trait ChemicalComposition {
    /// Adds every element name occurring in this node to the set.
    fn collect_elements(&self, set: &mut ElementSet);
    /// Total occurrence count of `name` in this node, weighted by enclosing
    /// group multipliers.
    fn count_element(&self, name: &str) -> Result<i64, ArithmeticError>;
    /// Appends the plain-text rendering of this node, e.g. `H2` or `(OH)3`.
    fn render(&self, out: &mut String);
}

/// A chemical element with a subscript count, e.g. `Na` or `F2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    count: i64,
}

impl Element {
    /// The parser validates `count >= 1` before construction.
    pub fn new(name: impl Into<String>, count: i64) -> Self {
        debug_assert!(count >= 1);
        Self {
            name: name.into(),
            count,
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_count(&self) -> i64 {
        self.count
    }
}

impl ChemicalComposition for Element {
    fn collect_elements(&self, set: &mut ElementSet) {
        set.add(&self.name);
    }

    fn count_element(&self, name: &str) -> Result<i64, ArithmeticError> {
        if name == self.name {
            Ok(self.count)
        } else {
            Ok(0)
        }
    }

    fn render(&self, out: &mut String) {
        out.push_str(&self.name);
        if self.count != 1 {
            out.push_str(&self.count.to_string());
        }
    }
}

/// A parenthesized sub-formula with a multiplier, e.g. `(OH)3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    items: Vec<FormulaNode>,
    count: i64,
}

impl Group {
    /// The parser validates `count >= 1` and a non-empty item list.
    pub fn new(items: Vec<FormulaNode>, count: i64) -> Self {
        debug_assert!(count >= 1);
        debug_assert!(!items.is_empty());
        Self { items, count }
    }

    pub fn get_items(&self) -> &[FormulaNode] {
        &self.items
    }

    pub fn get_count(&self) -> i64 {
        self.count
    }
}

impl ChemicalComposition for Group {
    fn collect_elements(&self, set: &mut ElementSet) {
        for item in &self.items {
            item.collect_elements(set);
        }
    }

    fn count_element(&self, name: &str) -> Result<i64, ArithmeticError> {
        let mut sum = 0;
        for item in &self.items {
            sum = checked_add(sum, checked_mul(item.count_element(name)?, self.count)?)?;
        }
        Ok(sum)
    }

    fn render(&self, out: &mut String) {
        out.push('(');
        for item in &self.items {
            item.render(out);
        }
        out.push(')');
        if self.count != 1 {
            out.push_str(&self.count.to_string());
        }
    }
}

/// Closed family of formula-tree nodes.
#[enum_dispatch(ChemicalComposition)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaNode {
    Element(Element),
    Group(Group),
}

/// One additive member of an equation side, e.g. `H3O^+` or `e⁻`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    items: Vec<FormulaNode>,
    charge: i64,
}

impl Term {
    /// An empty item list is only legal for the canonical electron term,
    /// which the parser builds with charge -1.
    pub fn new(items: Vec<FormulaNode>, charge: i64) -> Self {
        debug_assert!(!items.is_empty() || charge == -1);
        Self { items, charge }
    }

    pub fn get_items(&self) -> &[FormulaNode] {
        &self.items
    }

    pub fn get_charge(&self) -> i64 {
        self.charge
    }

    pub fn is_electron(&self) -> bool {
        self.items.is_empty() && self.charge == -1
    }

    /// Every term contributes the synthetic `"e"` name, so the charge row is
    /// always part of the linear system.
    pub fn collect_elements(&self, set: &mut ElementSet) {
        set.add(ELECTRON_NAME);
        for item in &self.items {
            item.collect_elements(set);
        }
    }

    pub fn count_element(&self, name: &str) -> Result<i64, ArithmeticError> {
        if name == ELECTRON_NAME {
            return Ok(-self.charge);
        }
        let mut sum = 0;
        for item in &self.items {
            sum = checked_add(sum, item.count_element(name)?)?;
        }
        Ok(sum)
    }

    /// Plain-text rendering: `H3O⁺`, `Fe³⁺`, `e⁻`.
    pub fn render(&self, out: &mut String) {
        if self.is_electron() {
            out.push_str("e⁻");
            return;
        }
        for item in &self.items {
            item.render(out);
        }
        if self.charge != 0 {
            let magnitude = self.charge.abs();
            if magnitude != 1 {
                for digit in magnitude.to_string().chars() {
                    out.push(SUPERSCRIPT_DIGITS[digit.to_digit(10).unwrap_or(0) as usize]);
                }
            }
            out.push(if self.charge > 0 { '⁺' } else { '⁻' });
        }
    }
}

/// A complete chemical equation, e.g. `H2 + O2 = H2O`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equation {
    left: Vec<Term>,
    right: Vec<Term>,
}

impl Equation {
    pub fn new(left: Vec<Term>, right: Vec<Term>) -> Self {
        Self { left, right }
    }

    pub fn get_left_side(&self) -> &[Term] {
        &self.left
    }

    pub fn get_right_side(&self) -> &[Term] {
        &self.right
    }

    pub fn term_count(&self) -> usize {
        self.left.len() + self.right.len()
    }

    /// The set of distinct element names appearing anywhere in the equation,
    /// in first-appearance order, `"e"` included.
    pub fn get_elements(&self) -> ElementSet {
        let mut set = ElementSet::new();
        for term in self.left.iter().chain(self.right.iter()) {
            term.collect_elements(&mut set);
        }
        set
    }
}

/// Deduplicated, insertion-ordered set of element names. Hash ordering would
/// shuffle matrix rows between runs; first-appearance order keeps the
/// balancer deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSet {
    names: Vec<String>,
}

impl ElementSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str) {
        if !self.contains(name) {
            self.names.push(name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
