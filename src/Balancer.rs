/// Dense integer matrix with exact Gauss-Jordan elimination. Rows are kept
/// integral throughout: instead of dividing by pivots, rows are combined with
/// gcd-derived integer scalings and re-simplified, and every cell operation
/// is overflow-checked.
pub mod matrix;
/// Rendering and export of balancing results: the one-line text form, caret
/// highlighting of syntax-error spans, a per-element conservation table and
/// a JSON payload.
pub mod render;
/// The balancing pipeline: conservation matrix construction, solving,
/// smallest-integer coefficient extraction and independent re-verification.
///
/// # Examples
/// ```
/// use StoiChem::Formulas::parser::parse;
/// use StoiChem::Balancer::solver::balance;
/// let eqn = parse("H2 + O2 = H2O").unwrap();
/// assert_eq!(balance(&eqn).unwrap(), vec![2, 1, 2]);
/// ```
pub mod solver;
