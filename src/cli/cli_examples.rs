use crate::Balancer::render::format_balanced;
use crate::Balancer::solver::balance;
use crate::Formulas::parser::parse;

/// Demo equations covering plain reactions, groups, ions and redox
/// half-equations with free electrons.
pub const DEMO_EQUATIONS: &[&str] = &[
    "H2 + O2 = H2O",
    "Fe + O2 = Fe2O3",
    "NH3 + O2 = N2 + H2O",
    "C2H2 + O2 = CO2 + H2O",
    "Ca(OH)2 + H3PO4 = Ca3(PO4)2 + H2O",
    "Na + H2O = NaOH + H2",
    "KMnO4 + HCl = KCl + MnCl2 + H2O + Cl2",
    "MnO4^- + H^+ + SO3^2- = Mn^2+ + H2O + SO4^2-",
    "Fe^3+ + e = Fe^2+",
];

pub fn examples_menu() {
    println!("\x1b[34m\nDemo equations\x1b[0m");
    for formula in DEMO_EQUATIONS {
        match run_demo(formula) {
            Ok(rendered) => println!("\x1b[33m{:<50}\x1b[0m {}", formula, rendered),
            Err(message) => println!("\x1b[33m{:<50}\x1b[0m {}", formula, message),
        }
    }
    println!();
}

fn run_demo(formula: &str) -> Result<String, String> {
    let eqn = parse(formula).map_err(|err| err.to_string())?;
    let coefs = balance(&eqn).map_err(|err| err.to_string())?;
    format_balanced(&eqn, &coefs).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_demos_balance() {
        for formula in DEMO_EQUATIONS {
            assert!(run_demo(formula).is_ok(), "demo failed: {}", formula);
        }
    }
}
