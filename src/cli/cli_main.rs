use super::cli_examples::examples_menu;
use crate::Balancer::render::{
    BalancedEquation, composition_table, format_balanced, highlight_span,
};
use crate::Balancer::solver::{BalanceError, balance};
use crate::Formulas::parser::parse;
use std::io::{self, Write};
use std::path::Path;

pub fn run_interactive_menu() {
    loop {
        show_main_menu();
        let choice = get_user_input();

        match choice.trim() {
            "1" => balance_menu(),
            "2" => examples_menu(),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options (1, 2, 0)

Cyan (\x1b[36m) - "Enter your choice:" prompt

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu() {
    println!(
        "\x1b[34m\n Welcome to StoiChem: a chemical equation balancer \n
    formula parser + exact integer linear algebra \n \x1b[0m"
    );
    println!("\x1b[33m1. Balance an equation\x1b[0m");
    println!("\x1b[33m2. Examples\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    io::stdout().flush().unwrap();
}

fn get_user_input() -> String {
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .expect("Failed to read input");
    input
}

fn balance_menu() {
    println!("\x1b[36mEnter a chemical equation, e.g. H2 + O2 = H2O\x1b[0m");
    let input = get_user_input();
    let formula = input.trim_end();
    if formula.is_empty() {
        return;
    }

    let eqn = match parse(formula) {
        Ok(eqn) => eqn,
        Err(err) => {
            println!("Syntax error: {}", err);
            println!("{}", highlight_span(formula, &err));
            return;
        }
    };

    let coefs = match balance(&eqn) {
        Ok(coefs) => coefs,
        Err(BalanceError::Internal(msg)) => {
            println!("Internal error, please report this equation: {}", msg);
            return;
        }
        Err(err) => {
            println!("{}", err);
            return;
        }
    };

    match format_balanced(&eqn, &coefs) {
        Ok(rendered) => println!("\n{}\n", rendered),
        Err(err) => {
            println!("Internal error, please report this equation: {}", err);
            return;
        }
    }
    if let Ok(table) = composition_table(&eqn, &coefs) {
        table.printstd();
    }

    println!("\x1b[36mSave result to JSON? Enter a file name or leave empty to skip:\x1b[0m");
    let path = get_user_input();
    let path = path.trim();
    if !path.is_empty() {
        match BalancedEquation::from_parts(formula, &eqn, coefs) {
            Ok(result) => match result.save_json(Path::new(path)) {
                Ok(()) => println!("Balanced equation has been written to {}", path),
                Err(err) => println!("Failed to write {}: {}", path, err),
            },
            Err(err) => println!("Internal error, please report this equation: {}", err),
        }
    }
}
