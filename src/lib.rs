#[allow(non_snake_case)]
pub mod Balancer;
#[allow(non_snake_case)]
pub mod Formulas;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
