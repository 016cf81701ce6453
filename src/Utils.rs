/// Checked integer arithmetic: add, multiply and parse with an explicit
/// magnitude bound, plus gcd/lcm. Every cell of the balancing matrix goes
/// through these helpers, so overflow is always a reported error and never
/// silent wraparound.
pub mod checked_math;
