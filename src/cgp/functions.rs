//! A library of common numeric primitives.
//!
//! Argument layout follows [`Function`]: slot 0 is the gene's constant,
//! slots `1..=arity` are the connected inputs.
//!
//! The bundles put [`constant`] first. Index 0 is the fallback used when
//! a primitive yields NaN, so with these bundles a faulty node degrades
//! into a constant.
//!
//! The names `const`, `add`, `sub`, `mul` and `div` are recognised by
//! the expression renderer and printed as literals or infix operators.

use super::types::Function;

/// Returns the gene's constant. Arity 0.
pub fn constant() -> Function {
    Function::new("const", 0, |x| x[0])
}

pub fn add() -> Function {
    Function::new("add", 2, |x| x[1] + x[2])
}

pub fn sub() -> Function {
    Function::new("sub", 2, |x| x[1] - x[2])
}

pub fn mul() -> Function {
    Function::new("mul", 2, |x| x[1] * x[2])
}

/// Division. Yields NaN on a zero divisor.
pub fn div() -> Function {
    Function::new("div", 2, |x| {
        if x[2] == 0.0 {
            f64::NAN
        } else {
            x[1] / x[2]
        }
    })
}

pub fn sin() -> Function {
    Function::new("sin", 1, |x| x[1].sin())
}

pub fn tan() -> Function {
    Function::new("tan", 1, |x| x[1].tan())
}

/// Natural logarithm. NaN for negative input.
pub fn log() -> Function {
    Function::new("log", 1, |x| x[1].ln())
}

pub fn exp() -> Function {
    Function::new("exp", 1, |x| x[1].exp())
}

/// `1` if the input is positive, `0` otherwise.
pub fn iff() -> Function {
    Function::new("iff", 1, |x| if x[1] > 0.0 { 1.0 } else { 0.0 })
}

/// `const`, `add`, `sub`, `mul`. Requires `max_arity >= 2`.
pub fn arithmetic() -> Vec<Function> {
    vec![constant(), add(), sub(), mul()]
}

/// Every primitive in this module. Requires `max_arity >= 2`.
pub fn standard() -> Vec<Function> {
    vec![
        constant(),
        add(),
        sub(),
        mul(),
        div(),
        sin(),
        tan(),
        log(),
        exp(),
        iff(),
    ]
}
