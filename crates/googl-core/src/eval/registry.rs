//! Safelisted functions and constants
//!
//! Both tables are static and read-only. A name that is not listed here can
//! never be called or resolved by the evaluator.

use std::fmt;

/// Named constants, resolved after variables and functions
const CONSTANTS: &[(&str, f64)] = &[
    ("pi", std::f64::consts::PI),
    ("e", std::f64::consts::E),
    ("tau", std::f64::consts::TAU),
    ("inf", f64::INFINITY),
    ("nan", f64::NAN),
];

/// Accepted argument counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::Range(min, max) => (min..=max).contains(&count),
            Arity::AtLeast(min) => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Range(min, max) => write!(f, "{} to {}", min, max),
            Arity::AtLeast(min) => write!(f, "at least {}", min),
        }
    }
}

#[derive(Clone, Copy)]
enum Imp {
    Unary(fn(f64) -> f64),
    Binary(fn(f64, f64) -> f64),
    Checked(fn(&[f64]) -> Result<f64, &'static str>),
}

/// Failure raised by a registered function
#[derive(Debug, Clone, PartialEq)]
pub enum CallError {
    Arity { expected: Arity, got: usize },
    Domain(&'static str),
}

/// A safelisted numeric function
#[derive(Clone, Copy)]
pub struct Function {
    name: &'static str,
    arity: Arity,
    imp: Imp,
}

impl Function {
    const fn unary(name: &'static str, f: fn(f64) -> f64) -> Self {
        Self {
            name,
            arity: Arity::Exact(1),
            imp: Imp::Unary(f),
        }
    }

    const fn binary(name: &'static str, f: fn(f64, f64) -> f64) -> Self {
        Self {
            name,
            arity: Arity::Exact(2),
            imp: Imp::Binary(f),
        }
    }

    const fn checked(
        name: &'static str,
        arity: Arity,
        f: fn(&[f64]) -> Result<f64, &'static str>,
    ) -> Self {
        Self {
            name,
            arity,
            imp: Imp::Checked(f),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Apply the function to already-evaluated arguments.
    ///
    /// A NaN result from non-NaN arguments is a domain error and an
    /// infinite result from finite arguments is a range error, so callers
    /// never see a silently poisoned value.
    pub fn call(&self, args: &[f64]) -> Result<f64, CallError> {
        if !self.arity.accepts(args.len()) {
            return Err(CallError::Arity {
                expected: self.arity,
                got: args.len(),
            });
        }

        let result = match self.imp {
            Imp::Unary(f) => f(args[0]),
            Imp::Binary(f) => f(args[0], args[1]),
            Imp::Checked(f) => f(args).map_err(CallError::Domain)?,
        };

        if result.is_nan() && !args.iter().any(|a| a.is_nan()) {
            return Err(CallError::Domain("math domain error"));
        }
        if result.is_infinite() && args.iter().all(|a| a.is_finite()) {
            return Err(CallError::Domain("math range error"));
        }
        Ok(result)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

static FUNCTIONS: &[Function] = &[
    // Powers and logarithms
    Function::unary("sqrt", f64::sqrt),
    Function::unary("cbrt", f64::cbrt),
    Function::unary("exp", f64::exp),
    Function::unary("exp2", f64::exp2),
    Function::unary("expm1", f64::exp_m1),
    Function::checked("log", Arity::Range(1, 2), log),
    Function::unary("log10", f64::log10),
    Function::unary("log2", f64::log2),
    Function::unary("log1p", f64::ln_1p),
    Function::binary("pow", f64::powf),
    // Trigonometry
    Function::unary("sin", f64::sin),
    Function::unary("cos", f64::cos),
    Function::unary("tan", f64::tan),
    Function::unary("asin", f64::asin),
    Function::unary("acos", f64::acos),
    Function::unary("atan", f64::atan),
    Function::binary("atan2", f64::atan2),
    Function::unary("sinh", f64::sinh),
    Function::unary("cosh", f64::cosh),
    Function::unary("tanh", f64::tanh),
    Function::unary("asinh", f64::asinh),
    Function::unary("acosh", f64::acosh),
    Function::unary("atanh", f64::atanh),
    Function::unary("degrees", f64::to_degrees),
    Function::unary("radians", f64::to_radians),
    Function::checked("hypot", Arity::AtLeast(0), hypot),
    // Rounding and sign
    Function::unary("fabs", f64::abs),
    Function::unary("floor", f64::floor),
    Function::unary("ceil", f64::ceil),
    Function::unary("trunc", f64::trunc),
    Function::binary("copysign", f64::copysign),
    Function::binary("fmod", fmod),
    Function::binary("remainder", remainder),
    Function::checked("ldexp", Arity::Exact(2), ldexp),
    // Integer arithmetic
    Function::checked("factorial", Arity::Exact(1), factorial),
    Function::checked("isqrt", Arity::Exact(1), isqrt),
    Function::checked("gcd", Arity::AtLeast(0), gcd),
    Function::checked("lcm", Arity::AtLeast(0), lcm),
    Function::checked("comb", Arity::Exact(2), comb),
    Function::checked("perm", Arity::Range(1, 2), perm),
    // Special functions
    Function::unary("erf", libm::erf),
    Function::unary("erfc", libm::erfc),
    Function::checked("gamma", Arity::Exact(1), gamma),
    Function::checked("lgamma", Arity::Exact(1), lgamma),
    // Floating-point representation
    Function::binary("nextafter", libm::nextafter),
    Function::unary("ulp", ulp),
    Function::checked("fma", Arity::Exact(3), fma),
    // Classification, 1 for true and 0 for false
    Function::unary("isfinite", isfinite),
    Function::unary("isinf", isinf),
    Function::unary("isnan", isnan),
    Function::binary("isclose", isclose),
];

/// Look up a safelisted function by name
pub fn function(name: &str) -> Option<&'static Function> {
    FUNCTIONS.iter().find(|f| f.name == name)
}

/// Look up a named constant
pub fn constant(name: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(constant, _)| *constant == name)
        .map(|(_, value)| *value)
}

/// Names of every safelisted function, in registry order
pub fn function_names() -> impl Iterator<Item = &'static str> {
    FUNCTIONS.iter().map(|f| f.name)
}

fn log(args: &[f64]) -> Result<f64, &'static str> {
    let x = args[0];
    if x <= 0.0 {
        return Err("math domain error");
    }
    match args.get(1) {
        None => Ok(x.ln()),
        Some(&base) if base <= 0.0 || base == 1.0 => Err("math domain error"),
        Some(&base) => Ok(x.ln() / base.ln()),
    }
}

fn hypot(args: &[f64]) -> Result<f64, &'static str> {
    Ok(args.iter().fold(0.0, |acc: f64, x| acc.hypot(*x)))
}

fn fmod(x: f64, y: f64) -> f64 {
    x % y
}

fn remainder(x: f64, y: f64) -> f64 {
    x - (x / y).round_ties_even() * y
}

fn ldexp(args: &[f64]) -> Result<f64, &'static str> {
    let exp = integer(args[1])?;
    Ok(args[0] * 2f64.powf(exp as f64))
}

/// Poles of the gamma function
fn gamma_pole(x: f64) -> Result<f64, &'static str> {
    if x <= 0.0 && x.fract() == 0.0 {
        return Err("math domain error");
    }
    Ok(x)
}

fn gamma(args: &[f64]) -> Result<f64, &'static str> {
    gamma_pole(args[0]).map(libm::tgamma)
}

fn lgamma(args: &[f64]) -> Result<f64, &'static str> {
    gamma_pole(args[0]).map(libm::lgamma)
}

/// Gap between `x` and the next larger representable magnitude
fn ulp(x: f64) -> f64 {
    if !x.is_finite() {
        return x.abs();
    }
    let x = x.abs();
    let up = libm::nextafter(x, f64::INFINITY);
    if up.is_infinite() {
        x - libm::nextafter(x, f64::NEG_INFINITY)
    } else {
        up - x
    }
}

fn fma(args: &[f64]) -> Result<f64, &'static str> {
    Ok(libm::fma(args[0], args[1], args[2]))
}

/// Default tolerances: relative 1e-9, absolute 0
fn isclose(a: f64, b: f64) -> f64 {
    const REL_TOL: f64 = 1e-9;
    if a == b {
        return 1.0;
    }
    if a.is_infinite() || b.is_infinite() {
        return 0.0;
    }
    let diff = (b - a).abs();
    flag(diff <= (REL_TOL * b).abs() || diff <= (REL_TOL * a).abs())
}

fn isfinite(x: f64) -> f64 {
    flag(x.is_finite())
}

fn isinf(x: f64) -> f64 {
    flag(x.is_infinite())
}

fn isnan(x: f64) -> f64 {
    flag(x.is_nan())
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Largest magnitude that converts to i64 without loss
const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

fn integer(x: f64) -> Result<i64, &'static str> {
    if !x.is_finite() || x.fract() != 0.0 || x.abs() > MAX_EXACT {
        return Err("integer argument expected");
    }
    Ok(x as i64)
}

fn non_negative(x: f64) -> Result<u64, &'static str> {
    let n = integer(x)?;
    u64::try_from(n).map_err(|_| "argument must be non-negative")
}

fn factorial(args: &[f64]) -> Result<f64, &'static str> {
    let n = non_negative(args[0])?;
    // Anything past 170! overflows f64; the range check in `call` reports it
    Ok((2..=n.min(171)).fold(1.0, |acc, k| acc * k as f64))
}

fn isqrt(args: &[f64]) -> Result<f64, &'static str> {
    let n = non_negative(args[0])?;
    let mut root = (n as f64).sqrt() as u64;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    Ok(root as f64)
}

fn gcd_pair(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn gcd(args: &[f64]) -> Result<f64, &'static str> {
    let mut acc = 0u64;
    for &x in args {
        acc = gcd_pair(acc, integer(x)?.unsigned_abs());
    }
    Ok(acc as f64)
}

fn lcm(args: &[f64]) -> Result<f64, &'static str> {
    let mut acc = 1.0f64;
    for &x in args {
        let n = integer(x)?.unsigned_abs();
        if n == 0 {
            return Ok(0.0);
        }
        let g = gcd_pair(acc as u64, n);
        acc = acc / g as f64 * n as f64;
        if acc > MAX_EXACT {
            return Err("integer result too large");
        }
    }
    Ok(acc)
}

fn comb(args: &[f64]) -> Result<f64, &'static str> {
    let n = non_negative(args[0])?;
    let k = non_negative(args[1])?;
    if k > n {
        return Ok(0.0);
    }
    let k = k.min(n - k);
    let mut result = 1.0f64;
    for i in 1..=k {
        result = result * (n - k + i) as f64 / i as f64;
        if result.is_infinite() {
            break;
        }
    }
    Ok(result.round())
}

fn perm(args: &[f64]) -> Result<f64, &'static str> {
    let n = non_negative(args[0])?;
    let k = match args.get(1) {
        Some(&k) => non_negative(k)?,
        None => n,
    };
    if k > n {
        return Ok(0.0);
    }
    let mut result = 1.0f64;
    for i in (n - k + 1..=n).rev() {
        result *= i as f64;
        if result.is_infinite() {
            break;
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[f64]) -> Result<f64, CallError> {
        function(name).unwrap().call(args)
    }

    #[test]
    fn test_constants() {
        assert_eq!(constant("pi"), Some(std::f64::consts::PI));
        assert_eq!(constant("e"), Some(std::f64::consts::E));
        assert!(constant("phi").is_none());
    }

    #[test]
    fn test_unknown_function() {
        assert!(function("__import__").is_none());
        assert!(function("eval").is_none());
        assert!(function("system").is_none());
    }

    #[test]
    fn test_arity_checked() {
        assert_eq!(
            call("sqrt", &[]),
            Err(CallError::Arity {
                expected: Arity::Exact(1),
                got: 0
            })
        );
        assert!(call("log", &[1.0, 2.0, 3.0]).is_err());
        assert_eq!(call("hypot", &[]), Ok(0.0));
    }

    #[test]
    fn test_domain_errors() {
        assert_eq!(
            call("sqrt", &[-1.0]),
            Err(CallError::Domain("math domain error"))
        );
        assert!(call("log", &[0.0]).is_err());
        assert!(call("log", &[8.0, 1.0]).is_err());
        assert!(call("acos", &[2.0]).is_err());
        assert_eq!(
            call("exp", &[1000.0]),
            Err(CallError::Domain("math range error"))
        );
        assert!(call("factorial", &[2.5]).is_err());
        assert!(call("factorial", &[-1.0]).is_err());
    }

    #[test]
    fn test_non_finite_inputs_pass_through() {
        assert_eq!(call("exp", &[f64::INFINITY]), Ok(f64::INFINITY));
        assert!(call("sqrt", &[f64::NAN]).unwrap().is_nan());
    }

    #[test]
    fn test_integer_functions() {
        assert_eq!(call("factorial", &[5.0]), Ok(120.0));
        assert_eq!(call("factorial", &[0.0]), Ok(1.0));
        assert_eq!(call("isqrt", &[17.0]), Ok(4.0));
        assert_eq!(call("gcd", &[12.0, 18.0, -8.0]), Ok(2.0));
        assert_eq!(call("lcm", &[4.0, 6.0]), Ok(12.0));
        assert_eq!(call("comb", &[5.0, 2.0]), Ok(10.0));
        assert_eq!(call("perm", &[5.0, 2.0]), Ok(20.0));
        assert_eq!(call("perm", &[4.0]), Ok(24.0));
        assert_eq!(call("factorial", &[171.0]), Err(CallError::Domain("math range error")));
    }

    #[test]
    fn test_real_functions() {
        assert!((call("log", &[8.0, 2.0]).unwrap() - 3.0).abs() < 1e-12);
        assert!((call("degrees", &[std::f64::consts::PI]).unwrap() - 180.0).abs() < 1e-12);
        assert_eq!(call("fmod", &[7.0, -3.0]), Ok(1.0));
        assert_eq!(call("remainder", &[7.0, 2.0]), Ok(-1.0));
        assert_eq!(call("ldexp", &[1.5, 3.0]), Ok(12.0));
        assert_eq!(call("isnan", &[f64::NAN]), Ok(1.0));
        assert_eq!(call("hypot", &[3.0, 4.0]), Ok(5.0));
    }

    fn approx(result: Result<f64, CallError>, expected: f64) -> bool {
        result.is_ok_and(|v| (v - expected).abs() < 1e-12 * expected.abs().max(1.0))
    }

    #[test]
    fn test_special_functions() {
        assert_eq!(call("erf", &[0.0]), Ok(0.0));
        assert!(approx(call("erf", &[1.0]), 0.842_700_792_949_714_9));
        assert_eq!(call("erfc", &[0.0]), Ok(1.0));
        assert!(approx(call("gamma", &[5.0]), 24.0));
        assert!(approx(call("gamma", &[0.5]), std::f64::consts::PI.sqrt()));
        assert!(approx(call("lgamma", &[0.5]), 0.572_364_942_924_700_4));
        assert_eq!(call("gamma", &[0.0]), Err(CallError::Domain("math domain error")));
        assert_eq!(call("gamma", &[-2.0]), Err(CallError::Domain("math domain error")));
        assert_eq!(call("lgamma", &[-1.0]), Err(CallError::Domain("math domain error")));
        assert_eq!(call("gamma", &[200.0]), Err(CallError::Domain("math range error")));
    }

    #[test]
    fn test_representation_functions() {
        assert_eq!(call("nextafter", &[1.0, 2.0]), Ok(1.0 + f64::EPSILON));
        assert_eq!(call("ulp", &[1.0]), Ok(f64::EPSILON));
        assert_eq!(call("ulp", &[-2.0]), Ok(2.0 * f64::EPSILON));
        assert_eq!(call("ulp", &[0.0]), Ok(f64::from_bits(1)));
        assert!(call("ulp", &[f64::MAX]).is_ok_and(|v| v.is_finite()));
        assert_eq!(call("fma", &[2.0, 3.0, 4.0]), Ok(10.0));
        assert!(matches!(
            call("fma", &[2.0, 3.0]),
            Err(CallError::Arity { got: 2, .. })
        ));
    }

    #[test]
    fn test_isclose() {
        assert_eq!(call("isclose", &[1.0, 1.0 + 1e-10]), Ok(1.0));
        assert_eq!(call("isclose", &[1.0, 1.1]), Ok(0.0));
        assert_eq!(call("isclose", &[f64::INFINITY, f64::INFINITY]), Ok(1.0));
        assert_eq!(call("isclose", &[f64::INFINITY, 1e308]), Ok(0.0));
        assert_eq!(call("isclose", &[f64::NAN, f64::NAN]), Ok(0.0));
        assert_eq!(call("isclose", &[0.0, 1e-300]), Ok(0.0));
    }

    #[test]
    fn test_registry_names_unique() {
        let mut names: Vec<_> = function_names().collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
