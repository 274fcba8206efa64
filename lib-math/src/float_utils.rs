
/// Checks whether two floats are within `tol` of each other. NaN is never equal to anything.
/// 
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    libm::fabs(a - b) <= tol
}

/// Is the value a usable, finite and strictly positive number?
/// 
pub fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
