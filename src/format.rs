//! Number formatting compatible with the `printf` conversions `%g`
//! and `%.Nf`, so files written here read the same as those of other
//! stand-alone codes.

/// Number of significant digits of `%g`.
const PRECISION: i32 = 6;

fn non_finite(x: f64) -> Option<String> {
    if x.is_nan() {
        Some("nan".to_string())
    } else if x.is_infinite() {
        Some(if x > 0. { "inf" } else { "-inf" }.to_string())
    } else {
        None
    }
}

/// Remove the trailing zeros of the fractional part (and the decimal
/// point if nothing remains after it).
fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Format `x` like `printf("%g", x)`: 6 significant digits, trailing
/// zeros removed, scientific notation when the exponent is < -4 or ≥ 6.
pub fn general(x: f64) -> String {
    if let Some(s) = non_finite(x) { return s }
    if x == 0. {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string()
    }
    // The exponent must be taken *after* rounding to `PRECISION` digits
    // (e.g. 999999.5 becomes 1e+06).
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, x);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    if -4 <= exp && exp < PRECISION {
        let digits = (PRECISION - 1 - exp) as usize;
        strip_zeros(&format!("{:.*}", digits, x)).to_string()
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_zeros(mantissa), sign, exp.abs())
    }
}

/// Format `x` like `printf("%.*f", digits, x)`.  The decimal expansion
/// is exact, as with glibc.
pub fn fixed(x: f64, digits: usize) -> String {
    match non_finite(x) {
        Some(s) => s,
        None => format!("{:.*}", digits, x),
    }
}

#[cfg(test)]
mod tests {
    use super::{general, fixed};

    #[test]
    fn general_integers() {
        assert_eq!(general(0.), "0");
        assert_eq!(general(-10.), "-10");
        assert_eq!(general(5.), "5");
        assert_eq!(general(123456.), "123456");
        assert_eq!(general(1234567.), "1.23457e+06");
    }

    #[test]
    fn general_fractions() {
        assert_eq!(general(-9.8), "-9.8");
        assert_eq!(general(0.5), "0.5");
        assert_eq!(general(0.0001), "0.0001");
        assert_eq!(general(0.00001), "1e-05");
        assert_eq!(general(3.14159265), "3.14159");
        assert_eq!(general(-1.7763568394002505e-15), "-1.77636e-15");
    }

    #[test]
    fn general_rounding_changes_exponent() {
        assert_eq!(general(999999.5), "1e+06");
        assert_eq!(general(9.999999), "10");
    }

    #[test]
    fn grid_points_print_compactly() {
        let dx = 20. / 100.;
        assert_eq!(general(-10. + 1. * dx), "-9.8");
        assert_eq!(general(-10. + 49. * dx), "-0.2");
        assert_eq!(general(-10. + 50. * dx), "0");
        assert_eq!(general(-10. + 99. * dx), "9.8");
    }

    #[test]
    fn non_finite_like_c() {
        assert_eq!(general(f64::NAN), "nan");
        assert_eq!(general(f64::INFINITY), "inf");
        assert_eq!(fixed(f64::NEG_INFINITY, 25), "-inf");
        assert_eq!(fixed(f64::NAN, 25), "nan");
    }

    #[test]
    fn fixed_25() {
        assert_eq!(fixed(1., 25), "1.0000000000000000000000000");
        assert_eq!(fixed(0., 25), "0.0000000000000000000000000");
        assert_eq!(fixed(0.5, 3), "0.500");
    }
}
