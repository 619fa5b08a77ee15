//! Numeric display helpers for p-values and scores.
//!
//! Output follows the JavaScript `toExponential` / `toPrecision` conventions
//! (`1.2e-5`, `3.4e+2`) so values read the same as in the portal.

/// Exponential notation for `1e-6 <= number < threshold`, `"< 10^-10"` for
/// zero, `precision` significant digits otherwise.
pub fn to_conditional_precision(number: f64, precision: usize, threshold: f64) -> String {
    if (0.000001..threshold).contains(&number) {
        to_exponential(number, precision)
    } else if number == 0.0 {
        "< 10^-10".to_string()
    } else {
        to_precision(number, precision)
    }
}

pub fn clamp(x: f64, lower_inclusive: f64, upper_inclusive: f64) -> f64 {
    upper_inclusive.min(lower_inclusive.max(x))
}

/// Enough fraction digits to expand any finite `f64` exactly.
const EXACT_DIGITS: usize = 800;

/// `fraction_digits` digits after the decimal point of the mantissa.
pub fn to_exponential(number: f64, fraction_digits: usize) -> String {
    if !number.is_finite() {
        return non_finite(number);
    }
    let (digits, exponent) = round_half_up(number, fraction_digits + 1);
    let mut out = sign(number).to_string();
    out.push_str(&digits[..1]);
    if fraction_digits > 0 {
        out.push('.');
        out.push_str(&digits[1..]);
    }
    out.push_str(&format_exponent(exponent));
    out
}

/// `precision` significant digits, switching to exponential notation for
/// exponents below -6 or at least `precision`. A precision of 0 is treated
/// as 1.
pub fn to_precision(number: f64, precision: usize) -> String {
    if !number.is_finite() {
        return non_finite(number);
    }
    let precision = precision.max(1);
    let (digits, exponent) = round_half_up(number, precision);

    if exponent < -6 || exponent >= precision as i64 {
        return to_exponential(number, precision - 1);
    }
    let mut out = sign(number).to_string();
    if exponent >= 0 {
        let split = exponent as usize + 1;
        out.push_str(&digits[..split]);
        if split < digits.len() {
            out.push('.');
            out.push_str(&digits[split..]);
        }
    } else {
        out.push_str("0.");
        out.push_str(&"0".repeat((-exponent - 1) as usize));
        out.push_str(&digits);
    }
    out
}

/// First `significant` decimal digits of `|number|` and the decimal exponent
/// of the first one. Exact ties round away from zero.
fn round_half_up(number: f64, significant: usize) -> (String, i64) {
    let exact = significant.max(EXACT_DIGITS);
    let expanded = format!("{:.exact$e}", number.abs());
    let (mantissa, exponent) = expanded.split_once('e').unwrap_or((expanded.as_str(), "0"));
    let mut exponent: i64 = exponent.parse().unwrap_or(0);
    let all: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();

    let mut digits = all[..significant].to_vec();
    if all.get(significant).is_some_and(|digit| *digit >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
            digits.truncate(significant);
            exponent += 1;
        }
    }
    (String::from_utf8_lossy(&digits).into_owned(), exponent)
}

fn sign(number: f64) -> &'static str {
    if number < 0.0 { "-" } else { "" }
}

fn format_exponent(exponent: i64) -> String {
    if exponent < 0 {
        format!("e{exponent}")
    } else {
        format!("e+{exponent}")
    }
}

fn non_finite(number: f64) -> String {
    if number.is_nan() {
        "NaN".to_string()
    } else if number > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}
