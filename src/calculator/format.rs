const SIGNIFICANT_DIGITS: usize = 10;
const MAX_PLAIN_LEN: usize = 12;
const EXPONENT_DIGITS: usize = 5;

/// Formats a result for the display: integers as-is, everything else
/// rounded to 10 significant digits, switching to exponential notation when
/// the plain form gets too long.
pub fn format_result(value: f64) -> String {
    if value == 0.0 {
        return String::from("0");
    }

    if value.fract() == 0.0 {
        return number_string(value);
    }

    let rounded: f64 = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value)
        .parse()
        .unwrap_or(value);
    let plain = number_string(rounded);

    if plain.len() > MAX_PLAIN_LEN {
        to_exponential(value, EXPONENT_DIGITS)
    } else {
        plain
    }
}

/// Shortest form of `value`, exponential below `1e-6` and from `1e21` up.
fn number_string(value: f64) -> String {
    let magnitude = value.abs();

    if magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        signed_exponent(format!("{value:e}"))
    } else {
        format!("{value}")
    }
}

/// `1.23457e+7` style, with an explicit sign on the exponent.
fn to_exponential(value: f64, digits: usize) -> String {
    signed_exponent(format!("{:.*e}", digits, value))
}

fn signed_exponent(formatted: String) -> String {
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}
