//! Number formatting helpers used by logging and the reports.
use thousands::Separable;

/// Formats a number with a comma separating the thousands groups.
///
/// # Arguments
///
/// * `number` is what will be formatted.
///
pub fn commafy<T: Separable>(number: T) -> String {
    number.separate_with_commas()
}

/// Formats an optional float rounded to some number of decimal digits.
///
/// If the option is `None` an empty string will be returned.
///
/// # Arguments
///
/// * `option` is the float that will be formatted.
/// * `precision` is the number of decimal digits.
///
pub fn fmt_float(option: &Option<f64>, precision: usize) -> String {
    match option {
        Some(float) => format!("{:.*}", precision, float),
        None => Default::default(),
    }
}

/// Rounds an optional float to some number of decimal digits.
///
/// # Arguments
///
/// * `option` is the float that will be rounded.
/// * `precision` is the number of decimal digits.
///
pub fn round_float(option: &Option<f64>, precision: usize) -> Option<f64> {
    let scale = 10f64.powi(precision as i32);
    option.map(|float| (float * scale).round() / scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas() {
        assert_eq!(commafy(999), "999");
        assert_eq!(commafy(1000), "1,000");
        assert_eq!(commafy(1234567usize), "1,234,567");
    }

    #[test]
    fn floats() {
        assert_eq!(fmt_float(&None, 2), "");
        assert_eq!(fmt_float(&Some(18.5), 2), "18.50");
        assert_eq!(fmt_float(&Some(18.495), 1), "18.5");
        assert_eq!(round_float(&None, 2), None);
        assert_eq!(round_float(&Some(18.4951), 2), Some(18.5));
        assert_eq!(round_float(&Some(-0.125), 2), Some(-0.13));
    }
}
