/*!
 * Temperature unit conversion shared by the device codecs.
 *
 * The factor used for Fahrenheit to Celsius is the devices' truncated `0.5556` rather than
 * `5/9`, so 212°F decodes to 100.008°C.
 */

/// Multiplier applied after subtracting the freezing point
pub const FAHRENHEIT_TO_CELSIUS_FACTOR: f64 = 0.5556;

/// Convert Fahrenheit to Celsius
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * FAHRENHEIT_TO_CELSIUS_FACTOR
}

/// Convert Celsius to whole degrees Fahrenheit, rounding halves up
pub fn celsius_to_fahrenheit_rounded(celsius: f64) -> i64 {
    (celsius * 1.8 + 32.0 + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fahrenheit_to_celsius() {
        assert!((fahrenheit_to_celsius(212.0) - 100.0).abs() < 0.01);
        assert!((fahrenheit_to_celsius(68.0) - 20.0).abs() < 0.01);
        assert_eq!(fahrenheit_to_celsius(32.0), 0.0);
    }

    #[test]
    fn test_celsius_to_fahrenheit_rounded() {
        assert_eq!(celsius_to_fahrenheit_rounded(20.0), 68);
        assert_eq!(celsius_to_fahrenheit_rounded(21.5), 71);
        // 22.5 * 1.8 + 32 = 72.5
        assert_eq!(celsius_to_fahrenheit_rounded(22.5), 73);
        assert_eq!(celsius_to_fahrenheit_rounded(-20.0), -4);
    }
}
