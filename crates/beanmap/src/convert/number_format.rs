// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

/// Textual number representation used between numbers and strings.
///
/// The default is plain Rust formatting: no grouping, shortest float
/// representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumberFormat {
    /// Fixed number of fraction digits for floats.
    pub decimal_places: Option<usize>,
    /// Separator inserted every three integer digits.
    pub grouping: Option<char>,
}

impl NumberFormat {
    /// Plain formatting.
    pub const PLAIN: Self = Self {
        decimal_places: None,
        grouping: None,
    };

    pub fn with_decimal_places(mut self, places: usize) -> Self {
        self.decimal_places = Some(places);
        self
    }

    pub fn with_grouping(mut self, separator: char) -> Self {
        self.grouping = Some(separator);
        self
    }

    /// Format a signed integer.
    pub fn format_int(&self, value: i128) -> String {
        let digits = value.unsigned_abs().to_string();
        let sign = if value < 0 { "-" } else { "" };
        format!("{sign}{}", self.group(&digits))
    }

    /// Format an unsigned integer.
    pub fn format_uint(&self, value: u128) -> String {
        self.group(&value.to_string())
    }

    /// Format a float.
    pub fn format_float(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let text = match self.decimal_places {
            Some(places) => format!("{value:.places$}"),
            None => value.to_string(),
        };
        let (sign, unsigned) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text.as_str()),
        };
        match unsigned.split_once('.') {
            Some((int, frac)) => format!("{sign}{}.{frac}", self.group(int)),
            None => format!("{sign}{}", self.group(unsigned)),
        }
    }

    /// Strip grouping separators and surrounding whitespace.
    pub fn normalize(&self, text: &str) -> String {
        let text = text.trim();
        match self.grouping {
            Some(separator) => text.chars().filter(|&c| c != separator).collect(),
            None => text.to_string(),
        }
    }

    fn group(&self, digits: &str) -> String {
        let Some(separator) = self.grouping else {
            return digits.to_string();
        };
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(separator);
            }
            out.push(c);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_format() {
        let plain = NumberFormat::PLAIN;
        assert_eq!(plain.format_int(-1234567), "-1234567");
        assert_eq!(plain.format_float(2.5), "2.5");
        assert_eq!(plain.normalize(" 42 "), "42");
    }

    #[test]
    fn test_grouping_and_places() {
        let format = NumberFormat::default()
            .with_grouping(',')
            .with_decimal_places(2);
        assert_eq!(format.format_int(-1234567), "-1,234,567");
        assert_eq!(format.format_uint(999), "999");
        assert_eq!(format.format_uint(1000), "1,000");
        assert_eq!(format.format_float(1234.5), "1,234.50");
        assert_eq!(format.format_float(-0.128), "-0.13");
        assert_eq!(format.normalize("1,234.50"), "1234.50");
    }
}
