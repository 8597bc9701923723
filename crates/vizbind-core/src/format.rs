// File: crates/vizbind-core/src/format.rs
// Summary: Value formatting for tooltips and axis ticks (SI prefixes, grouping, percent).

use serde::{Deserialize, Serialize};

use crate::record::FieldValue;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// Display form of the value as loaded.
    #[default]
    Plain,
    /// Year of a temporal value, or an integral number.
    Year,
    /// Fraction shown as percent with two decimals (0.0312 → 3.12%).
    Percent,
    /// Number already in percent units, two decimals (3.12 → 3.12%).
    PercentValue,
    /// Dollar amount with thousands separators.
    Dollars,
    /// Dollar amount with three significant digits and a long SI name.
    DollarsSi,
    /// Thousands separators.
    Grouped,
    /// Fraction as a whole percent (0.15 → 15%), for axis ticks.
    PercentWhole,
    /// Two significant digits with a short SI suffix (1.5T, 2.0B).
    SiShort,
    /// `SiShort` with a dollar sign.
    DollarsSiShort,
}

impl ValueFormat {
    pub fn apply(&self, value: &FieldValue) -> String {
        if value.is_missing() {
            return String::from("n/a");
        }
        match (self, value) {
            (ValueFormat::Year, FieldValue::Time(t)) => t.format("%Y").to_string(),
            (ValueFormat::Year, FieldValue::Number(v)) => format!("{}", v.round() as i64),
            (ValueFormat::Percent, FieldValue::Number(v)) => format!("{:.2}%", v * 100.0),
            (ValueFormat::PercentValue, FieldValue::Number(v)) => format!("{v:.2}%"),
            (ValueFormat::Dollars, FieldValue::Number(v)) => format!("${}", grouped(*v)),
            (ValueFormat::DollarsSi, FieldValue::Number(v)) => format!("${}", si_long(*v, 3)),
            (ValueFormat::Grouped, FieldValue::Number(v)) => grouped(*v),
            (ValueFormat::PercentWhole, FieldValue::Number(v)) => format!("{}%", (v * 100.0).round() as i64),
            (ValueFormat::SiShort, FieldValue::Number(v)) => si_short(*v, 2),
            (ValueFormat::DollarsSiShort, FieldValue::Number(v)) if *v < 0.0 => format!("-${}", si_short(-v, 2)),
            (ValueFormat::DollarsSiShort, FieldValue::Number(v)) => format!("${}", si_short(*v, 2)),
            (_, other) => other.to_string(),
        }
    }

    pub fn number(&self, v: f64) -> String {
        self.apply(&FieldValue::Number(v))
    }
}

const PREFIXES: [(i32, &str, &str); 9] = [
    (-12, "p", "p"),
    (-9, "n", "n"),
    (-6, "µ", "µ"),
    (-3, "m", "m"),
    (0, "", ""),
    (3, "k", " Thousand"),
    (6, "M", " Million"),
    (9, "G", " Billion"),
    (12, "T", " Trillion"),
];

/// `precision` significant digits scaled by an SI prefix; returns (digits, exponent).
fn si_parts(value: f64, precision: usize) -> (String, i32) {
    let precision = precision.max(1);
    if value == 0.0 || !value.is_finite() {
        return (format!("{:.*}", precision - 1, 0.0), 0);
    }
    let mut exp = value.abs().log10().floor() as i32;
    // rounding can carry into the next power (999.5 → 1000)
    let rounded = round_sig(value.abs(), precision);
    if rounded >= 10f64.powi(exp + 1) {
        exp += 1;
    }
    let prefix = (exp.div_euclid(3) * 3).clamp(-12, 12);
    let scaled = value / 10f64.powi(prefix);
    let decimals = (precision as i32 - 1 - (exp - prefix)).max(0) as usize;
    (format!("{scaled:.decimals$}"), prefix)
}

fn round_sig(v: f64, precision: usize) -> f64 {
    let exp = v.log10().floor() as i32;
    let factor = 10f64.powi(precision as i32 - 1 - exp);
    (v * factor).round() / factor
}

fn prefix_name(exp: i32, long: bool) -> &'static str {
    PREFIXES
        .iter()
        .find(|(e, _, _)| *e == exp)
        .map(|(_, short, name)| if long { *name } else { *short })
        .unwrap_or("")
}

/// SI notation with long names: 1.23e12 → "1.23 Trillion".
pub fn si_long(value: f64, precision: usize) -> String {
    let (digits, exp) = si_parts(value, precision);
    format!("{digits}{}", prefix_name(exp, true))
}

/// SI notation with short suffixes, billions as "B": 2.5e9 → "2.5B".
pub fn si_short(value: f64, precision: usize) -> String {
    let (digits, exp) = si_parts(value, precision);
    let suffix = match exp {
        9 => "B",
        e => prefix_name(e, false),
    };
    format!("{digits}{suffix}")
}

/// Thousands separators on the integer part; the fraction is kept as printed.
pub fn grouped(value: f64) -> String {
    let text = if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    };
    let (sign, rest) = match text.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", text.as_str()),
    };
    let (int, frac) = match rest.find('.') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    let mut out = String::with_capacity(text.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{sign}{out}{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn si_names() {
        assert_eq!(si_long(1.234e12, 3), "1.23 Trillion");
        assert_eq!(si_long(45_600.0, 3), "45.6 Thousand");
        assert_eq!(si_long(999.7, 3), "1.00 Thousand");
        assert_eq!(si_short(2.5e9, 2), "2.5B");
        assert_eq!(si_short(-1.5e12, 2), "-1.5T");
        assert_eq!(si_long(0.0, 3), "0.00");
    }

    #[test]
    fn grouping() {
        assert_eq!(grouped(1234567.0), "1,234,567");
        assert_eq!(grouped(-1234.5), "-1,234.5");
        assert_eq!(grouped(999.0), "999");
    }

    #[test]
    fn percent_and_year() {
        assert_eq!(ValueFormat::Percent.number(0.0312), "3.12%");
        assert_eq!(ValueFormat::Year.number(1999.0), "1999");
        assert_eq!(ValueFormat::Dollars.number(7.25), "$7.25");
        assert_eq!(ValueFormat::Plain.apply(&FieldValue::Missing), "n/a");
        assert_eq!(ValueFormat::PercentWhole.number(-0.15), "-15%");
        assert_eq!(ValueFormat::DollarsSiShort.number(2.0e9), "$2.0B");
    }
}
