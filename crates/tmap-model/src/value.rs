use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Numeric no-data marker.
///
/// The value means "intentionally absent" and is excluded from group extrema,
/// but it is an ordinary double everywhere else (symbology classes may bin it,
/// label filters hide it).
pub const NO_DATA: f64 = -9999.0;

/// A single typed attribute value on a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum AttrValue {
    Double(f64),
    Text(String),
    Date(NaiveDate),
    /// The null/no-value indicator. Written on coercion failure instead of
    /// the unparseable source text.
    Null,
}

impl AttrValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Numeric view of the value. `Text` is parsed; `Date` and `Null` have
    /// no numeric reading.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Double(v) => Some(*v),
            AttrValue::Text(s) => s.trim().parse::<f64>().ok(),
            AttrValue::Date(_) | AttrValue::Null => None,
        }
    }

    /// String rendering used when a value participates in key comparison or
    /// is written back to a delimited attribute table. `Null` renders empty.
    pub fn render(&self) -> String {
        match self {
            AttrValue::Double(v) => format_double(*v),
            AttrValue::Text(s) => s.clone(),
            AttrValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            AttrValue::Null => String::new(),
        }
    }
}

/// Render a double without a spurious trailing `.0`, so numeric join keys
/// compare equal to their source-file spelling.
pub fn format_double(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_double_drops_integral_fraction() {
        assert_eq!(format_double(10.0), "10");
        assert_eq!(format_double(-9999.0), "-9999");
        assert_eq!(format_double(0.25), "0.25");
    }

    #[test]
    fn text_values_parse_as_numbers() {
        assert_eq!(AttrValue::Text(" 1.5 ".to_string()).as_f64(), Some(1.5));
        assert_eq!(AttrValue::Text("abc".to_string()).as_f64(), None);
        assert_eq!(AttrValue::Null.as_f64(), None);
    }

    #[test]
    fn null_renders_empty() {
        assert_eq!(AttrValue::Null.render(), "");
        assert_eq!(AttrValue::Double(42.0).render(), "42");
    }
}
