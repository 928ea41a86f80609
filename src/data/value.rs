use chrono::NaiveDate;
use std::fmt;

/// Date layout used by the item table, e.g. `June 13, 1980`.
pub const DATE_FORMAT: &str = "%B %d, %Y";

/// One cell of the item table. Cells the simulation never scales (titles,
/// genres) stay as text; scaling a text cell is a type error at that point,
/// not at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl FieldValue {
    /// Numbers win over dates so a bare year like `1984` stays numeric.
    pub fn parse(raw: &str) -> FieldValue {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return FieldValue::Number(n);
            }
        }
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
            return FieldValue::Date(d);
        }
        FieldValue::Text(trimmed.to_string())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Number(_) => "number",
            FieldValue::Date(_) => "date",
            FieldValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            FieldValue::Text(s) => write!(f, "{s}"),
        }
    }
}
