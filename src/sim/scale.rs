//! Field-value to simulation-coordinate mapping.
//!
//! A scale maps a field's source range onto a target coordinate range
//! linearly, after an optional monotonic pre-transform (log, calendar
//! days). Both directions are exposed so downstream views can label axes
//! in data units.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::data::table::ItemTable;
use crate::data::value::FieldValue;
use crate::error::{Error, Result};

/// Monotonic pre-transform applied before the linear range mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transform {
    #[default]
    Identity,
    Log10,
    /// Calendar dates counted as whole days since the common era.
    DateDays,
}

impl Transform {
    pub fn to_linear(&self, v: &FieldValue) -> Result<f64> {
        match (self, v) {
            (Transform::Identity, FieldValue::Number(n)) => Ok(*n),
            (Transform::Log10, FieldValue::Number(n)) => {
                if *n > 0.0 {
                    Ok(n.log10())
                } else {
                    Err(Error::LogDomain { value: *n })
                }
            }
            (Transform::DateDays, FieldValue::Date(d)) => Ok(f64::from(d.num_days_from_ce())),
            (_, other) => Err(Error::Transform {
                expected: self.expected_type(),
                got: other.to_string(),
            }),
        }
    }

    pub fn from_linear(&self, x: f64) -> Result<FieldValue> {
        match self {
            Transform::Identity => Ok(FieldValue::Number(x)),
            Transform::Log10 => Ok(FieldValue::Number(10f64.powf(x))),
            Transform::DateDays => {
                let days = x.round() as i32;
                NaiveDate::from_num_days_from_ce_opt(days)
                    .map(FieldValue::Date)
                    .ok_or(Error::DateRange { coord: x })
            }
        }
    }

    fn expected_type(&self) -> &'static str {
        match self {
            Transform::Identity | Transform::Log10 => "number",
            Transform::DateDays => "date",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    source: (f64, f64),
    target: (f64, f64),
    transform: Transform,
}

impl Scale {
    /// `source` is in pre-transformed (linear) units and must have nonzero
    /// extent. `field` only labels the error.
    pub fn new(
        field: &str,
        source: (f64, f64),
        target: (f64, f64),
        transform: Transform,
    ) -> Result<Self> {
        if source.1 == source.0 {
            return Err(Error::DegenerateScale {
                field: field.to_string(),
            });
        }
        Ok(Self {
            source,
            target,
            transform,
        })
    }

    /// Builds a scale for one table field, taking the source range from the
    /// data extent unless `source_override` pins it (scores and ratings use
    /// their nominal 0–10 / 0–100 ranges regardless of the data).
    pub fn for_field(
        table: &ItemTable,
        field: &str,
        transform: Transform,
        source_override: Option<(f64, f64)>,
        target: (f64, f64),
    ) -> Result<Self> {
        let source = match source_override {
            Some(range) => range,
            None => field_extent(table, field, transform)?,
        };
        Self::new(field, source, target, transform)
    }

    /// Target ranges stay reassignable so one field scale can serve several
    /// coordinate windows.
    pub fn set_target_range(&mut self, target: (f64, f64)) {
        self.target = target;
    }

    pub fn forward(&self, v: &FieldValue) -> Result<f64> {
        Ok(self.forward_linear(self.transform.to_linear(v)?))
    }

    pub fn forward_linear(&self, x: f64) -> f64 {
        let (r0, r1) = self.source;
        let (d0, d1) = self.target;
        (x - r0) / (r1 - r0) * (d1 - d0) + d0
    }

    pub fn inverse(&self, coord: f64) -> Result<FieldValue> {
        let (r0, r1) = self.source;
        let (d0, d1) = self.target;
        let x = (coord - d0) / (d1 - d0) * (r1 - r0) + r0;
        self.transform.from_linear(x)
    }
}

/// Min/max of a field after the pre-transform.
pub fn field_extent(table: &ItemTable, field: &str, transform: Transform) -> Result<(f64, f64)> {
    let column = table.column(field)?;
    let mut extent: Option<(f64, f64)> = None;
    for (row, value) in column.iter().enumerate() {
        let x = transform.to_linear(value).map_err(|e| match e {
            Error::Transform { expected, got } => Error::FieldType {
                field: field.to_string(),
                row,
                expected,
                got,
            },
            other => other,
        })?;
        extent = Some(match extent {
            None => (x, x),
            Some((lo, hi)) => (lo.min(x), hi.max(x)),
        });
    }
    extent.ok_or_else(|| Error::DegenerateScale {
        field: field.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn forward_inverse_round_trip() {
        let scale = Scale::new("budget", (0.0, 200.0), (-1000.0, 1000.0), Transform::Identity)
            .unwrap();
        for v in [0.0, 37.5, 100.0, 199.0, 200.0] {
            let coord = scale.forward(&FieldValue::Number(v)).unwrap();
            match scale.inverse(coord).unwrap() {
                FieldValue::Number(back) => {
                    assert!((back - v).abs() < 1e-9, "v={v} back={back}")
                }
                other => panic!("expected number, got {other}"),
            }
        }
        assert_eq!(scale.forward(&FieldValue::Number(0.0)).unwrap(), -1000.0);
        assert_eq!(scale.forward(&FieldValue::Number(200.0)).unwrap(), 1000.0);
    }

    #[test]
    fn log_round_trip_over_decades() {
        let scale = Scale::new(
            "gross",
            (2.0, 9.0), // 1e2 .. 1e9 after log10
            (-1000.0, 1000.0),
            Transform::Log10,
        )
        .unwrap();
        for v in [1e2, 5e3, 1e5, 2.5e6, 1e8, 1e9] {
            let coord = scale.forward(&FieldValue::Number(v)).unwrap();
            match scale.inverse(coord).unwrap() {
                FieldValue::Number(back) => assert!(
                    (back / v - 1.0).abs() < 1e-9,
                    "v={v} back={back}"
                ),
                other => panic!("expected number, got {other}"),
            }
        }
        assert!(matches!(
            scale.forward(&FieldValue::Number(0.0)),
            Err(Error::LogDomain { .. })
        ));
    }

    #[test]
    fn date_round_trip() {
        let lo = NaiveDate::from_ymd_opt(1980, 1, 1).unwrap();
        let hi = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        let scale = Scale::new(
            "released",
            (
                f64::from(lo.num_days_from_ce()),
                f64::from(hi.num_days_from_ce()),
            ),
            (-1000.0, 1000.0),
            Transform::DateDays,
        )
        .unwrap();

        let d = NaiveDate::from_ymd_opt(1994, 7, 6).unwrap();
        let coord = scale.forward(&FieldValue::Date(d)).unwrap();
        assert_eq!(scale.inverse(coord).unwrap(), FieldValue::Date(d));
    }

    #[test]
    fn forward_is_monotonic() {
        let scale =
            Scale::new("score", (0.0, 10.0), (-1000.0, 1000.0), Transform::Identity).unwrap();
        let mut last = f64::NEG_INFINITY;
        for i in 0..=100 {
            let coord = scale.forward_linear(f64::from(i) * 0.1);
            assert!(coord > last, "not monotonic at i={i}");
            last = coord;
        }
    }

    #[test]
    fn degenerate_extent_fails_fast() {
        assert!(matches!(
            Scale::new("score", (5.0, 5.0), (-1000.0, 1000.0), Transform::Identity),
            Err(Error::DegenerateScale { .. })
        ));

        let table = ItemTable::from_columns(vec![(
            "score",
            vec![FieldValue::Number(5.0), FieldValue::Number(5.0)],
        )]);
        assert!(matches!(
            Scale::for_field(&table, "score", Transform::Identity, None, (0.0, 1.0)),
            Err(Error::DegenerateScale { .. })
        ));
    }

    #[test]
    fn target_range_is_reassignable() {
        let mut scale =
            Scale::new("score", (0.0, 10.0), (0.0, 1.0), Transform::Identity).unwrap();
        assert_eq!(scale.forward_linear(10.0), 1.0);
        scale.set_target_range((-500.0, 500.0));
        assert_eq!(scale.forward_linear(10.0), 500.0);
        assert_eq!(scale.forward_linear(5.0), 0.0);
    }
}
