//! CF-convention helpers layered on the classic format: fill-value masking,
//! packed-value scaling, and `units`-string time decoding.

use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::Error;
use crate::types::Variable;

/// Apply fill-value masking and scale/offset to freshly read values, in
/// place. Matches what an auto-masking dataset handle does:
///
/// - cells equal to `_FillValue` or `missing_value` (or the type's default
///   fill when neither attribute is present) become NaN;
/// - `scale_factor` and `add_offset` are applied to the surviving cells.
pub fn mask_and_scale(values: &mut [f64], var: &Variable) {
    let fills: Vec<f64> = ["_FillValue", "missing_value"]
        .iter()
        .filter_map(|name| var.attr_f64(name))
        .collect();
    let fills = if fills.is_empty() {
        vec![var.nc_type.default_fill()]
    } else {
        fills
    };

    let scale = var.attr_f64("scale_factor").unwrap_or(1.0);
    let offset = var.attr_f64("add_offset").unwrap_or(0.0);

    for v in values.iter_mut() {
        if fills.iter().any(|&f| *v == f) {
            *v = f64::NAN;
        } else {
            *v = *v * scale + offset;
        }
    }
}

/// Parsed CF time units: `"<unit> since <epoch>"`.
///
/// Supports the standard (proleptic Gregorian) calendar with second, minute,
/// hour and day units, which covers what ceilometer product files declare.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CfTimeUnits {
    /// Length of one raw time unit, in microseconds.
    pub unit_micros: i64,
    pub epoch: DateTime<Utc>,
}

impl CfTimeUnits {
    /// Convert raw time coordinates to absolute UTC instants.
    pub fn to_datetimes(&self, values: &[f64]) -> Vec<DateTime<Utc>> {
        values
            .iter()
            .map(|&v| self.epoch + Duration::microseconds((v * self.unit_micros as f64) as i64))
            .collect()
    }
}

impl FromStr for CfTimeUnits {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, " since ");
        let unit = parts.next().unwrap_or("").trim();
        let epoch_str = parts
            .next()
            .ok_or_else(|| Error::InvalidTimeUnits(s.to_string()))?
            .trim();

        let unit_micros = match unit.to_ascii_lowercase().as_str() {
            "microseconds" | "microsecond" => 1,
            "milliseconds" | "millisecond" | "msec" | "msecs" => 1_000,
            "seconds" | "second" | "secs" | "sec" | "s" => 1_000_000,
            "minutes" | "minute" | "mins" | "min" => 60_000_000,
            "hours" | "hour" | "hrs" | "hr" | "h" => 3_600_000_000,
            "days" | "day" | "d" => 86_400_000_000,
            _ => return Err(Error::InvalidTimeUnits(s.to_string())),
        };

        let epoch = parse_epoch(epoch_str).ok_or_else(|| Error::InvalidTimeUnits(s.to_string()))?;
        Ok(CfTimeUnits { unit_micros, epoch })
    }
}

fn parse_epoch(s: &str) -> Option<DateTime<Utc>> {
    // RFC 3339 first (covers explicit offsets), then the space- and
    // T-separated naive forms CF files commonly carry, then date-only.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let s = s.trim_end_matches(" UTC").trim_end_matches('Z');
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }
    if let Ok(nd) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&nd.and_hms_opt(0, 0, 0)?));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttrValue, Attribute, NcType};
    use chrono::Timelike;

    fn var_with_attrs(attrs: Vec<(&str, AttrValue)>) -> Variable {
        Variable {
            name: "x".to_string(),
            dim_ids: vec![],
            attributes: attrs
                .into_iter()
                .map(|(name, value)| Attribute {
                    name: name.to_string(),
                    value,
                })
                .collect(),
            nc_type: NcType::Float,
            vsize: 0,
            begin: 0,
        }
    }

    #[test]
    fn masks_explicit_fill_value() {
        let var = var_with_attrs(vec![("_FillValue", AttrValue::Floats(vec![-999.0]))]);
        let mut values = vec![1.0, -999.0, 2.0];
        mask_and_scale(&mut values, &var);
        assert_eq!(values[0], 1.0);
        assert!(values[1].is_nan());
        assert_eq!(values[2], 2.0);
    }

    #[test]
    fn masks_default_fill_when_unattributed() {
        let var = var_with_attrs(vec![]);
        let mut values = vec![5.0, NcType::Float.default_fill()];
        mask_and_scale(&mut values, &var);
        assert_eq!(values[0], 5.0);
        assert!(values[1].is_nan());
    }

    #[test]
    fn applies_scale_and_offset() {
        let var = var_with_attrs(vec![
            ("scale_factor", AttrValue::Doubles(vec![0.5])),
            ("add_offset", AttrValue::Doubles(vec![10.0])),
        ]);
        let mut values = vec![4.0];
        mask_and_scale(&mut values, &var);
        assert_eq!(values[0], 12.0);
    }

    #[test]
    fn parses_seconds_since_epoch() {
        let units: CfTimeUnits = "seconds since 1970-01-01 00:00:00".parse().unwrap();
        let times = units.to_datetimes(&[0.0, 90.0]);
        assert_eq!(times[0], Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(times[1].minute(), 1);
        assert_eq!(times[1].second(), 30);
    }

    #[test]
    fn parses_hours_and_date_only_epoch() {
        let units: CfTimeUnits = "hours since 2021-09-13".parse().unwrap();
        let times = units.to_datetimes(&[1.5]);
        assert_eq!(
            times[0],
            Utc.with_ymd_and_hms(2021, 9, 13, 1, 30, 0).unwrap()
        );
    }

    #[test]
    fn rejects_unknown_unit_and_missing_since() {
        assert!("fortnights since 1970-01-01".parse::<CfTimeUnits>().is_err());
        assert!("seconds".parse::<CfTimeUnits>().is_err());
    }
}
