//! Predicate encoders for registered search fields.
//!
//! Each encoder turns one raw constraint value into an ADQL boolean fragment
//! over the field's target column(s). Encoders recognize `|` in string values
//! as an OR separator between alternatives; range-capable encoders
//! additionally accept `<v`, `<=v`, `>v`, `>=v`, `a..b`, and bare values.
//!
//! Numeric tokens are validated but emitted verbatim, so a caller-supplied
//! `0.1` survives into the query untouched. A `null` value (or an empty
//! string) is consumed without producing a predicate.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::error::{display_value, EncodeError};

/// Result type shared by all encoders. An empty string means the value was
/// consumed but produced no predicate.
pub type EncodeResult = Result<String, EncodeError>;

/// Encoder function bound to a registered field: `(columns, value) -> fragment`.
pub type Encoder = fn(&str, &Value) -> EncodeResult;

/// Date format accepted by [`datetime_predicate`]; a ` HH:MM:SS` suffix is
/// also accepted.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

const DATETIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Default search radius in degrees when a position value omits one.
pub const DEFAULT_RADIUS_DEG: f64 = 1.0;

const SPEED_OF_LIGHT_MS: f64 = 299_792_458.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

// ============================================================================
// Interval grammar
// ============================================================================

/// One alternative parsed from a range-capable value.
enum Interval<'a> {
    Exact(&'a str),
    Lower(&'a str),
    Upper(&'a str),
    Range(&'a str, &'a str),
}

fn split_alternatives(raw: &str) -> impl Iterator<Item = &str> {
    raw.split('|').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_interval(token: &str) -> Interval<'_> {
    if let Some(rest) = token.strip_prefix("<=").or_else(|| token.strip_prefix('<')) {
        Interval::Upper(rest.trim())
    } else if let Some(rest) = token.strip_prefix(">=").or_else(|| token.strip_prefix('>')) {
        Interval::Lower(rest.trim())
    } else if let Some((lo, hi)) = token.split_once("..") {
        Interval::Range(lo.trim(), hi.trim())
    } else {
        Interval::Exact(token)
    }
}

/// OR-join alternatives, parenthesized only when there is more than one.
fn join_alternatives(terms: Vec<String>) -> String {
    if terms.len() > 1 {
        format!("({})", terms.join(" OR "))
    } else {
        terms.into_iter().next().unwrap_or_default()
    }
}

fn expect_string<'a>(value: &'a Value, expected: &'static str) -> Result<&'a str, EncodeError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(EncodeError::UnexpectedType {
            expected,
            value: display_value(other),
        }),
    }
}

// ============================================================================
// Encoders
// ============================================================================

/// Equality or `LIKE` predicate over a string column.
///
/// `*` wildcards become `%`; `|` separates OR alternatives.
pub fn string_predicate(columns: &str, value: &Value) -> EncodeResult {
    if value.is_null() {
        return Ok(String::new());
    }
    let raw = expect_string(value, "a string")?;
    let mut terms = Vec::new();
    for alt in split_alternatives(raw) {
        if alt.contains('*') {
            terms.push(format!("{} LIKE '{}'", columns, alt.replace('*', "%")));
        } else {
            terms.push(format!("{}='{}'", columns, alt));
        }
    }
    Ok(join_alternatives(terms))
}

/// Numeric comparison predicate using the interval grammar.
///
/// A bare value means equality; `>v`/`>=v` a minimum, `<v`/`<=v` a maximum,
/// `a..b` a closed range. A bare JSON number is accepted as an exact term.
pub fn numeric_predicate(columns: &str, value: &Value) -> EncodeResult {
    let raw = match value {
        Value::Null => return Ok(String::new()),
        Value::Number(n) => return Ok(format!("{}={}", columns, n)),
        Value::String(s) => s,
        other => {
            return Err(EncodeError::UnexpectedType {
                expected: "a number or numeric range",
                value: display_value(other),
            })
        }
    };
    let mut terms = Vec::new();
    for alt in split_alternatives(raw) {
        terms.push(match parse_interval(alt) {
            Interval::Exact(v) => format!("{}={}", columns, checked_number(v)?),
            Interval::Lower(v) => format!("{}>={}", columns, checked_number(v)?),
            Interval::Upper(v) => format!("{}<={}", columns, checked_number(v)?),
            Interval::Range(lo, hi) => format!(
                "({1}<={0} AND {0}<={2})",
                columns,
                checked_number(lo)?,
                checked_number(hi)?
            ),
        });
    }
    Ok(join_alternatives(terms))
}

fn checked_number(token: &str) -> Result<&str, EncodeError> {
    token
        .parse::<f64>()
        .map_err(|_| EncodeError::InvalidNumber(token.to_string()))?;
    Ok(token)
}

/// Date comparison predicate over a Modified Julian Date column.
///
/// Endpoints use [`DATE_FORMAT`] (`dd-mm-yyyy`), optionally with a
/// ` HH:MM:SS` time part, and are converted to MJD before emission.
pub fn datetime_predicate(columns: &str, value: &Value) -> EncodeResult {
    if value.is_null() {
        return Ok(String::new());
    }
    let raw = expect_string(value, "a date or date range")?;
    let mut terms = Vec::new();
    for alt in split_alternatives(raw) {
        terms.push(match parse_interval(alt) {
            Interval::Exact(v) => format!("{}={}", columns, to_mjd(v)?),
            Interval::Lower(v) => format!("{}>={}", columns, to_mjd(v)?),
            Interval::Upper(v) => format!("{}<={}", columns, to_mjd(v)?),
            Interval::Range(lo, hi) => {
                format!("({1}<={0} AND {0}<={2})", columns, to_mjd(lo)?, to_mjd(hi)?)
            }
        });
    }
    Ok(join_alternatives(terms))
}

fn parse_datetime(token: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(token, DATETIME_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(token, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn mjd_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1858, 11, 17)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("MJD epoch is a valid date")
}

fn to_mjd(token: &str) -> Result<f64, EncodeError> {
    let datetime =
        parse_datetime(token).ok_or_else(|| EncodeError::InvalidDate(token.to_string()))?;
    Ok((datetime - mjd_epoch()).num_seconds() as f64 / SECONDS_PER_DAY)
}

/// Spectral resolution predicate over a wavelength-resolution column.
///
/// Input values are frequency resolutions in kHz; the column stores
/// wavelength resolution in meters, so each endpoint is converted with
/// `c / (kHz * 1000)` and the comparison direction flips: a larger frequency
/// resolution is a smaller wavelength resolution.
pub fn spectral_resolution_predicate(columns: &str, value: &Value) -> EncodeResult {
    let raw = match value {
        Value::Null => return Ok(String::new()),
        Value::Number(n) => {
            let khz = n
                .as_f64()
                .ok_or_else(|| EncodeError::InvalidNumber(n.to_string()))?;
            return Ok(format!("{}={}", columns, khz_to_meters(khz)?));
        }
        Value::String(s) => s,
        other => {
            return Err(EncodeError::UnexpectedType {
                expected: "a frequency resolution in kHz",
                value: display_value(other),
            })
        }
    };
    let mut terms = Vec::new();
    for alt in split_alternatives(raw) {
        terms.push(match parse_interval(alt) {
            Interval::Exact(v) => format!("{}={}", columns, parse_khz(v)?),
            Interval::Lower(v) => format!("{}<={}", columns, parse_khz(v)?),
            Interval::Upper(v) => format!("{}>={}", columns, parse_khz(v)?),
            Interval::Range(lo, hi) => format!(
                "({1}<={0} AND {0}<={2})",
                columns,
                parse_khz(hi)?,
                parse_khz(lo)?
            ),
        });
    }
    Ok(join_alternatives(terms))
}

fn parse_khz(token: &str) -> Result<f64, EncodeError> {
    let khz: f64 = token
        .parse()
        .map_err(|_| EncodeError::InvalidNumber(token.to_string()))?;
    khz_to_meters(khz)
}

fn khz_to_meters(khz: f64) -> Result<f64, EncodeError> {
    if khz <= 0.0 || !khz.is_finite() {
        return Err(EncodeError::InvalidNumber(khz.to_string()));
    }
    Ok(SPEED_OF_LIGHT_MS / (khz * 1000.0))
}

/// Cone-search predicate over a two-column position.
///
/// The value is an already-stringified `ra, dec[, radius]` in degrees
/// (radius defaults to [`DEFAULT_RADIUS_DEG`]). The frame is `GALACTIC` for
/// galactic column pairs and `ICRS` otherwise.
pub fn position_predicate(columns: &str, value: &Value) -> EncodeResult {
    if value.is_null() {
        return Ok(String::new());
    }
    let raw = expect_string(value, "'ra, dec[, radius]' in degrees")?;
    let (c1, c2) = match columns.split_once(',') {
        Some((a, b)) => (a.trim(), b.trim()),
        None => return Err(EncodeError::InvalidPosition(columns.to_string())),
    };
    let frame = if c1.starts_with("gal") {
        "GALACTIC"
    } else {
        "ICRS"
    };
    let mut terms = Vec::new();
    for alt in split_alternatives(raw) {
        terms.push(position_term(frame, c1, c2, alt)?);
    }
    Ok(join_alternatives(terms))
}

fn position_term(frame: &str, c1: &str, c2: &str, token: &str) -> Result<String, EncodeError> {
    let parts: Vec<&str> = token.split(',').map(str::trim).collect();
    let (lon, lat, radius) = match parts.as_slice() {
        [lon, lat] => (*lon, *lat, None),
        [lon, lat, radius] => (*lon, *lat, Some(*radius)),
        _ => return Err(EncodeError::InvalidPosition(token.to_string())),
    };
    for part in [Some(lon), Some(lat), radius].into_iter().flatten() {
        part.parse::<f64>()
            .map_err(|_| EncodeError::InvalidPosition(token.to_string()))?;
    }
    let radius = radius
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_RADIUS_DEG.to_string());
    Ok(format!(
        "CONTAINS(POINT('{0}',{1},{2}),CIRCLE('{0}',{3},{4},{5}))=1",
        frame, c1, c2, lon, lat, radius
    ))
}

/// Data-rights predicate over boolean visibility flags.
///
/// `true` selects public data, `false` proprietary data, and `null` consumes
/// the key without constraining the query.
pub fn visibility_predicate(columns: &str, value: &Value) -> EncodeResult {
    match value {
        Value::Bool(true) => Ok(format!("{}='Public'", columns)),
        Value::Bool(false) => Ok(format!("{}='Proprietary'", columns)),
        Value::Null => Ok(String::new()),
        other => Err(EncodeError::UnexpectedType {
            expected: "a boolean or null",
            value: display_value(other),
        }),
    }
}
