//! 5-field cron expression parsing and evaluation.
//!
//! The grammar is classic crontab: five whitespace-separated fields
//! (minute, hour, day-of-month, month, day-of-week), each built from
//! `*`, single values, ranges `a-b`, steps `*/n` or `a-b/n`, and comma
//! lists of those. Month and day-of-week also accept 3-letter names.
//! Day-of-week 7 is normalized to 0 (both mean Sunday).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::DeclarationError;

/// How far ahead `next_after` scans before giving up. Five years covers
/// leap-day schedules like `0 0 29 2 *`.
const MAX_SCAN_DAYS: i64 = 366 * 5;

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
const DOW_NAMES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// Allowed values for one cron field, as a bitmask offset from zero.
///
/// `wildcard` records whether the field was written as a bare `*`, which
/// matters for the day-of-month/day-of-week matching rule.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CronField {
    allowed: u64,
    wildcard: bool,
}

impl CronField {
    fn contains(&self, value: u8) -> bool {
        self.allowed & (1u64 << value) != 0
    }
}

/// Static description of one field position: its name, value bounds, and
/// any symbolic names it accepts.
struct FieldSpec {
    name: &'static str,
    min: u8,
    max: u8,
    names: &'static [&'static str],
    names_base: u8,
}

const FIELD_SPECS: [FieldSpec; 5] = [
    FieldSpec {
        name: "minute",
        min: 0,
        max: 59,
        names: &[],
        names_base: 0,
    },
    FieldSpec {
        name: "hour",
        min: 0,
        max: 23,
        names: &[],
        names_base: 0,
    },
    FieldSpec {
        name: "day-of-month",
        min: 1,
        max: 31,
        names: &[],
        names_base: 0,
    },
    FieldSpec {
        name: "month",
        min: 1,
        max: 12,
        names: &MONTH_NAMES,
        names_base: 1,
    },
    FieldSpec {
        name: "day-of-week",
        min: 0,
        max: 7,
        names: &DOW_NAMES,
        names_base: 0,
    },
];

/// A parsed 5-field cron expression.
///
/// Retains its source text, so serialization reproduces the expression
/// exactly as it was declared.
///
/// # Example
///
/// ```
/// use samwise_types::CronExpr;
///
/// let expr: CronExpr = "0 8 * * *".parse().unwrap();
/// assert_eq!(expr.to_string(), "0 8 * * *");
///
/// assert!("0 8 * *".parse::<CronExpr>().is_err());      // 4 fields
/// assert!("61 8 * * *".parse::<CronExpr>().is_err());   // minute out of range
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpr {
    source: String,
    minute: CronField,
    hour: CronField,
    day_of_month: CronField,
    month: CronField,
    day_of_week: CronField,
}

impl CronExpr {
    /// Parse a 5-field cron expression.
    pub fn parse(expr: &str) -> Result<Self, DeclarationError> {
        let source = expr.trim().to_string();
        let fields: Vec<&str> = source.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(DeclarationError::schedule(
                source.as_str(),
                format!("expected 5 fields, found {}", fields.len()),
            ));
        }

        let mut parsed = Vec::with_capacity(5);
        for (text, spec) in fields.iter().copied().zip(FIELD_SPECS.iter()) {
            let field = parse_field(text, spec).map_err(|reason| {
                DeclarationError::schedule(source.as_str(), format!("{}: {}", spec.name, reason))
            })?;
            parsed.push(field);
        }

        let mut iter = parsed.into_iter();
        Ok(Self {
            source,
            minute: next_field(&mut iter),
            hour: next_field(&mut iter),
            day_of_month: next_field(&mut iter),
            month: next_field(&mut iter),
            day_of_week: next_field(&mut iter),
        })
    }

    /// The expression exactly as it was declared (trimmed).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the expression matches the given instant (minute precision).
    pub fn matches(&self, t: DateTime<Utc>) -> bool {
        self.minute.contains(t.minute() as u8)
            && self.hour.contains(t.hour() as u8)
            && self.month.contains(t.month() as u8)
            && self.day_matches(t)
    }

    /// The next trigger time strictly after `after`, or `None` if the
    /// expression never matches within the scan horizon (e.g. `0 0 31 2 *`).
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut t = (after + Duration::minutes(1))
            .with_second(0)?
            .with_nanosecond(0)?;
        let limit = t + Duration::days(MAX_SCAN_DAYS);

        while t < limit {
            if !self.month.contains(t.month() as u8) || !self.day_matches(t) {
                t = (t + Duration::days(1)).with_hour(0)?.with_minute(0)?;
                continue;
            }
            if !self.hour.contains(t.hour() as u8) {
                t = (t + Duration::hours(1)).with_minute(0)?;
                continue;
            }
            if !self.minute.contains(t.minute() as u8) {
                t += Duration::minutes(1);
                continue;
            }
            return Some(t);
        }
        None
    }

    /// Classic cron day rule: when both day-of-month and day-of-week are
    /// restricted, a date matches if either does; otherwise both must.
    fn day_matches(&self, t: DateTime<Utc>) -> bool {
        let dom_ok = self.day_of_month.contains(t.day() as u8);
        let dow_ok = self
            .day_of_week
            .contains(t.weekday().num_days_from_sunday() as u8);
        if !self.day_of_month.wildcard && !self.day_of_week.wildcard {
            dom_ok || dow_ok
        } else {
            dom_ok && dow_ok
        }
    }
}

fn next_field(iter: &mut impl Iterator<Item = CronField>) -> CronField {
    // Infallible: `parsed` always holds exactly 5 entries.
    iter.next().unwrap_or(CronField {
        allowed: 0,
        wildcard: false,
    })
}

/// Parse one field. Errors are reasons without the field name; the caller
/// prefixes it.
fn parse_field(text: &str, spec: &FieldSpec) -> Result<CronField, String> {
    if text.is_empty() {
        return Err("empty field".to_string());
    }

    let mut allowed = 0u64;
    let mut wildcard = false;

    for term in text.split(',') {
        if term.is_empty() {
            return Err("empty list entry".to_string());
        }

        let (base, step) = match term.split_once('/') {
            Some((base, step_text)) => {
                let step: u8 = step_text
                    .parse()
                    .map_err(|_| format!("invalid step `{}`", step_text))?;
                if step == 0 {
                    return Err("step must be >= 1".to_string());
                }
                (base, step)
            }
            None => (term, 1),
        };

        let (lo, hi) = match base {
            "*" => {
                if term == "*" {
                    wildcard = true;
                }
                (spec.min, spec.max)
            }
            _ => match base.split_once('-') {
                Some((a, b)) => {
                    let lo = parse_value(a, spec)?;
                    let hi = parse_value(b, spec)?;
                    if lo > hi {
                        return Err(format!("range start {} greater than end {}", lo, hi));
                    }
                    (lo, hi)
                }
                // A bare value with a step means "from the value to the max".
                None => {
                    let v = parse_value(base, spec)?;
                    if term.contains('/') {
                        (v, spec.max)
                    } else {
                        (v, v)
                    }
                }
            },
        };

        let mut v = lo;
        while v <= hi {
            allowed |= 1u64 << normalize(v, spec);
            v = v.saturating_add(step);
        }
    }

    Ok(CronField { allowed, wildcard })
}

/// Parse a single numeric or named value and bounds-check it.
fn parse_value(text: &str, spec: &FieldSpec) -> Result<u8, String> {
    if let Some(idx) = spec
        .names
        .iter()
        .position(|n| n.eq_ignore_ascii_case(text))
    {
        return Ok(idx as u8 + spec.names_base);
    }

    let value: u8 = text
        .parse()
        .map_err(|_| format!("invalid value `{}`", text))?;
    if value < spec.min || value > spec.max {
        return Err(format!(
            "value {} out of range ({}-{})",
            value, spec.min, spec.max
        ));
    }
    Ok(value)
}

/// Day-of-week 7 is an alias for Sunday.
fn normalize(value: u8, spec: &FieldSpec) -> u8 {
    if spec.name == "day-of-week" && value == 7 {
        0
    } else {
        value
    }
}

impl FromStr for CronExpr {
    type Err = DeclarationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CronExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for CronExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for CronExpr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
