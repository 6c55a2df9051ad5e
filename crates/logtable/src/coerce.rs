//! Coerce — per-table conversion of captured text into typed values.

use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{NaiveDateTime, ParseError, ParseResult};

use crate::error::{LogError, LogResult};
use crate::schema::TypeTag;
use crate::value::Value;

/// Conversion table owned by one [`crate::LogTable`].
///
/// The `date` conversion is bound to this table's date format, so two tables
/// with different formats never see each other's settings.
#[derive(Debug, Clone, Default)]
pub struct Coercer {
    date_format: Option<String>,
}

impl Coercer {
    pub fn new(date_format: Option<String>) -> Self {
        Self { date_format }
    }

    pub fn date_format(&self) -> Option<&str> {
        self.date_format.as_deref()
    }

    /// Convert `raw` according to `tag`.
    pub fn apply(&self, field: &str, tag: &TypeTag, raw: &str) -> LogResult<Value> {
        match tag {
            TypeTag::Character => Ok(Value::Str(raw.to_string())),
            TypeTag::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| conversion(field, raw, tag, e.to_string())),
            TypeTag::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| conversion(field, raw, tag, e.to_string())),
            TypeTag::Date => {
                let fmt = self
                    .date_format
                    .as_deref()
                    .ok_or_else(|| LogError::MissingDateFormat { field: field.to_string() })?;
                parse_date(raw, fmt)
                    .map(Value::Date)
                    .map_err(|e| conversion(field, raw, tag, e.to_string()))
            }
            TypeTag::Unknown(other) => Err(LogError::InvalidType {
                field: field.to_string(),
                tag: other.clone(),
            }),
        }
    }
}

fn conversion(field: &str, raw: &str, tag: &TypeTag, reason: String) -> LogError {
    let target = match tag {
        TypeTag::Integer => "integer",
        TypeTag::Float => "float",
        TypeTag::Date => "date",
        _ => "character",
    };
    LogError::Conversion {
        field: field.to_string(),
        value: raw.to_string(),
        target,
        reason,
    }
}

/// Parse `s` with a strftime-style format.
///
/// Components the format does not carry fall back to 1900-01-01 00:00:00,
/// so `"%b %d %H:%M:%S"` yields dates in 1900. A parsed weekday name is only
/// checked for spelling; it does not have to agree with the resulting date.
pub fn parse_date(s: &str, fmt: &str) -> ParseResult<NaiveDateTime> {
    let mut parsed = Parsed::new();
    format::parse(&mut parsed, s, StrftimeItems::new(fmt))?;

    if parsed.timestamp().is_some() {
        return parsed.to_naive_datetime_with_offset(0);
    }

    let mut calendar = calendar_fields(&parsed)?;
    let date = match calendar.to_naive_date() {
        Ok(date) => date,
        Err(e) if is_not_enough(&e) => {
            fill_calendar_defaults(&mut calendar)?;
            calendar.to_naive_date()?
        }
        Err(e) => return Err(e),
    };

    let time = match parsed.to_naive_time() {
        Ok(time) => time,
        Err(e) if is_not_enough(&e) => {
            let mut filled = parsed.clone();
            match (filled.hour_div_12(), filled.hour_mod_12()) {
                (None, None) => filled.set_hour(0)?,
                // %I without %p reads as AM
                (None, Some(_)) => filled.set_ampm(false)?,
                _ => {}
            }
            if filled.minute().is_none() {
                filled.set_minute(0)?;
            }
            filled.to_naive_time()?
        }
        Err(e) => return Err(e),
    };

    Ok(date.and_time(time))
}

fn has_week(parsed: &Parsed) -> bool {
    parsed.week_from_sun().is_some() || parsed.week_from_mon().is_some() || parsed.isoweek().is_some()
}

/// Copy the date fields of `parsed`, leaving the weekday behind unless a
/// week number needs it to resolve the day.
fn calendar_fields(parsed: &Parsed) -> ParseResult<Parsed> {
    let mut date = Parsed::new();
    if let Some(v) = parsed.year() {
        date.set_year(v.into())?;
    }
    if let Some(v) = parsed.year_div_100() {
        date.set_year_div_100(v.into())?;
    }
    if let Some(v) = parsed.year_mod_100() {
        date.set_year_mod_100(v.into())?;
    }
    if let Some(v) = parsed.month() {
        date.set_month(v.into())?;
    }
    if let Some(v) = parsed.day() {
        date.set_day(v.into())?;
    }
    if let Some(v) = parsed.ordinal() {
        date.set_ordinal(v.into())?;
    }

    if has_week(parsed) {
        if let Some(v) = parsed.isoyear() {
            date.set_isoyear(v.into())?;
        }
        if let Some(v) = parsed.isoyear_div_100() {
            date.set_isoyear_div_100(v.into())?;
        }
        if let Some(v) = parsed.isoyear_mod_100() {
            date.set_isoyear_mod_100(v.into())?;
        }
        if let Some(v) = parsed.week_from_sun() {
            date.set_week_from_sun(v.into())?;
        }
        if let Some(v) = parsed.week_from_mon() {
            date.set_week_from_mon(v.into())?;
        }
        if let Some(v) = parsed.isoweek() {
            date.set_isoweek(v.into())?;
        }
        if let Some(v) = parsed.weekday() {
            date.set_weekday(v)?;
        }
    }
    Ok(date)
}

fn fill_calendar_defaults(date: &mut Parsed) -> ParseResult<()> {
    if date.year().is_none() && date.year_div_100().is_none() && date.year_mod_100().is_none() {
        date.set_year(1900)?;
    }
    // A day-of-year or week number already pins the day within the year
    if date.ordinal().is_none() && !has_week(date) {
        if date.month().is_none() {
            date.set_month(1)?;
        }
        if date.day().is_none() {
            date.set_day(1)?;
        }
    }
    Ok(())
}

fn is_not_enough(e: &ParseError) -> bool {
    e.kind() == format::ParseErrorKind::NotEnough
}
