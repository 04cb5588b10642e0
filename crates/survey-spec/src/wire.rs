//! Colon-delimited answer row codec.
//!
//! One row per answer: `uid:text:value:lat:lon:time_begin:time_end:`
//! `time_zone_delta:dst_delta`. String fields are sanitized on the way
//! out (trimmed, newlines collapsed, `:`/`'`/`"` backslash-escaped); the
//! parser honors those escapes and re-validates every numeric field, so a
//! corrupt row always surfaces as an error instead of a defaulted record.

use serde_json::Value;

use crate::answer::AnswerRecord;
use crate::cast::{cast_latitude, cast_longitude};
use crate::error::AnswerError;

/// Number of fields in an answer row.
pub const FIELD_COUNT: usize = 9;

/// Sanitize a string field for the wire: trim, collapse each newline
/// sequence to a single space, and backslash-escape the characters that
/// collide with the row format.
pub fn sanitize_value(text: &str) -> String {
    let trimmed = text.trim();
    let mut out = String::with_capacity(trimmed.len());
    let mut chars = trimmed.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            ':' | '\'' | '"' => {
                out.push('\\');
                out.push(ch);
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(' ');
            }
            '\n' => out.push(' '),
            other => out.push(other),
        }
    }
    out
}

/// Encode a record as one answer row. The uid must be non-empty; the
/// record shape itself is closed by the type.
pub fn serialize(answer: &AnswerRecord) -> Result<String, AnswerError> {
    if answer.uid.is_empty() {
        return Err(AnswerError::EmptyRequired("uid".into()));
    }

    let fields = [
        sanitize_value(&answer.uid),
        sanitize_value(&answer.text),
        answer.value.to_string(),
        answer.lat.to_string(),
        answer.lon.to_string(),
        answer.time_begin.to_string(),
        answer.time_end.to_string(),
        answer.time_zone_delta.to_string(),
        answer.dst_delta.to_string(),
    ];
    Ok(fields.join(":"))
}

/// Encode a loose JSON object as an answer row, enforcing the closed
/// nine-key record shape first.
pub fn serialize_value(raw: &Value) -> Result<String, AnswerError> {
    let answer = AnswerRecord::from_value(raw)?;
    serialize(&answer)
}

/// Decode one answer row. Requires exactly nine fields (escaped `\:` is
/// data, not a boundary) and a non-empty uid; numeric fields are parsed
/// and re-validated.
pub fn deserialize(row: &str) -> Result<AnswerRecord, AnswerError> {
    let fields = split_row(row);
    if fields.len() != FIELD_COUNT {
        return Err(AnswerError::ShapeMismatch(format!(
            "expected {FIELD_COUNT} fields, got {}",
            fields.len()
        )));
    }

    if fields[0].is_empty() {
        return Err(AnswerError::EmptyRequired("uid".into()));
    }

    Ok(AnswerRecord {
        uid: fields[0].clone(),
        text: fields[1].clone(),
        value: parse_number(&fields[2], "value")?,
        lat: cast_latitude(&Value::String(fields[3].clone()))?,
        lon: cast_longitude(&Value::String(fields[4].clone()))?,
        time_begin: parse_seconds(&fields[5], "time_begin")?,
        time_end: parse_seconds(&fields[6], "time_end")?,
        time_zone_delta: parse_integer(&fields[7], "time_zone_delta")?,
        dst_delta: parse_integer(&fields[8], "dst_delta")?,
    })
}

/// Split a row on unescaped colons, resolving the `\:`, `\'`, and `\"`
/// escapes emitted by `sanitize_value`. Unrecognized escapes pass through
/// verbatim.
fn split_row(row: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = row.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(escaped @ (':' | '\'' | '"')) => current.push(escaped),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            ':' => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);
    fields
}

fn parse_number(field: &str, name: &str) -> Result<f64, AnswerError> {
    let number: f64 = field
        .parse()
        .map_err(|_| AnswerError::InvalidType(format!("field '{name}' is not a number")))?;
    if number.is_finite() {
        Ok(number)
    } else {
        Err(AnswerError::NaNOrInfinite)
    }
}

fn parse_integer(field: &str, name: &str) -> Result<i64, AnswerError> {
    field
        .parse()
        .map_err(|_| AnswerError::InvalidType(format!("field '{name}' is not an integer")))
}

fn parse_seconds(field: &str, name: &str) -> Result<i64, AnswerError> {
    let seconds = parse_integer(field, name)?;
    if seconds < 0 {
        return Err(AnswerError::OutOfRange(format!(
            "field '{name}' is a negative timestamp"
        )));
    }
    Ok(seconds)
}
