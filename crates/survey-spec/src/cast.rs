use serde_json::Value;

use crate::error::AnswerError;

/// Parse and validate a number from a JSON number or a numeric string.
pub fn cast_number(raw: &Value) -> Result<f64, AnswerError> {
    match raw {
        Value::Number(num) => num.as_f64().ok_or(AnswerError::NaNOrInfinite),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(AnswerError::EmptyRequired("number".into()));
            }
            let parsed: f64 = trimmed
                .parse()
                .map_err(|_| AnswerError::InvalidType(format!("'{trimmed}' is not a number")))?;
            if parsed.is_finite() {
                Ok(parsed)
            } else {
                Err(AnswerError::NaNOrInfinite)
            }
        }
        other => Err(AnswerError::InvalidType(format!(
            "expected a number or numeric string, got {}",
            type_label(other)
        ))),
    }
}

/// `cast_number` plus the inclusive [-90, 90] latitude bound.
pub fn cast_latitude(raw: &Value) -> Result<f64, AnswerError> {
    let degrees = cast_number(raw)?;
    if degrees.abs() > 90.0 {
        return Err(AnswerError::OutOfRange(format!(
            "latitude {degrees} outside [-90, 90]"
        )));
    }
    Ok(degrees)
}

/// `cast_number` plus the inclusive [-180, 180] longitude bound.
pub fn cast_longitude(raw: &Value) -> Result<f64, AnswerError> {
    let degrees = cast_number(raw)?;
    if degrees.abs() > 180.0 {
        return Err(AnswerError::OutOfRange(format!(
            "longitude {degrees} outside [-180, 180]"
        )));
    }
    Ok(degrees)
}

/// Parse a non-negative integer timestamp. The value must already be an
/// integer: fractional floats are rejected, never truncated, and strings
/// are not coerced.
pub fn cast_timestamp(raw: &Value) -> Result<i64, AnswerError> {
    let Value::Number(num) = raw else {
        return Err(AnswerError::InvalidType(format!(
            "expected an integer timestamp, got {}",
            type_label(raw)
        )));
    };

    let seconds = match num.as_i64() {
        Some(seconds) => seconds,
        None => {
            let float = num.as_f64().ok_or(AnswerError::NaNOrInfinite)?;
            if float.fract() != 0.0 {
                return Err(AnswerError::NotInteger);
            }
            if float < i64::MIN as f64 || float > i64::MAX as f64 {
                return Err(AnswerError::OutOfRange(format!(
                    "timestamp {float} outside the representable range"
                )));
            }
            // integral float, e.g. 5.0 submitted by a numeric input
            float as i64
        }
    };

    if seconds < 0 {
        return Err(AnswerError::OutOfRange(format!(
            "negative timestamp {seconds}"
        )));
    }
    Ok(seconds)
}

/// Accept any scalar as text. Numbers and booleans are stringified; null,
/// arrays, and objects are rejected. The empty string passes; callers
/// that require a non-empty answer check that themselves.
pub fn cast_text(raw: &Value) -> Result<String, AnswerError> {
    match raw {
        Value::String(text) => Ok(text.clone()),
        Value::Number(num) => Ok(num.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(AnswerError::InvalidType(format!(
            "expected a scalar text value, got {}",
            type_label(other)
        ))),
    }
}

/// Cast every element of an array through `cast_text`, escape literal
/// commas, and join with commas. An empty array yields the empty string.
pub fn cast_string_array(raw: &Value) -> Result<String, AnswerError> {
    let Value::Array(items) = raw else {
        return Err(AnswerError::InvalidType(format!(
            "expected an array of text values, got {}",
            type_label(raw)
        )));
    };

    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        let text = cast_text(item)?;
        parts.push(text.replace(',', "\\,"));
    }
    Ok(parts.join(","))
}

/// Cast a non-empty array of numbers that must not descend (ties are
/// allowed) and join them as a comma-separated decimal string.
pub fn cast_ascending_sequence(raw: &Value) -> Result<String, AnswerError> {
    let Value::Array(items) = raw else {
        return Err(AnswerError::InvalidType(format!(
            "expected an array of numbers, got {}",
            type_label(raw)
        )));
    };
    if items.is_empty() {
        return Err(AnswerError::EmptyRequired("sequence".into()));
    }

    let mut previous = 0.0;
    let mut parts = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let number = cast_number(item)?;
        if index > 0 && number < previous {
            return Err(AnswerError::SequenceOutOfOrder { index });
        }
        previous = number;
        parts.push(number.to_string());
    }
    Ok(parts.join(","))
}

fn type_label(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
