use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::cast::{
    cast_ascending_sequence, cast_latitude, cast_longitude, cast_number, cast_string_array,
    cast_text, cast_timestamp,
};
use crate::error::AnswerError;
use crate::spec::question::{QuestionSpec, QuestionType};

/// Session ids and UUID answers must be the lowercase RFC 4122 form.
static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("uuid pattern compiles")
});

/// One answer to one question: the nine wire fields, in wire order.
///
/// Exactly one channel (`text` / `value` / `lat`+`lon` /
/// `time_begin`[+`time_end`]) is meaningfully populated per question type;
/// the rest stay at their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(deny_unknown_fields)]
pub struct AnswerRecord {
    pub uid: String,
    pub text: String,
    pub value: f64,
    pub lat: f64,
    pub lon: f64,
    pub time_begin: i64,
    pub time_end: i64,
    pub time_zone_delta: i64,
    pub dst_delta: i64,
}

/// The nine record keys in wire order.
pub const RECORD_FIELDS: [&str; 9] = [
    "uid",
    "text",
    "value",
    "lat",
    "lon",
    "time_begin",
    "time_end",
    "time_zone_delta",
    "dst_delta",
];

impl AnswerRecord {
    /// Blank record carrying only the question id.
    pub fn with_uid(uid: impl Into<String>) -> Self {
        AnswerRecord {
            uid: uid.into(),
            ..AnswerRecord::default()
        }
    }

    /// Build a record from a loose JSON object, enforcing the closed
    /// nine-key shape: any missing or extra key is a `ShapeMismatch`.
    pub fn from_value(raw: &Value) -> Result<Self, AnswerError> {
        let Value::Object(map) = raw else {
            return Err(AnswerError::ShapeMismatch(
                "answer record must be an object".into(),
            ));
        };

        for field in RECORD_FIELDS {
            if !map.contains_key(field) {
                return Err(AnswerError::ShapeMismatch(format!("missing key '{field}'")));
            }
        }
        for key in map.keys() {
            if !RECORD_FIELDS.contains(&key.as_str()) {
                return Err(AnswerError::ShapeMismatch(format!("unexpected key '{key}'")));
            }
        }

        serde_json::from_value(raw.clone())
            .map_err(|error| AnswerError::InvalidType(format!("answer record: {error}")))
    }
}

/// Validate and cast a raw form value against the question's type,
/// producing a fully populated record. Any cast failure aborts the whole
/// call, so callers never see a partially valid record.
pub fn set_value(question: &QuestionSpec, raw: &Value) -> Result<AnswerRecord, AnswerError> {
    if question.id.is_empty() {
        return Err(AnswerError::EmptyRequired("question id".into()));
    }

    let mut answer = AnswerRecord::with_uid(&question.id);

    match question.kind {
        QuestionType::Int | QuestionType::Fixedpoint | QuestionType::Duration24 => {
            answer.value = cast_number(raw)?;
        }
        QuestionType::Multichoice | QuestionType::Multiselect => {
            // legacy payloads deliver the choice list pre-joined
            answer.text = match raw {
                Value::String(text) => {
                    let items = text
                        .split(',')
                        .map(|part| Value::String(part.to_string()))
                        .collect();
                    cast_string_array(&Value::Array(items))?
                }
                other => cast_string_array(other)?,
            };
        }
        QuestionType::Latlon => {
            let coords = expect_pair(raw, "LATLON requires an array of two numbers")?;
            answer.lat = cast_latitude(&coords[0])?;
            answer.lon = cast_longitude(&coords[1])?;
        }
        QuestionType::Datetime | QuestionType::Daytime => {
            answer.time_begin = cast_timestamp(raw)?;
        }
        QuestionType::Timerange => {
            let times = expect_pair(raw, "TIMERANGE requires an array of two timestamps")?;
            answer.time_begin = cast_timestamp(&times[0])?;
            answer.time_end = cast_timestamp(&times[1])?;
        }
        QuestionType::FixedpointSequence
        | QuestionType::DaytimeSequence
        | QuestionType::DatetimeSequence => {
            answer.text = cast_ascending_sequence(raw)?;
        }
        QuestionType::Upload => {
            return Err(AnswerError::UnsupportedType("UPLOAD".into()));
        }
        QuestionType::Uuid => {
            let text = cast_text(raw)?;
            if !UUID_PATTERN.is_match(&text) {
                return Err(AnswerError::InvalidType(format!(
                    "'{text}' is not a lowercase uuid"
                )));
            }
            answer.text = text;
        }
        QuestionType::Text
        | QuestionType::Hidden
        | QuestionType::Textarea
        | QuestionType::Email
        | QuestionType::Password
        | QuestionType::Checkbox
        | QuestionType::Singlechoice
        | QuestionType::Singleselect
        | QuestionType::DialogDataCrawler
        | QuestionType::Sha1Hash => {
            let text = cast_text(raw)?;
            if text.is_empty() {
                return Err(AnswerError::EmptyRequired(question.id.clone()));
            }
            answer.text = text;
        }
        QuestionType::Unknown => {
            return Err(AnswerError::UnsupportedType(format!(
                "question '{}' has an unknown type",
                question.id
            )));
        }
    }

    Ok(answer)
}

/// UI-facing value for a question, the inverse of `set_value` for the
/// happy path. An absent record falls back to a fresh default record
/// rather than propagating a failure.
pub fn get_value(question: &QuestionSpec, answer: Option<&AnswerRecord>) -> Value {
    let fallback;
    let answer = match answer {
        Some(record) => record,
        None => {
            fallback = create(question);
            &fallback
        }
    };

    match question.kind {
        QuestionType::Int | QuestionType::Fixedpoint | QuestionType::Duration24 => {
            json!(answer.value)
        }
        QuestionType::Multichoice | QuestionType::Multiselect => Value::Array(
            answer
                .text
                .split(',')
                .map(|part| Value::String(part.to_string()))
                .collect(),
        ),
        QuestionType::Latlon => json!([answer.lat, answer.lon]),
        QuestionType::Datetime | QuestionType::Daytime => json!(answer.time_begin),
        QuestionType::Timerange => json!([answer.time_begin, answer.time_end]),
        QuestionType::FixedpointSequence => Value::Array(
            answer
                .text
                .split(',')
                .filter_map(|part| part.parse::<f64>().ok())
                .map(|number| json!(number))
                .collect(),
        ),
        QuestionType::DaytimeSequence | QuestionType::DatetimeSequence => Value::Array(
            answer
                .text
                .split(',')
                .filter_map(|part| part.parse::<i64>().ok())
                .map(|seconds| json!(seconds))
                .collect(),
        ),
        QuestionType::Text
        | QuestionType::Hidden
        | QuestionType::Textarea
        | QuestionType::Email
        | QuestionType::Password
        | QuestionType::Checkbox
        | QuestionType::Singlechoice
        | QuestionType::Singleselect
        | QuestionType::DialogDataCrawler
        | QuestionType::Sha1Hash
        | QuestionType::Uuid => Value::String(answer.text.clone()),
        QuestionType::Upload | QuestionType::Unknown => Value::Null,
    }
}

/// Initial record for a question: the declared default value if it casts
/// cleanly, otherwise a blank record carrying the question id.
pub fn create(question: &QuestionSpec) -> AnswerRecord {
    if let Some(default) = &question.default_value
        && !matches!(default, Value::String(text) if text.is_empty())
        && let Ok(answer) = set_value(question, default)
    {
        return answer;
    }
    AnswerRecord::with_uid(&question.id)
}

/// Unit attached to an answer for display. The time kinds always report
/// seconds and LATLON degrees, whatever the question declares; the wire
/// row itself carries no unit field.
pub fn answer_unit(question: &QuestionSpec) -> &str {
    match question.kind {
        QuestionType::Latlon => "degrees",
        QuestionType::Datetime
        | QuestionType::Daytime
        | QuestionType::Timerange
        | QuestionType::DaytimeSequence
        | QuestionType::DatetimeSequence => "seconds",
        _ => question.unit.as_str(),
    }
}

fn expect_pair<'a>(raw: &'a Value, message: &str) -> Result<&'a [Value], AnswerError> {
    match raw {
        Value::Array(items) if items.len() == 2 => Ok(items),
        _ => Err(AnswerError::InvalidType(message.into())),
    }
}
