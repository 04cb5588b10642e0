use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Closed set of question types understood by the survey engine.
///
/// The wire tags are the engine's SCREAMING_SNAKE strings; anything else
/// deserializes to [`QuestionType::Unknown`] and is rejected when an
/// answer is dispatched, so one unrecognized question cannot poison a
/// whole question set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    Int,
    Fixedpoint,
    Duration24,
    Multichoice,
    Multiselect,
    Latlon,
    Datetime,
    Daytime,
    Timerange,
    Upload,
    Text,
    Checkbox,
    Hidden,
    Textarea,
    Email,
    Password,
    Singlechoice,
    Singleselect,
    FixedpointSequence,
    DaytimeSequence,
    DatetimeSequence,
    Uuid,
    Sha1Hash,
    DialogDataCrawler,
    #[default]
    #[serde(other)]
    Unknown,
}

impl QuestionType {
    /// Wire tag for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Int => "INT",
            QuestionType::Fixedpoint => "FIXEDPOINT",
            QuestionType::Duration24 => "DURATION24",
            QuestionType::Multichoice => "MULTICHOICE",
            QuestionType::Multiselect => "MULTISELECT",
            QuestionType::Latlon => "LATLON",
            QuestionType::Datetime => "DATETIME",
            QuestionType::Daytime => "DAYTIME",
            QuestionType::Timerange => "TIMERANGE",
            QuestionType::Upload => "UPLOAD",
            QuestionType::Text => "TEXT",
            QuestionType::Checkbox => "CHECKBOX",
            QuestionType::Hidden => "HIDDEN",
            QuestionType::Textarea => "TEXTAREA",
            QuestionType::Email => "EMAIL",
            QuestionType::Password => "PASSWORD",
            QuestionType::Singlechoice => "SINGLECHOICE",
            QuestionType::Singleselect => "SINGLESELECT",
            QuestionType::FixedpointSequence => "FIXEDPOINT_SEQUENCE",
            QuestionType::DaytimeSequence => "DAYTIME_SEQUENCE",
            QuestionType::DatetimeSequence => "DATETIME_SEQUENCE",
            QuestionType::Uuid => "UUID",
            QuestionType::Sha1Hash => "SHA1_HASH",
            QuestionType::DialogDataCrawler => "DIALOG_DATA_CRAWLER",
            QuestionType::Unknown => "UNKNOWN",
        }
    }
}

/// A single prompt as delivered by the survey engine, normalized so every
/// field the answer dispatcher reads is present. Read-only after receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct QuestionSpec {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    #[serde(default)]
    pub unit: String,
    /// Extra fields delivered by the engine that the dispatcher does not
    /// read. Preserved verbatim so they survive re-serialization.
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

/// Overlay a raw question object onto the defaulted shape, one field at a
/// time. A field of an unexpected type falls back to that field's default
/// without disturbing the rest; unknown extra fields are preserved but
/// ignored by the dispatcher. Anything that is not an object degrades to
/// the default spec, whose `Unknown` kind is rejected at dispatch.
pub fn normalize(raw: &Value) -> QuestionSpec {
    let Value::Object(fields) = raw else {
        return QuestionSpec::default();
    };

    let mut question = QuestionSpec::default();
    for (key, value) in fields {
        match key.as_str() {
            "id" => question.id = string_field(value),
            "name" => question.name = string_field(value),
            "type" => {
                question.kind = serde_json::from_value(value.clone()).unwrap_or_default();
            }
            "title" => question.title = string_field(value),
            "description" => question.description = string_field(value),
            "default_value" => {
                question.default_value = (!value.is_null()).then(|| value.clone());
            }
            "min_value" => question.min_value = value.as_f64(),
            "max_value" => question.max_value = value.as_f64(),
            "choices" => question.choices = choice_list(value),
            "unit" => question.unit = string_field(value),
            _ => {
                question.extra.insert(key.clone(), value.clone());
            }
        }
    }
    question
}

fn string_field(value: &Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

/// Choice labels arrive as strings or numbers; numbers are stringified.
fn choice_list(value: &Value) -> Option<Vec<String>> {
    let Value::Array(items) = value else {
        return None;
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(text) => Some(text.clone()),
            Value::Number(num) => Some(num.to_string()),
            _ => None,
        })
        .collect()
}

/// Normalize an ordered question set as received from the engine.
pub fn normalize_all(raws: &[Value]) -> Vec<QuestionSpec> {
    raws.iter().map(normalize).collect()
}
