#![allow(missing_docs)]

pub mod answer;
pub mod cast;
pub mod error;
pub mod groups;
pub mod spec;
pub mod wire;

pub use answer::{AnswerRecord, answer_unit, create, get_value, set_value};
pub use cast::{
    cast_ascending_sequence, cast_latitude, cast_longitude, cast_number, cast_string_array,
    cast_text, cast_timestamp,
};
pub use error::AnswerError;
pub use groups::{
    DisplayItem, GroupCommonality, classify_group, extract_group_id, partition_questions,
};
pub use spec::{QuestionSpec, QuestionType, normalize, normalize_all};
pub use wire::{deserialize, sanitize_value, serialize, serialize_value};
