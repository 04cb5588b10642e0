//! Display-group detection over an ordered question set.
//!
//! A question id may carry a group suffix behind a `__` delimiter
//! (`sleep__q1`). Contiguous runs sharing the same suffix are folded into
//! one display group, and each group is classified by how much its
//! members have in common, which decides whether a renderer can show it
//! as a matrix.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::{QuestionSpec, QuestionType};

/// Group suffix of a question id: the segment after the last `__`,
/// trimmed. Ids without the delimiter (or with nothing behind it) have no
/// group.
pub fn extract_group_id(id: &str) -> String {
    match id.trim().rsplit_once("__") {
        Some((_, suffix)) => suffix.trim().to_string(),
        None => String::new(),
    }
}

/// One element of the display sequence: a standalone question, or a
/// contiguous run sharing a group id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayItem {
    Single(QuestionSpec),
    Group(Vec<QuestionSpec>),
}

/// Fold an ordered question list into display items. Group membership
/// requires contiguity: a question without a group id ends the current
/// run, so identical suffixes separated by a gap form separate groups.
pub fn partition_questions(questions: Vec<QuestionSpec>) -> Vec<DisplayItem> {
    let mut items: Vec<DisplayItem> = Vec::new();
    let mut last_gid = String::new();

    for question in questions {
        let gid = extract_group_id(&question.id);

        if gid.is_empty() {
            items.push(DisplayItem::Single(question));
            last_gid.clear();
            continue;
        }

        if gid != last_gid {
            items.push(DisplayItem::Group(Vec::new()));
        }
        if let Some(DisplayItem::Group(members)) = items.last_mut() {
            members.push(question);
        }
        last_gid = gid;
    }

    items
}

/// How much the members of a display group have in common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupCommonality {
    /// Mixed types, render members individually.
    None,
    /// Same type, different (or no) choice sets.
    Type,
    /// Same type and identical choice sets, render as a matrix.
    Choices,
    /// A run of CHECKBOX questions with identical choice sets.
    Checkbox,
    /// A run of DAYTIME questions, render as one ascending sequence.
    DaytimeSequence,
}

impl GroupCommonality {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupCommonality::None => "NONE",
            GroupCommonality::Type => "TYPE",
            GroupCommonality::Choices => "CHOICES",
            GroupCommonality::Checkbox => "CHECKBOX",
            GroupCommonality::DaytimeSequence => "DAYTIME_SEQUENCE",
        }
    }
}

/// Classify a display group. A leading HIDDEN member (a text slide
/// introducing the group) is skipped before comparing; the choices
/// comparison is order-sensitive.
pub fn classify_group(group: &[QuestionSpec]) -> GroupCommonality {
    if group.len() < 2 {
        return GroupCommonality::None;
    }

    let start = usize::from(group[0].kind == QuestionType::Hidden);
    let lead = &group[start];
    let lead_choices = lead
        .choices
        .as_ref()
        .filter(|choices| !choices.is_empty());

    let mut choices_differ = false;
    for member in &group[start..] {
        if member.kind != lead.kind {
            return GroupCommonality::None;
        }
        if let Some(expected) = lead_choices
            && member.choices.as_ref() != Some(expected)
        {
            choices_differ = true;
        }
    }

    if choices_differ {
        return GroupCommonality::Type;
    }

    match lead.kind {
        QuestionType::Daytime => GroupCommonality::DaytimeSequence,
        QuestionType::Checkbox => GroupCommonality::Checkbox,
        _ if lead_choices.is_some() => GroupCommonality::Choices,
        _ => GroupCommonality::Type,
    }
}
