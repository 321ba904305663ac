pub mod catalog;
pub mod provider;
pub mod rating;

use serde::{Deserialize, Serialize};

/// One answer option of a question. The score weight participates in rating
/// derivation only; it is never part of the transport shape handed to the
/// presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub id: u32,
    pub text: &'static str,
    pub weight: u8,
}

/// A question of the attitude-to-risk catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
    pub answers: Vec<AnswerOption>,
}

impl Question {
    pub fn to_view(&self) -> QuestionView {
        QuestionView {
            id: self.id.to_string(),
            text: self.text.to_string(),
            answers: self
                .answers
                .iter()
                .map(|answer| AnswerOptionView {
                    id: answer.id.to_string(),
                    text: answer.text.to_string(),
                })
                .collect(),
        }
    }
}

/// Presentation shape of a question. Identifiers are stringly typed at this
/// boundary; the embedded report script and the client both consume this
/// form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    pub answers: Vec<AnswerOptionView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerOptionView {
    pub id: String,
    pub text: String,
}

/// One user's chosen answer option for one question.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerSelection {
    #[serde(rename = "questionId")]
    pub question_id: u32,
    #[serde(rename = "responseId")]
    pub response_id: u32,
}

pub fn catalog_views(questions: &[Question]) -> Vec<QuestionView> {
    questions.iter().map(Question::to_view).collect()
}
