//! Risk-rating derivation.
//!
//! The production score belongs to the upstream provider; this module holds
//! the deterministic local aggregation used when the service runs against
//! the built-in catalog, plus the fixed band table the report renders from.

use super::{AnswerSelection, Question};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Integer 1..=5 summarizing risk tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RiskRating(u8);

/// The immutable label/description triple for one rating band. The strings
/// are a de facto public contract; conformance tests match them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskBand {
    pub label: &'static str,
    pub short_label: &'static str,
    pub description: &'static str,
}

pub const RISK_BANDS: [RiskBand; 5] = [
    RiskBand {
        label: "Lower",
        short_label: "Lower",
        description: "You're likely to be more conservative with your investments and understand that there may be some short-term changes in value to get potentially modest or relatively stable returns.",
    },
    RiskBand {
        label: "Lower-Medium",
        short_label: "Lower-Med",
        description: "You're relatively cautious with your investments. You want the potential of getting reasonable long-term returns and are prepared to accept some risk in doing so. You understand there may be some frequent but small changes in value.",
    },
    RiskBand {
        label: "Medium",
        short_label: "Medium",
        description: "You have a balanced approach to risk. You don't look for risky investments, but you don't avoid them either. You're prepared to accept fluctuations in the value of your investments to try and get potentially better long-term returns. You understand that the value of your investments might change frequently and sometimes significantly.",
    },
    RiskBand {
        label: "Medium-Higher",
        short_label: "Med-Higher",
        description: "You're comfortable taking some investment risk to get potentially better higher long-term returns, even if that means there might be times when you're getting potentially lower returns. You understand the value of your investments are likely to change frequently and often significantly.",
    },
    RiskBand {
        label: "Higher",
        short_label: "Higher",
        description: "You're very comfortable taking investment risk. You're aiming for potentially high long-term returns and are less concerned if the value of your investments go up and down over the short or medium term. You understand that the value of your investments is likely to change very frequently and significantly.",
    },
];

impl RiskRating {
    pub fn new(value: u8) -> Option<Self> {
        (1..=5).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn band(self) -> &'static RiskBand {
        &RISK_BANDS[self.0 as usize - 1]
    }
}

impl fmt::Display for RiskRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("no answer supplied for question {question_id}")]
    MissingAnswer { question_id: u32 },
    #[error("more than one answer supplied for question {question_id}")]
    DuplicateAnswer { question_id: u32 },
    #[error("answer supplied for unknown question {question_id}")]
    UnknownQuestion { question_id: u32 },
    #[error("question {question_id} has no answer option {response_id}")]
    UnknownResponse { question_id: u32, response_id: u32 },
}

/// Derive a rating from one selection per catalog question.
///
/// Pure and idempotent: the mean of the selected option weights, rounded
/// half away from zero and clamped to 1..=5. Selections may arrive in any
/// order; exactly one per question is required.
pub fn derive_rating(
    catalog: &[Question],
    selections: &[AnswerSelection],
) -> Result<RiskRating, RatingError> {
    let mut seen = HashSet::new();
    for selection in selections {
        if !seen.insert(selection.question_id) {
            return Err(RatingError::DuplicateAnswer {
                question_id: selection.question_id,
            });
        }
        if !catalog.iter().any(|q| q.id == selection.question_id) {
            return Err(RatingError::UnknownQuestion {
                question_id: selection.question_id,
            });
        }
    }

    let mut total: u32 = 0;
    for question in catalog {
        let selection = selections
            .iter()
            .find(|s| s.question_id == question.id)
            .ok_or(RatingError::MissingAnswer {
                question_id: question.id,
            })?;

        let answer = question
            .answers
            .iter()
            .find(|a| a.id == selection.response_id)
            .ok_or(RatingError::UnknownResponse {
                question_id: question.id,
                response_id: selection.response_id,
            })?;

        total += u32::from(answer.weight);
    }

    let mean = f64::from(total) / catalog.len() as f64;
    let value = (mean.round() as u8).clamp(1, 5);
    Ok(RiskRating(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::catalog::{builtin, fixtures};

    #[test]
    fn band_table_matches_published_labels() {
        let rating = RiskRating::new(3).expect("3 is in range");
        assert_eq!(rating.band().label, "Medium");
        assert_eq!(rating.band().short_label, "Medium");
        assert!(rating.band().description.contains("balanced approach"));

        assert_eq!(RISK_BANDS[0].label, "Lower");
        assert_eq!(RISK_BANDS[4].label, "Higher");
        assert_eq!(RISK_BANDS[1].short_label, "Lower-Med");
        assert_eq!(RISK_BANDS[3].short_label, "Med-Higher");
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(RiskRating::new(0).is_none());
        assert!(RiskRating::new(6).is_none());
    }

    #[test]
    fn medium_fixture_derives_to_three() {
        let rating = derive_rating(builtin(), &fixtures::medium_risk_answers())
            .expect("fixture covers every question");
        assert_eq!(rating.value(), 3);
    }

    #[test]
    fn low_fixture_derives_to_one() {
        let rating = derive_rating(builtin(), &fixtures::low_risk_answers())
            .expect("fixture covers every question");
        assert_eq!(rating.value(), 1);
    }

    #[test]
    fn high_fixture_derives_to_five() {
        let rating = derive_rating(builtin(), &fixtures::high_risk_answers())
            .expect("fixture covers every question");
        assert_eq!(rating.value(), 5);
    }

    #[test]
    fn selection_order_does_not_matter() {
        let mut shuffled = fixtures::medium_risk_answers();
        shuffled.reverse();
        let rating = derive_rating(builtin(), &shuffled).expect("order is irrelevant");
        assert_eq!(rating.value(), 3);
    }

    #[test]
    fn missing_answer_names_the_absent_question() {
        let mut selections = fixtures::medium_risk_answers();
        selections.retain(|s| s.question_id != 8);
        let err = derive_rating(builtin(), &selections).expect_err("question 8 unanswered");
        assert_eq!(err, RatingError::MissingAnswer { question_id: 8 });
    }

    #[test]
    fn duplicate_answer_is_rejected() {
        let mut selections = fixtures::medium_risk_answers();
        selections.push(crate::questionnaire::AnswerSelection {
            question_id: 2,
            response_id: 4,
        });
        let err = derive_rating(builtin(), &selections).expect_err("question 2 duplicated");
        assert_eq!(err, RatingError::DuplicateAnswer { question_id: 2 });
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut selections = fixtures::medium_risk_answers();
        selections[0].question_id = 99;
        let err = derive_rating(builtin(), &selections).expect_err("question 99 unknown");
        assert_eq!(err, RatingError::UnknownQuestion { question_id: 99 });

        let mut selections = fixtures::medium_risk_answers();
        selections[0].response_id = 42;
        let err = derive_rating(builtin(), &selections).expect_err("response 42 unknown");
        assert_eq!(
            err,
            RatingError::UnknownResponse {
                question_id: 1,
                response_id: 42
            }
        );
    }

    #[test]
    fn derivation_is_idempotent() {
        let selections = fixtures::high_risk_answers();
        let first = derive_rating(builtin(), &selections).expect("derives");
        let second = derive_rating(builtin(), &selections).expect("derives again");
        assert_eq!(first, second);
    }
}
