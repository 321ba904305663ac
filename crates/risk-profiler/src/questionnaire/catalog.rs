//! The built-in attitude-to-risk question catalog.
//!
//! Thirteen questions, each with a fixed set of answer options carrying a
//! score weight in 1..=5. Most questions list their riskiest option first;
//! questions 5, 9, 11 and 13 run the other way, and question 10 is a short
//! experience check. The weights feed the local rating derivation only.

use super::{AnswerOption, Question};
use std::sync::OnceLock;

fn question(id: u32, text: &'static str, options: &[(&'static str, u8)]) -> Question {
    Question {
        id,
        text,
        answers: options
            .iter()
            .enumerate()
            .map(|(index, &(text, weight))| AnswerOption {
                id: index as u32 + 1,
                text,
                weight,
            })
            .collect(),
    }
}

/// The catalog consumed when no upstream provider is configured. Question
/// ids are contiguous 1..=13 by convention, not by contract.
pub fn builtin() -> &'static [Question] {
    static CATALOG: OnceLock<Vec<Question>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        vec![
            question(
                1,
                "How would you describe your general attitude to financial risk?",
                &[
                    ("I see risk as an opportunity and actively seek it out", 5),
                    ("I am comfortable taking risks for higher rewards", 4),
                    ("I take a balanced view of risk and reward", 3),
                    ("I prefer to be cautious with my money", 2),
                    ("I avoid risk wherever possible", 1),
                ],
            ),
            question(
                2,
                "If the value of your investments fell by 20% in a year, what would you do?",
                &[
                    ("Invest more while prices are low", 5),
                    ("Do nothing and stay invested", 4),
                    ("Wait a while, then reconsider my options", 3),
                    ("Move some money into safer investments", 2),
                    ("Sell everything to prevent further losses", 1),
                ],
            ),
            question(
                3,
                "How long do you expect to keep your money invested before you need it?",
                &[
                    ("More than 20 years", 5),
                    ("Between 10 and 20 years", 4),
                    ("Between 5 and 10 years", 3),
                    ("Between 3 and 5 years", 2),
                    ("Less than 3 years", 1),
                ],
            ),
            question(
                4,
                "How much of your take-home income are you able to put aside for the long term?",
                &[
                    ("More than a quarter", 5),
                    ("Up to a quarter", 4),
                    ("Around a tenth", 3),
                    ("A small amount when I can", 2),
                    ("Nothing at the moment", 1),
                ],
            ),
            question(
                5,
                "How would you feel if the value of your investments changed frequently?",
                &[
                    ("Very anxious, I would lose sleep over it", 1),
                    ("Uncomfortable, I would check the value often", 2),
                    ("Accepting, as long as the long-term trend is up", 3),
                    ("Mostly relaxed, short-term moves don't worry me", 4),
                    ("Entirely relaxed, it's part of investing", 5),
                ],
            ),
            question(
                6,
                "Which statement best describes your investment experience?",
                &[
                    ("I have held a broad range of investments including higher-risk ones", 5),
                    ("I have held shares or funds for several years", 4),
                    ("I have held a few funds through a pension or ISA", 3),
                    ("I have only ever used savings accounts", 2),
                    ("I have no experience of investing at all", 1),
                ],
            ),
            question(
                7,
                "How secure do you consider your current and future income to be?",
                &[
                    ("Very secure, with income to spare", 5),
                    ("Secure, I could absorb a setback", 4),
                    ("Reasonably secure, with some uncertainty", 3),
                    ("Somewhat insecure", 2),
                    ("Not secure at all", 1),
                ],
            ),
            question(
                8,
                "What proportion of your savings would you be comfortable placing in higher-risk investments?",
                &[
                    ("More than three quarters", 5),
                    ("Around half", 4),
                    ("Around a quarter", 3),
                    ("A small slice only", 2),
                    ("None", 1),
                ],
            ),
            question(
                9,
                "How large a fall in the value of your investments could you accept without it affecting your way of life?",
                &[
                    ("No fall at all", 1),
                    ("Up to 5%", 2),
                    ("Up to 10%", 3),
                    ("Up to 25%", 4),
                    ("More than 25%", 5),
                ],
            ),
            question(
                10,
                "Have you invested in the stock market before?",
                &[
                    ("No, never", 1),
                    ("Yes, regularly", 5),
                    ("Yes, once or twice", 3),
                ],
            ),
            question(
                11,
                "When you hear the word 'risk' in a financial context, what comes to mind first?",
                &[
                    ("Danger", 1),
                    ("Uncertainty", 2),
                    ("Caution", 3),
                    ("Possibility", 4),
                    ("Opportunity", 5),
                ],
            ),
            question(
                12,
                "How would the people closest to you describe your approach to big financial decisions?",
                &[
                    ("A real gambler", 5),
                    ("Willing to take chances after research", 4),
                    ("Careful but open to persuasion", 3),
                    ("Cautious by nature", 2),
                    ("Someone who avoids risk entirely", 1),
                ],
            ),
            question(
                13,
                "If taking more risk meant a better chance of a comfortable retirement, would you take it?",
                &[
                    ("Definitely not", 1),
                    ("Probably not", 2),
                    ("I'm not sure", 3),
                    ("Probably", 4),
                    ("Definitely", 5),
                ],
            ),
        ]
    })
}

/// Canned answer sets over the built-in catalog, used by the preview CLI
/// and the test suites.
pub mod fixtures {
    use crate::questionnaire::AnswerSelection;

    fn selections(pairs: &[(u32, u32)]) -> Vec<AnswerSelection> {
        pairs
            .iter()
            .map(|(question_id, response_id)| AnswerSelection {
                question_id: *question_id,
                response_id: *response_id,
            })
            .collect()
    }

    /// All middle options, derives to rating 3.
    pub fn medium_risk_answers() -> Vec<AnswerSelection> {
        selections(&[
            (1, 3),
            (2, 3),
            (3, 3),
            (4, 3),
            (5, 3),
            (6, 3),
            (7, 3),
            (8, 3),
            (9, 3),
            (10, 3),
            (11, 3),
            (12, 3),
            (13, 3),
        ])
    }

    /// The riskiest option of every question, derives to rating 5.
    pub fn high_risk_answers() -> Vec<AnswerSelection> {
        selections(&[
            (1, 1),
            (2, 1),
            (3, 1),
            (4, 1),
            (5, 5),
            (6, 1),
            (7, 1),
            (8, 1),
            (9, 5),
            (10, 2),
            (11, 5),
            (12, 1),
            (13, 5),
        ])
    }

    /// The most conservative option of every question, derives to rating 1.
    pub fn low_risk_answers() -> Vec<AnswerSelection> {
        selections(&[
            (1, 5),
            (2, 5),
            (3, 5),
            (4, 5),
            (5, 1),
            (6, 5),
            (7, 5),
            (8, 5),
            (9, 1),
            (10, 1),
            (11, 1),
            (12, 5),
            (13, 1),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_thirteen_contiguous_questions() {
        let questions = builtin();
        assert_eq!(questions.len(), 13);
        for (index, question) in questions.iter().enumerate() {
            assert_eq!(question.id, index as u32 + 1);
        }
    }

    #[test]
    fn answer_ids_are_unique_within_each_question() {
        for question in builtin() {
            let mut ids: Vec<u32> = question.answers.iter().map(|a| a.id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), question.answers.len(), "question {}", question.id);
        }
    }

    #[test]
    fn weights_stay_in_rating_range() {
        for question in builtin() {
            for answer in &question.answers {
                assert!(
                    (1..=5).contains(&answer.weight),
                    "question {} answer {}",
                    question.id,
                    answer.id
                );
            }
        }
    }

    #[test]
    fn fixtures_reference_real_answer_options() {
        let questions = builtin();
        for fixture in [
            fixtures::low_risk_answers(),
            fixtures::medium_risk_answers(),
            fixtures::high_risk_answers(),
        ] {
            assert_eq!(fixture.len(), questions.len());
            for selection in fixture {
                let question = questions
                    .iter()
                    .find(|q| q.id == selection.question_id)
                    .expect("fixture question exists");
                assert!(
                    question.answers.iter().any(|a| a.id == selection.response_id),
                    "question {} has response {}",
                    selection.question_id,
                    selection.response_id
                );
            }
        }
    }
}
