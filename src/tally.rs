//! Result aggregation.
//!
//! Single-select votes count one each. Checkbox votes from an identified
//! user are split evenly across the distinct codes that user selected, so
//! every identified user contributes exactly 1.0 per question. Anonymous
//! checkbox rows are not split and contribute 1.0 per selected code.

use ::std::collections::{HashMap, HashSet};

use crate::model::{self, OptionRow, QuestionKind};
use crate::postgres::{self, responses::CheckboxVoteRow, Transaction};

#[derive(::serde::Serialize, Clone, Debug, PartialEq)]
pub struct OptionResult {
    pub text: String,
    pub code: String,
    pub count: f64,
}

#[derive(::serde::Serialize, Clone, Debug, PartialEq)]
pub struct QuestionResults {
    pub results: Vec<OptionResult>,
    pub custom_responses: Vec<String>,
}

pub enum Ballots {
    Single(Vec<(String, i64)>),
    Multi(Vec<CheckboxVoteRow>),
}

/// Exact ties round to the even hundredth, so 0.125 becomes 0.12.
fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

fn weigh_single(counts: &[(String, i64)]) -> HashMap<String, f64> {
    let mut weights = HashMap::new();
    for (code, count) in counts.iter() {
        *weights.entry(code.clone()).or_insert(0.0) += *count as f64;
    }
    weights
}

fn weigh_checkbox(votes: &[CheckboxVoteRow]) -> HashMap<String, f64> {
    let mut weights: HashMap<String, f64> = HashMap::new();
    let mut selections: HashMap<&str, HashSet<&str>> = HashMap::new();

    for vote in votes.iter() {
        match model::identified_user(vote.uuid.as_deref()) {
            Some(uuid) => {
                selections
                    .entry(uuid)
                    .or_default()
                    .insert(vote.option_code.as_str());
            }
            None => {
                *weights.entry(vote.option_code.clone()).or_insert(0.0) += 1.0;
            }
        }
    }

    for codes in selections.values() {
        let weight = 1.0 / codes.len() as f64;
        for code in codes.iter() {
            *weights.entry(code.to_string()).or_insert(0.0) += weight;
        }
    }

    weights
}

/// Every option appears in the output in the order given, even with a
/// zero count. Votes for codes that are no longer options are ignored.
pub fn tally(
    options: &[OptionRow],
    ballots: &Ballots,
    custom_responses: Vec<String>,
) -> QuestionResults {
    let weights = match ballots {
        Ballots::Single(counts) => weigh_single(counts),
        Ballots::Multi(votes) => weigh_checkbox(votes),
    };

    let results = options
        .iter()
        .map(|option| {
            let count = match ballots {
                Ballots::Single(_) if model::is_other_code(&option.option_code) => {
                    custom_responses.len() as f64
                }
                _ => weights.get(&option.option_code).copied().unwrap_or(0.0),
            };

            OptionResult {
                text: option.option_text.clone(),
                code: option.option_code.clone(),
                count: round_to_hundredths(count),
            }
        })
        .collect();

    QuestionResults {
        results,
        custom_responses,
    }
}

/// `None` when no question has the given id.
pub async fn question_results(
    transaction: &mut Transaction<'_>,
    question_id: &str,
) -> ::anyhow::Result<Option<QuestionResults>> {
    let question =
        match postgres::questions::select_question(transaction, question_id)
            .await?
        {
            Some(question) => question,
            None => return Ok(None),
        };

    let options =
        postgres::questions::select_options(transaction, question_id).await?;

    let ballots = match question.kind() {
        QuestionKind::Single => Ballots::Single(
            postgres::responses::count_single_votes(transaction, question_id)
                .await?,
        ),
        QuestionKind::Multi => Ballots::Multi(
            postgres::responses::select_checkbox_votes(transaction, question_id)
                .await?,
        ),
    };

    let custom_responses =
        postgres::responses::select_other_texts(transaction, question_id)
            .await?;

    Ok(Some(tally(&options, &ballots, custom_responses)))
}
