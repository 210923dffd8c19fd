//! Vote recording.
//!
//! Every operation runs inside a transaction owned by the caller. A
//! submission from an identified user first takes an advisory lock on
//! (user, question) and then checks the revote cooldown, so concurrent
//! submissions for the same pair cannot both pass the check. Anonymous
//! submissions skip the cooldown and never touch block progress.

use crate::config::Cooldowns;
use crate::model::{
    self, CheckboxVote, OtherResponse, QuestionKind, SessionEntry, Vote,
    VoteOutcome,
};
use crate::postgres::{self, Transaction};
use crate::session::SessionStore;

#[derive(::thiserror::Error, Debug)]
pub enum VoteError {
    #[error("invalid option")]
    InvalidOption,
    #[error(transparent)]
    Storage(#[from] ::anyhow::Error),
}

#[derive(Debug)]
pub struct VoteReceipt {
    pub outcome: VoteOutcome,
    pub session_id: String,
    pub previous_responses: Vec<SessionEntry>,
}

/// Returns true when the user already voted on the question within the
/// cooldown window. Takes the (user, question) lock first.
async fn in_cooldown(
    transaction: &mut Transaction<'_>,
    kind: QuestionKind,
    uuid: Option<&str>,
    question_id: &str,
    cooldown: ::std::time::Duration,
) -> ::anyhow::Result<bool> {
    let uuid = match uuid {
        Some(uuid) => uuid,
        None => return Ok(false),
    };

    postgres::responses::lock_voter_question(transaction, uuid, question_id)
        .await?;

    postgres::responses::has_recent_vote(
        transaction,
        kind,
        uuid,
        question_id,
        cooldown,
    )
    .await
}

async fn update_block_progress(
    transaction: &mut Transaction<'_>,
    uuid: Option<&str>,
    question_id: &str,
) -> ::anyhow::Result<()> {
    let uuid = match uuid {
        Some(uuid) => uuid,
        None => return Ok(()),
    };

    if let Some(question) =
        postgres::questions::select_question(transaction, question_id).await?
    {
        crate::progress::record_if_complete(transaction, uuid, &question)
            .await?;
    }

    Ok(())
}

pub async fn submit_vote(
    transaction: &mut Transaction<'_>,
    vote: &Vote,
    cooldowns: &Cooldowns,
    sessions: &dyn SessionStore,
) -> Result<VoteReceipt, VoteError> {
    let uuid = vote.voter.user_id();

    let session_id = vote
        .session_id
        .clone()
        .filter(|session_id| !session_id.is_empty())
        .unwrap_or_else(|| ::uuid::Uuid::new_v4().to_string());

    if in_cooldown(
        transaction,
        QuestionKind::Single,
        uuid,
        &vote.question_id,
        cooldowns.question,
    )
    .await?
    {
        return Ok(VoteReceipt {
            outcome: VoteOutcome::AlreadyVoted,
            session_id,
            previous_responses: vec![],
        });
    }

    postgres::users::ensure_voter(transaction, &vote.voter).await?;

    let outcome = if model::is_other_code(&vote.option_code) {
        VoteOutcome::OtherNeeded
    } else {
        let option = postgres::questions::select_option(
            transaction,
            &vote.question_id,
            &vote.option_code,
        )
        .await?
        .ok_or(VoteError::InvalidOption)?;

        postgres::responses::insert_vote(
            transaction,
            QuestionKind::Single,
            &vote.question_id,
            option.id,
            &option.option_code,
            uuid,
        )
        .await?;

        update_block_progress(transaction, uuid, &vote.question_id).await?;

        VoteOutcome::Recorded
    };

    let previous_responses = sessions
        .append(
            &session_id,
            SessionEntry {
                question_id: vote.question_id.clone(),
                option_code: vote.option_code.clone(),
            },
        )
        .await?;

    Ok(VoteReceipt {
        outcome,
        session_id,
        previous_responses,
    })
}

/// Codes that do not resolve to an option of the question are skipped.
pub async fn submit_checkbox_vote(
    transaction: &mut Transaction<'_>,
    vote: &CheckboxVote,
    cooldowns: &Cooldowns,
) -> ::anyhow::Result<VoteOutcome> {
    let uuid = vote.voter.user_id();

    if in_cooldown(
        transaction,
        QuestionKind::Multi,
        uuid,
        &vote.question_id,
        cooldowns.question,
    )
    .await?
    {
        return Ok(VoteOutcome::AlreadyVoted);
    }

    postgres::users::ensure_voter(transaction, &vote.voter).await?;

    for option_code in vote.option_codes.iter() {
        match postgres::questions::select_option(
            transaction,
            &vote.question_id,
            option_code,
        )
        .await?
        {
            Some(option) => {
                postgres::responses::insert_vote(
                    transaction,
                    QuestionKind::Multi,
                    &vote.question_id,
                    option.id,
                    &option.option_code,
                    uuid,
                )
                .await?
            }
            None => ::log::debug!(
                "skipping unknown option {} for question {}",
                option_code,
                vote.question_id
            ),
        }
    }

    let other_text = vote
        .other_text
        .as_deref()
        .map(str::trim)
        .filter(|other_text| !other_text.is_empty());

    if let Some(other_text) = other_text {
        if vote.option_codes.iter().any(|code| model::is_other_code(code)) {
            let question_text = postgres::questions::select_question(
                transaction,
                &vote.question_id,
            )
            .await?
            .map(|question| question.question_text)
            .unwrap_or_default();

            postgres::responses::insert_other_response(
                transaction,
                &vote.question_id,
                &question_text,
                other_text,
                uuid,
            )
            .await?;
        }
    }

    update_block_progress(transaction, uuid, &vote.question_id).await?;

    Ok(VoteOutcome::Recorded)
}

/// No cooldown applies to free-text answers.
pub async fn submit_other_response(
    transaction: &mut Transaction<'_>,
    response: &OtherResponse,
) -> ::anyhow::Result<()> {
    postgres::users::ensure_voter(transaction, &response.voter).await?;

    postgres::responses::insert_other_response(
        transaction,
        &response.question_id,
        &response.question_text,
        &response.other_text,
        response.voter.user_id(),
    )
    .await
}
