//! Block progress tracking.
//!
//! A block is complete for a user once every question in it has at least
//! one recorded vote from that user in the table matching the question's
//! kind. A block with no questions is never complete. Completed blocks
//! stay unavailable until the block cooldown has elapsed.

use ::std::collections::HashSet;

use crate::postgres::{self, Transaction};

pub fn block_complete(answered: &[bool]) -> bool {
    !answered.is_empty() && answered.iter().all(|answered| *answered)
}

pub fn first_available_block(
    blocks: &[i32],
    cooling_down: &HashSet<i32>,
) -> Option<i32> {
    blocks
        .iter()
        .copied()
        .find(|block| !cooling_down.contains(block))
}

#[derive(Debug, PartialEq)]
pub enum NextBlock {
    Available(i32),
    AllCoolingDown,
    NoBlocks,
}

pub async fn is_block_complete(
    transaction: &mut Transaction<'_>,
    uuid: &str,
    category_id: i32,
    block_number: i32,
) -> ::anyhow::Result<bool> {
    let questions = postgres::block_progress::select_block_questions(
        transaction,
        category_id,
        block_number,
    )
    .await?;

    let mut answered = Vec::with_capacity(questions.len());

    for question in questions.iter() {
        answered.push(
            postgres::responses::has_vote(
                transaction,
                question.kind(),
                uuid,
                &question.question_id,
            )
            .await?,
        );
    }

    Ok(block_complete(&answered))
}

/// Idempotent; a repeated call refreshes the completion timestamp.
pub async fn mark_complete(
    transaction: &mut Transaction<'_>,
    uuid: &str,
    category_id: i32,
    block_number: i32,
) -> ::anyhow::Result<()> {
    postgres::block_progress::upsert_completion(
        transaction,
        uuid,
        category_id,
        block_number,
    )
    .await
}

/// Called after a vote has been recorded. Returns whether the block
/// containing `question` is now complete for `uuid`.
pub async fn record_if_complete(
    transaction: &mut Transaction<'_>,
    uuid: &str,
    question: &crate::model::QuestionRow,
) -> ::anyhow::Result<bool> {
    let block_number = match question.block_number {
        Some(block_number) => block_number,
        None => return Ok(false),
    };

    if !is_block_complete(transaction, uuid, question.category_id, block_number)
        .await?
    {
        return Ok(false);
    }

    mark_complete(transaction, uuid, question.category_id, block_number)
        .await?;

    ::log::debug!(
        "user {} completed block {} of category {}",
        uuid,
        block_number,
        question.category_id
    );

    Ok(true)
}

pub async fn next_available_block(
    transaction: &mut Transaction<'_>,
    category_id: i32,
    uuid: &str,
    cooldown: ::std::time::Duration,
) -> ::anyhow::Result<NextBlock> {
    let blocks = postgres::questions::select_question_block_numbers(
        transaction,
        category_id,
    )
    .await?;

    if blocks.is_empty() {
        return Ok(NextBlock::NoBlocks);
    }

    let cooling_down: HashSet<i32> =
        postgres::block_progress::select_blocks_in_cooldown(
            transaction,
            uuid,
            category_id,
            cooldown,
        )
        .await?
        .into_iter()
        .collect();

    Ok(match first_available_block(&blocks, &cooling_down) {
        Some(block) => NextBlock::Available(block),
        None => NextBlock::AllCoolingDown,
    })
}
