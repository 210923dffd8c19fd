use crate::model::VoteOutcome;

pub(crate) async fn handler(
    state: ::std::sync::Arc<crate::State>,
    vote: crate::model::CheckboxVote,
) -> Result<Box<dyn ::warp::Reply>, ::std::convert::Infallible> {
    Ok(crate::warp_try_err_500!(handler_inner(state, vote).await))
}

async fn handler_inner(
    state: ::std::sync::Arc<crate::State>,
    vote: crate::model::CheckboxVote,
) -> ::anyhow::Result<Box<dyn ::warp::Reply>> {
    let mut transaction = state.pool.begin().await?;

    let outcome = crate::vote::submit_checkbox_vote(
        &mut transaction,
        &vote,
        &state.cooldowns,
    )
    .await?;

    transaction.commit().await?;

    Ok(super::util::ok_json(&match outcome {
        VoteOutcome::AlreadyVoted => ::serde_json::json!({
            "status": outcome.status(),
            "message": super::util::already_voted_message(&state.cooldowns),
        }),
        _ => ::serde_json::json!({ "status": outcome.status() }),
    }))
}
