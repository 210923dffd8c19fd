use crate::model::VoteOutcome;
use crate::vote::VoteError;

pub(crate) async fn handler(
    state: ::std::sync::Arc<crate::State>,
    vote: crate::model::Vote,
) -> Result<Box<dyn ::warp::Reply>, ::std::convert::Infallible> {
    Ok(crate::warp_try_err_500!(handler_inner(state, vote).await))
}

async fn handler_inner(
    state: ::std::sync::Arc<crate::State>,
    vote: crate::model::Vote,
) -> ::anyhow::Result<Box<dyn ::warp::Reply>> {
    let mut transaction = state.pool.begin().await?;

    let receipt = match crate::vote::submit_vote(
        &mut transaction,
        &vote,
        &state.cooldowns,
        state.sessions.as_ref(),
    )
    .await
    {
        Ok(receipt) => receipt,
        Err(VoteError::InvalidOption) => {
            return Ok(super::util::json_with_status(
                &::serde_json::json!({ "detail": "Invalid option" }),
                ::warp::http::StatusCode::BAD_REQUEST,
            ));
        }
        Err(VoteError::Storage(err)) => return Err(err),
    };

    transaction.commit().await?;

    Ok(super::util::ok_json(&match receipt.outcome {
        VoteOutcome::AlreadyVoted => ::serde_json::json!({
            "status": receipt.outcome.status(),
            "message": super::util::already_voted_message(&state.cooldowns),
        }),
        _ => ::serde_json::json!({
            "status": receipt.outcome.status(),
            "session_id": receipt.session_id,
            "previous_responses": receipt.previous_responses,
        }),
    }))
}
