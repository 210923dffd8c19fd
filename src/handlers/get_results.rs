pub(crate) async fn handler(
    question_id: String,
    state: ::std::sync::Arc<crate::State>,
) -> Result<Box<dyn ::warp::Reply>, ::std::convert::Infallible> {
    Ok(crate::warp_try_err_500!(handler_inner(state, question_id).await))
}

async fn handler_inner(
    state: ::std::sync::Arc<crate::State>,
    question_id: String,
) -> ::anyhow::Result<Box<dyn ::warp::Reply>> {
    let mut transaction = state.pool.begin().await?;

    let results =
        crate::tally::question_results(&mut transaction, &question_id).await?;

    transaction.commit().await?;

    match results {
        Some(results) => Ok(super::util::ok_json(&results)),
        None => Ok(super::util::not_found("Question not found")),
    }
}
