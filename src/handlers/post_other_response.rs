pub(crate) async fn handler(
    state: ::std::sync::Arc<crate::State>,
    response: crate::model::OtherResponse,
) -> Result<Box<dyn ::warp::Reply>, ::std::convert::Infallible> {
    Ok(crate::warp_try_err_500!(handler_inner(state, response).await))
}

async fn handler_inner(
    state: ::std::sync::Arc<crate::State>,
    response: crate::model::OtherResponse,
) -> ::anyhow::Result<Box<dyn ::warp::Reply>> {
    let mut transaction = state.pool.begin().await?;

    crate::vote::submit_other_response(&mut transaction, &response).await?;

    transaction.commit().await?;

    Ok(super::util::ok_json(&::serde_json::json!({ "status": "success" })))
}
