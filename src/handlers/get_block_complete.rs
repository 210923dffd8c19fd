pub(crate) async fn handler(
    category_id: i32,
    block_number: i32,
    state: ::std::sync::Arc<crate::State>,
    query: super::util::UserQuery,
) -> Result<Box<dyn ::warp::Reply>, ::std::convert::Infallible> {
    Ok(crate::warp_try_err_500!(
        handler_inner(state, category_id, block_number, query.uuid).await
    ))
}

async fn handler_inner(
    state: ::std::sync::Arc<crate::State>,
    category_id: i32,
    block_number: i32,
    uuid: String,
) -> ::anyhow::Result<Box<dyn ::warp::Reply>> {
    let mut transaction = state.pool.begin().await?;

    let complete = crate::progress::is_block_complete(
        &mut transaction,
        &uuid,
        category_id,
        block_number,
    )
    .await?;

    transaction.commit().await?;

    Ok(super::util::ok_json(&::serde_json::json!({
        "category_id": category_id,
        "block": block_number,
        "complete": complete,
    })))
}
