pub(crate) async fn handler(
    category_id: i32,
    state: ::std::sync::Arc<crate::State>,
) -> Result<Box<dyn ::warp::Reply>, ::std::convert::Infallible> {
    Ok(crate::warp_try_err_500!(handler_inner(state, category_id).await))
}

async fn handler_inner(
    state: ::std::sync::Arc<crate::State>,
    category_id: i32,
) -> ::anyhow::Result<Box<dyn ::warp::Reply>> {
    let mut transaction = state.pool.begin().await?;

    let blocks =
        crate::postgres::questions::select_blocks(&mut transaction, category_id)
            .await?;

    transaction.commit().await?;

    if blocks.is_empty() {
        return Ok(super::util::not_found("No blocks found for this category"));
    }

    Ok(super::util::ok_json(&blocks))
}
