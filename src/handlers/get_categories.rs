pub(crate) async fn handler(
    state: ::std::sync::Arc<crate::State>,
) -> Result<Box<dyn ::warp::Reply>, ::std::convert::Infallible> {
    Ok(crate::warp_try_err_500!(handler_inner(state).await))
}

async fn handler_inner(
    state: ::std::sync::Arc<crate::State>,
) -> ::anyhow::Result<Box<dyn ::warp::Reply>> {
    let mut transaction = state.pool.begin().await?;

    let categories =
        crate::postgres::questions::select_categories(&mut transaction).await?;

    transaction.commit().await?;

    Ok(super::util::ok_json(&categories))
}
