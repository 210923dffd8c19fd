use ::warp::Reply;

/// Reports whether the database answers. Failure details are logged and
/// not returned to the caller.
pub(crate) async fn handler(
    state: ::std::sync::Arc<crate::State>,
) -> Result<::warp::reply::Response, ::std::convert::Infallible> {
    let body = match handler_inner(&state).await {
        Ok(category_count) => ::serde_json::json!({
            "status": "ok",
            "category_count": category_count,
        }),
        Err(err) => {
            ::log::error!("database status check failed: {:?}", err);
            ::serde_json::json!({ "status": "error" })
        }
    };

    Ok(::warp::reply::json(&body).into_response())
}

async fn handler_inner(state: &crate::State) -> ::anyhow::Result<i64> {
    let mut transaction = state.pool.begin().await?;

    let count =
        crate::postgres::questions::count_categories(&mut transaction).await?;

    transaction.commit().await?;

    Ok(count)
}
