use crate::progress::NextBlock;

pub(crate) async fn handler(
    category_id: i32,
    state: ::std::sync::Arc<crate::State>,
    query: super::util::UserQuery,
) -> Result<Box<dyn ::warp::Reply>, ::std::convert::Infallible> {
    Ok(crate::warp_try_err_500!(
        handler_inner(state, category_id, query.uuid).await
    ))
}

async fn handler_inner(
    state: ::std::sync::Arc<crate::State>,
    category_id: i32,
    uuid: String,
) -> ::anyhow::Result<Box<dyn ::warp::Reply>> {
    let mut transaction = state.pool.begin().await?;

    let next = crate::progress::next_available_block(
        &mut transaction,
        category_id,
        &uuid,
        state.cooldowns.block,
    )
    .await?;

    transaction.commit().await?;

    Ok(match next {
        NextBlock::Available(block) => {
            super::util::ok_json(&::serde_json::json!({ "block": block }))
        }
        NextBlock::AllCoolingDown => {
            super::util::ok_json(&::serde_json::json!({
                "block": null,
                "message": "No available blocks. Come back later!",
            }))
        }
        NextBlock::NoBlocks => {
            super::util::not_found("No blocks found for this category")
        }
    })
}
