pub(crate) async fn handler(
    category_id: String,
    state: ::std::sync::Arc<crate::State>,
) -> Result<Box<dyn ::warp::Reply>, ::std::convert::Infallible> {
    let category_id = crate::warp_try_err_400!(
        super::util::parse_category_filter(&category_id)
    );

    Ok(crate::warp_try_err_500!(handler_inner(state, category_id).await))
}

async fn handler_inner(
    state: ::std::sync::Arc<crate::State>,
    category_id: Option<i32>,
) -> ::anyhow::Result<Box<dyn ::warp::Reply>> {
    let mut transaction = state.pool.begin().await?;

    let question = match crate::postgres::questions::select_start_question(
        &mut transaction,
        category_id,
    )
    .await?
    {
        Some(question) => question,
        None => {
            return Ok(super::util::not_found(
                "No start question found for this category",
            ))
        }
    };

    let options = crate::postgres::questions::select_options(
        &mut transaction,
        &question.question_id,
    )
    .await?;

    transaction.commit().await?;

    Ok(super::util::ok_json(&crate::model::QuestionView::new(
        question, options,
    )))
}
