pub(crate) async fn handler(
    question_id: String,
    option_code: String,
    state: ::std::sync::Arc<crate::State>,
) -> Result<Box<dyn ::warp::Reply>, ::std::convert::Infallible> {
    Ok(crate::warp_try_err_500!(
        handler_inner(state, question_id, option_code).await
    ))
}

async fn handler_inner(
    state: ::std::sync::Arc<crate::State>,
    question_id: String,
    option_code: String,
) -> ::anyhow::Result<Box<dyn ::warp::Reply>> {
    let mut transaction = state.pool.begin().await?;

    let next = match crate::postgres::questions::select_next_question(
        &mut transaction,
        &question_id,
        &option_code,
    )
    .await?
    {
        Some(question) => {
            let options = crate::postgres::questions::select_options(
                &mut transaction,
                &question.question_id,
            )
            .await?;
            Some(crate::model::QuestionView::new(question, options))
        }
        None => None,
    };

    transaction.commit().await?;

    Ok(super::util::ok_json(&::serde_json::json!({
        "next_question": next,
    })))
}
