#[derive(::serde::Deserialize)]
pub(crate) struct Query {
    category_id: Option<String>,
    block: Option<i32>,
}

pub(crate) async fn handler(
    state: ::std::sync::Arc<crate::State>,
    query: Query,
) -> Result<Box<dyn ::warp::Reply>, ::std::convert::Infallible> {
    let category_id = match query.category_id.as_deref() {
        Some(category_id) => {
            crate::warp_try_err_400!(super::util::parse_category_filter(
                category_id
            ))
        }
        None => None,
    };

    Ok(crate::warp_try_err_500!(
        handler_inner(state, category_id, query.block).await
    ))
}

async fn handler_inner(
    state: ::std::sync::Arc<crate::State>,
    category_id: Option<i32>,
    block: Option<i32>,
) -> ::anyhow::Result<Box<dyn ::warp::Reply>> {
    let mut transaction = state.pool.begin().await?;

    let questions = crate::postgres::questions::select_questions(
        &mut transaction,
        category_id,
        block,
    )
    .await?;

    let mut views = Vec::with_capacity(questions.len());

    for question in questions.into_iter() {
        let options = crate::postgres::questions::select_options(
            &mut transaction,
            &question.question_id,
        )
        .await?;

        views.push(crate::model::QuestionView::new(question, options));
    }

    transaction.commit().await?;

    if views.is_empty() {
        return Ok(super::util::not_found("No questions found"));
    }

    Ok(super::util::ok_json(&views))
}
