use crate::model::{Block, Category, OptionRow, QuestionRow};

const SELECT_QUESTION: &str = "
    SELECT
        q.id,
        q.question_id,
        q.question_number,
        q.question_text,
        q.category_id,
        c.category_name,
        q.is_start_question,
        q.parent_question_id,
        q.check_box,
        q.block_number,
        q.color_code
    FROM questions q
    LEFT JOIN categories c ON q.category_id = c.id
";

pub async fn select_categories(
    transaction: &mut super::Transaction<'_>,
) -> ::anyhow::Result<Vec<Category>> {
    let query = "
        SELECT id, category_name, category_text, category_text_long
        FROM categories
        ORDER BY id
    ";

    Ok(::sqlx::query_as::<_, Category>(query)
        .fetch_all(&mut **transaction)
        .await?)
}

pub async fn count_categories(
    transaction: &mut super::Transaction<'_>,
) -> ::anyhow::Result<i64> {
    Ok(::sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
        .fetch_one(&mut **transaction)
        .await?)
}

pub async fn select_question(
    transaction: &mut super::Transaction<'_>,
    question_id: &str,
) -> ::anyhow::Result<Option<QuestionRow>> {
    let query = format!("{} WHERE q.question_id = $1", SELECT_QUESTION);

    Ok(::sqlx::query_as::<_, QuestionRow>(&query)
        .bind(question_id)
        .fetch_optional(&mut **transaction)
        .await?)
}

/// `None` filters are ignored; questions come back in display order.
pub async fn select_questions(
    transaction: &mut super::Transaction<'_>,
    category_id: Option<i32>,
    block_number: Option<i32>,
) -> ::anyhow::Result<Vec<QuestionRow>> {
    let query = format!(
        "{}
        WHERE ($1::INT4 IS NULL OR q.category_id = $1)
        AND   ($2::INT4 IS NULL OR q.block_number = $2)
        ORDER BY q.question_number, q.id",
        SELECT_QUESTION
    );

    Ok(::sqlx::query_as::<_, QuestionRow>(&query)
        .bind(category_id)
        .bind(block_number)
        .fetch_all(&mut **transaction)
        .await?)
}

pub async fn select_start_question(
    transaction: &mut super::Transaction<'_>,
    category_id: Option<i32>,
) -> ::anyhow::Result<Option<QuestionRow>> {
    let query = format!(
        "{}
        WHERE q.is_start_question = TRUE
        AND   ($1::INT4 IS NULL OR q.category_id = $1)
        ORDER BY CASE WHEN $1::INT4 IS NULL THEN RANDOM() ELSE q.id END
        LIMIT 1",
        SELECT_QUESTION
    );

    Ok(::sqlx::query_as::<_, QuestionRow>(&query)
        .bind(category_id)
        .fetch_optional(&mut **transaction)
        .await?)
}

pub async fn select_options(
    transaction: &mut super::Transaction<'_>,
    question_id: &str,
) -> ::anyhow::Result<Vec<OptionRow>> {
    let query = "
        SELECT
            id,
            option_text,
            option_code,
            response_message,
            companion_advice,
            next_question_id
        FROM options
        WHERE question_id = $1
        ORDER BY option_code
    ";

    Ok(::sqlx::query_as::<_, OptionRow>(query)
        .bind(question_id)
        .fetch_all(&mut **transaction)
        .await?)
}

pub async fn select_option(
    transaction: &mut super::Transaction<'_>,
    question_id: &str,
    option_code: &str,
) -> ::anyhow::Result<Option<OptionRow>> {
    let query = "
        SELECT
            id,
            option_text,
            option_code,
            response_message,
            companion_advice,
            next_question_id
        FROM options
        WHERE question_id = $1
        AND   option_code = $2
    ";

    Ok(::sqlx::query_as::<_, OptionRow>(query)
        .bind(question_id)
        .bind(option_code)
        .fetch_optional(&mut **transaction)
        .await?)
}

/// Follows an option's routing edge. Dangling edges resolve to `None`.
pub async fn select_next_question(
    transaction: &mut super::Transaction<'_>,
    question_id: &str,
    option_code: &str,
) -> ::anyhow::Result<Option<QuestionRow>> {
    let next_question_id =
        match select_option(transaction, question_id, option_code).await? {
            Some(OptionRow {
                next_question_id: Some(next_question_id),
                ..
            }) if !next_question_id.is_empty() => next_question_id,
            _ => return Ok(None),
        };

    select_question(transaction, &next_question_id).await
}

pub async fn select_blocks(
    transaction: &mut super::Transaction<'_>,
    category_id: i32,
) -> ::anyhow::Result<Vec<Block>> {
    let query = "
        SELECT id, category_id, block_number, block_text, version, uuid
        FROM blocks
        WHERE category_id = $1
        ORDER BY block_number
    ";

    let blocks = ::sqlx::query_as::<_, Block>(query)
        .bind(category_id)
        .fetch_all(&mut **transaction)
        .await?;

    if !blocks.is_empty() {
        return Ok(blocks);
    }

    Ok(select_question_block_numbers(transaction, category_id)
        .await?
        .into_iter()
        .map(|block_number| Block {
            id: None,
            category_id,
            block_number,
            block_text: Some(format!("Block {}", block_number)),
            version: None,
            uuid: None,
        })
        .collect())
}

/// Distinct block numbers used by a category's questions, ascending.
pub async fn select_question_block_numbers(
    transaction: &mut super::Transaction<'_>,
    category_id: i32,
) -> ::anyhow::Result<Vec<i32>> {
    let query = "
        SELECT DISTINCT block_number
        FROM questions
        WHERE category_id = $1
        AND   block_number IS NOT NULL
        ORDER BY block_number
    ";

    Ok(::sqlx::query_scalar::<_, i32>(query)
        .bind(category_id)
        .fetch_all(&mut **transaction)
        .await?)
}
