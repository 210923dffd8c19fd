use crate::model::QuestionKind;

#[derive(::sqlx::FromRow, Clone, Debug)]
pub struct BlockQuestionRow {
    pub question_id: String,
    pub check_box: bool,
}

impl BlockQuestionRow {
    pub fn kind(&self) -> QuestionKind {
        QuestionKind::from_check_box(self.check_box)
    }
}

pub async fn select_block_questions(
    transaction: &mut super::Transaction<'_>,
    category_id: i32,
    block_number: i32,
) -> ::anyhow::Result<Vec<BlockQuestionRow>> {
    let query = "
        SELECT question_id, check_box
        FROM questions
        WHERE category_id  = $1
        AND   block_number = $2
        ORDER BY question_number, id
    ";

    Ok(::sqlx::query_as::<_, BlockQuestionRow>(query)
        .bind(category_id)
        .bind(block_number)
        .fetch_all(&mut **transaction)
        .await?)
}

pub async fn upsert_completion(
    transaction: &mut super::Transaction<'_>,
    uuid: &str,
    category_id: i32,
    block_number: i32,
) -> ::anyhow::Result<()> {
    let query = "
        INSERT INTO user_block_progress (
            uuid,
            category_id,
            block_number,
            completed_at
        )
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (uuid, category_id, block_number)
        DO UPDATE SET completed_at = NOW()
    ";

    ::sqlx::query(query)
        .bind(uuid)
        .bind(category_id)
        .bind(block_number)
        .execute(&mut **transaction)
        .await?;

    Ok(())
}

pub async fn select_completed_at(
    transaction: &mut super::Transaction<'_>,
    uuid: &str,
    category_id: i32,
    block_number: i32,
) -> ::anyhow::Result<Option<::chrono::DateTime<::chrono::Utc>>> {
    let query = "
        SELECT completed_at
        FROM user_block_progress
        WHERE uuid         = $1
        AND   category_id  = $2
        AND   block_number = $3
    ";

    Ok(::sqlx::query_scalar::<_, ::chrono::DateTime<::chrono::Utc>>(query)
        .bind(uuid)
        .bind(category_id)
        .bind(block_number)
        .fetch_optional(&mut **transaction)
        .await?)
}

/// Blocks of a category that `uuid` completed within `cooldown`.
pub async fn select_blocks_in_cooldown(
    transaction: &mut super::Transaction<'_>,
    uuid: &str,
    category_id: i32,
    cooldown: ::std::time::Duration,
) -> ::anyhow::Result<Vec<i32>> {
    let query = "
        SELECT block_number
        FROM user_block_progress
        WHERE uuid         = $1
        AND   category_id  = $2
        AND   completed_at > NOW() - make_interval(secs => $3)
    ";

    Ok(::sqlx::query_scalar::<_, i32>(query)
        .bind(uuid)
        .bind(category_id)
        .bind(super::interval_seconds(cooldown))
        .fetch_all(&mut **transaction)
        .await?)
}
