use crate::model::QuestionKind;

fn vote_table(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::Single => "responses",
        QuestionKind::Multi => "checkbox_responses",
    }
}

#[derive(::sqlx::FromRow, Clone, Debug, PartialEq)]
pub struct CheckboxVoteRow {
    pub uuid: Option<String>,
    pub option_code: String,
}

/// Serialises concurrent submissions for the same (user, question) pair
/// until the surrounding transaction ends.
pub async fn lock_voter_question(
    transaction: &mut super::Transaction<'_>,
    uuid: &str,
    question_id: &str,
) -> ::anyhow::Result<()> {
    ::sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1), hashtext($2))")
        .bind(uuid)
        .bind(question_id)
        .execute(&mut **transaction)
        .await?;
    Ok(())
}

pub async fn has_recent_vote(
    transaction: &mut super::Transaction<'_>,
    kind: QuestionKind,
    uuid: &str,
    question_id: &str,
    cooldown: ::std::time::Duration,
) -> ::anyhow::Result<bool> {
    let query = format!(
        "
        SELECT EXISTS (
            SELECT 1 FROM {}
            WHERE uuid        = $1
            AND   question_id = $2
            AND   created_at  > NOW() - make_interval(secs => $3)
        )
        ",
        vote_table(kind)
    );

    Ok(::sqlx::query_scalar::<_, bool>(&query)
        .bind(uuid)
        .bind(question_id)
        .bind(super::interval_seconds(cooldown))
        .fetch_one(&mut **transaction)
        .await?)
}

pub async fn has_vote(
    transaction: &mut super::Transaction<'_>,
    kind: QuestionKind,
    uuid: &str,
    question_id: &str,
) -> ::anyhow::Result<bool> {
    let query = format!(
        "
        SELECT EXISTS (
            SELECT 1 FROM {}
            WHERE uuid        = $1
            AND   question_id = $2
        )
        ",
        vote_table(kind)
    );

    Ok(::sqlx::query_scalar::<_, bool>(&query)
        .bind(uuid)
        .bind(question_id)
        .fetch_one(&mut **transaction)
        .await?)
}

pub async fn insert_vote(
    transaction: &mut super::Transaction<'_>,
    kind: QuestionKind,
    question_id: &str,
    option_id: i32,
    option_code: &str,
    uuid: Option<&str>,
) -> ::anyhow::Result<()> {
    let query = format!(
        "
        INSERT INTO {} (question_id, option_id, option_code, uuid)
        VALUES ($1, $2, $3, $4)
        ",
        vote_table(kind)
    );

    ::sqlx::query(&query)
        .bind(question_id)
        .bind(option_id)
        .bind(option_code)
        .bind(uuid)
        .execute(&mut **transaction)
        .await?;

    Ok(())
}

pub async fn insert_other_response(
    transaction: &mut super::Transaction<'_>,
    question_id: &str,
    question_text: &str,
    other_text: &str,
    uuid: Option<&str>,
) -> ::anyhow::Result<()> {
    let query = "
        INSERT INTO other_responses (
            question_id,
            question_text,
            other_text,
            uuid
        )
        VALUES ($1, $2, $3, $4)
    ";

    ::sqlx::query(query)
        .bind(question_id)
        .bind(question_text)
        .bind(other_text)
        .bind(uuid)
        .execute(&mut **transaction)
        .await?;

    Ok(())
}

pub async fn count_single_votes(
    transaction: &mut super::Transaction<'_>,
    question_id: &str,
) -> ::anyhow::Result<Vec<(String, i64)>> {
    let query = "
        SELECT option_code, COUNT(*)
        FROM responses
        WHERE question_id = $1
        GROUP BY option_code
    ";

    Ok(::sqlx::query_as::<_, (String, i64)>(query)
        .bind(question_id)
        .fetch_all(&mut **transaction)
        .await?)
}

pub async fn select_checkbox_votes(
    transaction: &mut super::Transaction<'_>,
    question_id: &str,
) -> ::anyhow::Result<Vec<CheckboxVoteRow>> {
    let query = "
        SELECT uuid, option_code
        FROM checkbox_responses
        WHERE question_id = $1
        ORDER BY id
    ";

    Ok(::sqlx::query_as::<_, CheckboxVoteRow>(query)
        .bind(question_id)
        .fetch_all(&mut **transaction)
        .await?)
}

/// Free-text answers for a question, most recent first.
pub async fn select_other_texts(
    transaction: &mut super::Transaction<'_>,
    question_id: &str,
) -> ::anyhow::Result<Vec<String>> {
    let query = "
        SELECT other_text
        FROM other_responses
        WHERE question_id = $1
        ORDER BY submitted_at DESC, id DESC
    ";

    Ok(::sqlx::query_scalar::<_, String>(query)
        .bind(question_id)
        .fetch_all(&mut **transaction)
        .await?)
}
