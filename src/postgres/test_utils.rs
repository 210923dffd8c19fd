//! Fixture survey shared by the storage tests.
//!
//! Category 1 ("Life") holds:
//!   * Q1: single-select start question in block 1, options A (routes to
//!     Q2), B and OTHER.
//!   * Q2: checkbox question in block 1, options X, Y and OTHER.
//!   * Q3: single-select question in block 2, options A and B.
//!   * Q4: single-select question outside any block, option A.
//!
//! Category 2 ("Empty") has no questions.

pub(crate) async fn seed_survey(
    transaction: &mut super::Transaction<'_>,
) -> ::anyhow::Result<()> {
    ::sqlx::query(
        "
        INSERT INTO categories (id, category_name, category_text)
        VALUES (1, 'Life', 'Questions about life'),
               (2, 'Empty', NULL)
        ",
    )
    .execute(&mut **transaction)
    .await?;

    ::sqlx::query(
        "
        INSERT INTO blocks (id, category_id, block_number, block_text)
        VALUES (1, 1, 1, 'Warm up')
        ",
    )
    .execute(&mut **transaction)
    .await?;

    ::sqlx::query(
        "
        INSERT INTO questions (
            id, question_id, question_number, question_text, category_id,
            is_start_question, check_box, block_number
        )
        VALUES (1, 'Q1', 1, 'First?',  1, TRUE,  FALSE, 1),
               (2, 'Q2', 2, 'Second?', 1, FALSE, TRUE,  1),
               (3, 'Q3', 3, 'Third?',  1, FALSE, FALSE, 2),
               (4, 'Q4', 4, 'Fourth?', 1, FALSE, FALSE, NULL)
        ",
    )
    .execute(&mut **transaction)
    .await?;

    ::sqlx::query(
        "
        INSERT INTO options (
            id, question_id, option_code, option_text, next_question_id
        )
        VALUES (1,  'Q1', 'A',     'Yes',   'Q2'),
               (2,  'Q1', 'B',     'No',    NULL),
               (3,  'Q1', 'OTHER', 'Other', NULL),
               (4,  'Q2', 'X',     'Ex',    NULL),
               (5,  'Q2', 'Y',     'Why',   NULL),
               (6,  'Q2', 'OTHER', 'Other', NULL),
               (7,  'Q3', 'A',     'Yes',   NULL),
               (8,  'Q3', 'B',     'No',    NULL),
               (9,  'Q4', 'A',     'Yes',   NULL)
        ",
    )
    .execute(&mut **transaction)
    .await?;

    Ok(())
}

pub(crate) async fn insert_user(
    transaction: &mut super::Transaction<'_>,
    uuid: &str,
) -> ::anyhow::Result<()> {
    ::sqlx::query("INSERT INTO users (uuid, year_of_birth) VALUES ($1, 2008)")
        .bind(uuid)
        .execute(&mut **transaction)
        .await?;
    Ok(())
}

/// Pushes every recorded vote and completion of `uuid` into the past so
/// cooldown windows have elapsed.
pub(crate) async fn age_user_activity(
    transaction: &mut super::Transaction<'_>,
    uuid: &str,
    seconds: f64,
) -> ::anyhow::Result<()> {
    for query in [
        "UPDATE responses
         SET created_at = created_at - make_interval(secs => $2)
         WHERE uuid = $1",
        "UPDATE checkbox_responses
         SET created_at = created_at - make_interval(secs => $2)
         WHERE uuid = $1",
        "UPDATE user_block_progress
         SET completed_at = completed_at - make_interval(secs => $2)
         WHERE uuid = $1",
    ] {
        ::sqlx::query(query)
            .bind(uuid)
            .bind(seconds)
            .execute(&mut **transaction)
            .await?;
    }
    Ok(())
}

pub(crate) async fn count_rows(
    transaction: &mut super::Transaction<'_>,
    table: &str,
) -> ::anyhow::Result<i64> {
    Ok(
        ::sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&mut **transaction)
            .await?,
    )
}
