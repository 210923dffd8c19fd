use ::poll_server::session::providers::memory::MemoryProvider;

/// Category 1 holds a single-select start question Q1 (A routes to Q2, B,
/// OTHER) and a checkbox question Q2 (X, Y), both in block 1.
pub async fn seed(pool: &::sqlx::PgPool) -> ::anyhow::Result<()> {
    let mut transaction = pool.begin().await?;

    ::poll_server::postgres::prepare_database(&mut transaction).await?;

    for query in [
        "INSERT INTO categories (id, category_name, category_text)
         VALUES (1, 'Life', 'Questions about life')",
        "INSERT INTO questions (
             id, question_id, question_number, question_text, category_id,
             is_start_question, check_box, block_number
         )
         VALUES (1, 'Q1', 1, 'First?',  1, TRUE,  FALSE, 1),
                (2, 'Q2', 2, 'Second?', 1, FALSE, TRUE,  1)",
        "INSERT INTO options (
             id, question_id, option_code, option_text, next_question_id
         )
         VALUES (1, 'Q1', 'A',     'Yes',   'Q2'),
                (2, 'Q1', 'B',     'No',    NULL),
                (3, 'Q1', 'OTHER', 'Other', NULL),
                (4, 'Q2', 'X',     'Ex',    NULL),
                (5, 'Q2', 'Y',     'Why',   NULL)",
    ] {
        ::sqlx::query(query).execute(&mut *transaction).await?;
    }

    transaction.commit().await?;

    Ok(())
}

pub fn state(pool: ::sqlx::PgPool) -> ::std::sync::Arc<::poll_server::State> {
    ::std::sync::Arc::new(::poll_server::State {
        pool,
        cooldowns: ::poll_server::config::Cooldowns::default(),
        sessions: Box::new(MemoryProvider::new(
            ::std::num::NonZeroUsize::new(64).unwrap(),
            ::std::time::Duration::from_secs(3600),
        )),
    })
}
