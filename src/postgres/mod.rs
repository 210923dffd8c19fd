use ::sqlx::Executor;

pub mod block_progress;
pub mod questions;
pub mod responses;
pub mod users;

#[cfg(test)]
pub(crate) mod test_utils;

pub type Transaction<'a> = ::sqlx::Transaction<'a, ::sqlx::Postgres>;

pub async fn prepare_database(
    transaction: &mut Transaction<'_>,
) -> ::sqlx::Result<()> {
    (&mut **transaction)
        .execute(include_str!("schema.sql"))
        .await?;
    Ok(())
}

/// Interval arguments are bound as fractional seconds and turned into a
/// Postgres interval with `make_interval(secs => $n)`.
pub(crate) fn interval_seconds(duration: ::std::time::Duration) -> f64 {
    duration.as_secs_f64()
}
