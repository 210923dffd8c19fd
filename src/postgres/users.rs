use crate::model::User;

pub async fn select_user(
    transaction: &mut super::Transaction<'_>,
    uuid: &str,
) -> ::anyhow::Result<Option<User>> {
    let query = "
        SELECT uuid, year_of_birth, referred_by
        FROM users
        WHERE uuid = $1
    ";

    Ok(::sqlx::query_as::<_, User>(query)
        .bind(uuid)
        .fetch_optional(&mut **transaction)
        .await?)
}

/// Returns whether a row was written. A concurrent creation of the same
/// user wins silently.
async fn insert_user(
    transaction: &mut super::Transaction<'_>,
    uuid: &str,
    year_of_birth: i32,
    referred_by: Option<&str>,
) -> ::anyhow::Result<bool> {
    let query = "
        INSERT INTO users (uuid, year_of_birth, referred_by)
        VALUES ($1, $2, $3)
        ON CONFLICT (uuid) DO NOTHING
    ";

    let result = ::sqlx::query(query)
        .bind(uuid)
        .bind(year_of_birth)
        .bind(referred_by)
        .execute(&mut **transaction)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Returns the existing user or creates one. A referrer that does not
/// exist yet is dropped rather than failing the creation. Existing users
/// are never updated.
pub async fn get_or_create(
    transaction: &mut super::Transaction<'_>,
    uuid: &str,
    year_of_birth: i32,
    referrer: Option<&str>,
) -> ::anyhow::Result<User> {
    if let Some(user) = select_user(transaction, uuid).await? {
        return Ok(user);
    }

    let referrer = crate::model::identified_user(referrer);

    let referred_by = match referrer {
        Some(referrer) => {
            select_user(transaction, referrer).await?.map(|user| user.uuid)
        }
        None => None,
    };

    let created = insert_user(
        transaction,
        uuid,
        year_of_birth,
        referred_by.as_deref(),
    )
    .await?;

    let user = select_user(transaction, uuid)
        .await?
        .ok_or_else(|| ::anyhow::anyhow!("user {} vanished after insert", uuid))?;

    if created {
        match (&user.referred_by, referrer) {
            (Some(referred_by), _) => {
                ::log::info!("created user {} referred by {}", uuid, referred_by)
            }
            (None, Some(referrer)) => ::log::info!(
                "created user {} (invalid referrer: {})",
                uuid,
                referrer
            ),
            (None, None) => ::log::info!("created user {}", uuid),
        }
    }

    Ok(user)
}

/// Lazy creation only happens when the submission carries both a user id
/// and a birth year.
pub async fn ensure_voter(
    transaction: &mut super::Transaction<'_>,
    voter: &crate::model::Voter,
) -> ::anyhow::Result<Option<User>> {
    match (voter.user_id(), voter.year_of_birth) {
        (Some(uuid), Some(year_of_birth)) => Ok(Some(
            get_or_create(
                transaction,
                uuid,
                year_of_birth,
                voter.referred_by.as_deref(),
            )
            .await?,
        )),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use crate::model::Voter;
    use crate::postgres::test_utils;

    #[::sqlx::test]
    async fn test_get_or_create_links_existing_referrer(
        pool: ::sqlx::PgPool,
    ) -> ::anyhow::Result<()> {
        let mut transaction = pool.begin().await?;
        crate::postgres::prepare_database(&mut transaction).await?;
        test_utils::insert_user(&mut transaction, "referrer").await?;

        let user = super::get_or_create(
            &mut transaction,
            "new-user",
            2007,
            Some("referrer"),
        )
        .await?;

        assert_eq!(user.uuid, "new-user");
        assert_eq!(user.year_of_birth, Some(2007));
        assert_eq!(user.referred_by.as_deref(), Some("referrer"));

        Ok(())
    }

    #[::sqlx::test]
    async fn test_get_or_create_drops_unknown_referrer(
        pool: ::sqlx::PgPool,
    ) -> ::anyhow::Result<()> {
        let mut transaction = pool.begin().await?;
        crate::postgres::prepare_database(&mut transaction).await?;

        let user = super::get_or_create(
            &mut transaction,
            "new-user",
            2007,
            Some("ghost"),
        )
        .await?;

        assert_eq!(user.uuid, "new-user");
        assert!(user.referred_by.is_none());

        Ok(())
    }

    #[::sqlx::test]
    async fn test_get_or_create_never_updates(
        pool: ::sqlx::PgPool,
    ) -> ::anyhow::Result<()> {
        let mut transaction = pool.begin().await?;
        crate::postgres::prepare_database(&mut transaction).await?;
        test_utils::insert_user(&mut transaction, "referrer").await?;

        super::get_or_create(&mut transaction, "user", 2005, None).await?;

        let again = super::get_or_create(
            &mut transaction,
            "user",
            1999,
            Some("referrer"),
        )
        .await?;

        assert_eq!(again.year_of_birth, Some(2005));
        assert!(again.referred_by.is_none());
        assert_eq!(test_utils::count_rows(&mut transaction, "users").await?, 2);

        Ok(())
    }

    #[::sqlx::test]
    async fn test_concurrent_creation_of_the_same_user(
        pool: ::sqlx::PgPool,
    ) -> ::anyhow::Result<()> {
        let mut transaction = pool.begin().await?;
        crate::postgres::prepare_database(&mut transaction).await?;
        transaction.commit().await?;

        let mut first = pool.begin().await?;
        super::get_or_create(&mut first, "user", 2005, None).await?;

        let mut second = pool.begin().await?;
        let racing = ::tokio::spawn(async move {
            let user =
                super::get_or_create(&mut second, "user", 1999, None).await?;
            second.commit().await?;
            Ok::<_, ::anyhow::Error>(user)
        });

        // Let the second insert reach the uncommitted row and wait on it.
        ::tokio::time::sleep(::std::time::Duration::from_millis(200)).await;
        first.commit().await?;

        let user = racing.await??;
        assert_eq!(user.year_of_birth, Some(2005));

        let mut transaction = pool.begin().await?;
        assert_eq!(test_utils::count_rows(&mut transaction, "users").await?, 1);

        Ok(())
    }

    #[::sqlx::test]
    async fn test_ensure_voter_requires_birth_year(
        pool: ::sqlx::PgPool,
    ) -> ::anyhow::Result<()> {
        let mut transaction = pool.begin().await?;
        crate::postgres::prepare_database(&mut transaction).await?;

        let without_year = Voter {
            uuid: Some("user".to_string()),
            year_of_birth: None,
            referred_by: None,
        };
        assert!(super::ensure_voter(&mut transaction, &without_year)
            .await?
            .is_none());

        assert!(super::ensure_voter(&mut transaction, &Voter::anonymous())
            .await?
            .is_none());

        assert_eq!(test_utils::count_rows(&mut transaction, "users").await?, 0);

        Ok(())
    }
}
