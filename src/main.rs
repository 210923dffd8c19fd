use ::poll_server::config::{Config, Mode};

async fn connect(config: &Config) -> ::anyhow::Result<::sqlx::PgPool> {
    let op = || async {
        ::sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.postgres_max_connections)
            .connect(&config.postgres_string)
            .await
            .map_err(|err| {
                ::log::warn!("postgres not ready: {}", err);
                ::backoff::Error::transient(::anyhow::Error::from(err))
            })
    };

    let backoff = ::backoff::ExponentialBackoff {
        max_elapsed_time: Some(::std::time::Duration::from_secs(120)),
        ..::backoff::ExponentialBackoff::default()
    };

    ::backoff::future::retry(backoff, op).await
}

async fn serve_api(config: Config, pool: ::sqlx::PgPool) -> ::anyhow::Result<()> {
    let state = ::std::sync::Arc::new(::poll_server::State {
        pool,
        cooldowns: config.cooldowns(),
        sessions: ::poll_server::session::make_provider(&config)?,
    });

    let routes = ::poll_server::make_routes(
        state,
        config.allowed_origins(),
        config.frontend_dir.clone().map(::std::path::PathBuf::from),
    );

    ::log::info!("listening on {}", config.http_port_api);

    ::warp::serve(routes)
        .run(([0, 0, 0, 0], config.http_port_api))
        .await;

    Ok(())
}

#[tokio::main]
async fn main() -> ::anyhow::Result<()> {
    ::env_logger::init();

    let config = Config::from_env()?;

    ::log::info!("connecting to postgres");
    let pool = connect(&config).await?;

    {
        let mut transaction = pool.begin().await?;
        ::poll_server::postgres::prepare_database(&mut transaction).await?;
        transaction.commit().await?;
    }

    match config.mode {
        Mode::ServeAPI => serve_api(config, pool).await,
        Mode::Import => {
            let directory = ::std::path::PathBuf::from(&config.import_data_dir);
            ::log::info!("importing from {}", directory.display());
            ::poll_server::import::import_directory(&pool, &directory).await?;
            Ok(())
        }
    }
}
