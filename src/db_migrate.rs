use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use tracing::info;
use tutorly_api::{config::parse_log_level, init_tracing};
use tutorly_db::{create_pool, schema::initialize_database};

/// Applies the schema and exits. Runs the same idempotent statements the
/// server runs at startup.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let level = parse_log_level(&std::env::var("LOG_LEVEL").unwrap_or_default());
    init_tracing(level)?;

    let database_url =
        std::env::var("DATABASE_URL").wrap_err("DATABASE_URL environment variable must be set")?;

    info!("Connecting to database...");
    let db_pool = create_pool(&database_url).await?;
    initialize_database(&db_pool).await?;

    Ok(())
}
