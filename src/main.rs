use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use tutorly_api::{config::ApiConfig, init_tracing};
use tutorly_db::{PgStore, create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = ApiConfig::from_env()?;
    init_tracing(config.log_level)?;

    let db_pool = create_pool(&config.database_url).await?;
    initialize_database(&db_pool).await?;

    let store = Arc::new(PgStore::new(db_pool));
    tutorly_api::start_server(config, store).await?;

    Ok(())
}
