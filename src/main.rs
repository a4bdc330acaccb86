use std::error::Error;

use codeflix_catalog::db::{establish_connection_pool, run_pending_migrations};
use codeflix_catalog::models::config::CatalogConfig;

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match CatalogConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            return Err(e.into());
        }
    };

    let pool = establish_connection_pool(&config.database_url, config.max_connections)?;
    let mut conn = pool.get()?;
    let applied = run_pending_migrations(&mut conn)?;

    log::info!(
        "Catalog database {} is ready ({applied} migration(s) applied)",
        config.database_url
    );
    Ok(())
}
