//! Inserts inactive stones for a set of QR tokens.
//!
//! Usage: `seed-stones [TOKEN...]`. Without arguments the demo tokens
//! `STONE-ALPHA`, `STONE-BETA` and `STONE-GAMMA` are seeded. Tokens that
//! already exist are left untouched.

use anyhow::Result;
use tracing::info;

use domain::models::Stone;
use geostone_api::{config::Config, middleware::logging::init_logging};
use persistence::repositories::StoneRepository;

const DEFAULT_TOKENS: &[&str] = &["STONE-ALPHA", "STONE-BETA", "STONE-GAMMA"];

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    init_logging(&config.logging);

    let mut tokens: Vec<String> = std::env::args()
        .skip(1)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        tokens = DEFAULT_TOKENS.iter().map(|t| t.to_string()).collect();
    }

    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;

    let repo = StoneRepository::new(pool.clone());
    let mut inserted = 0;
    for token in &tokens {
        let code = Stone::short_code(token);
        if repo.insert_inactive(token, &code).await? {
            inserted += 1;
            info!(qr_token = %token, code = %code, "Stone seeded");
        } else {
            info!(qr_token = %token, "Stone already exists, skipped");
        }
    }

    info!(inserted, total = tokens.len(), "Seeded stones");
    pool.close().await;
    Ok(())
}
