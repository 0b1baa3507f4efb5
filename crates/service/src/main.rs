//! `logipilot-seed` — explicit bootstrap step.
//!
//! Connects to Postgres, ensures the schema, and seeds the administrator
//! account from process settings. Run once per environment (idempotent).

use logipilot_core::Settings;
use logipilot_infra::PgStore;
use logipilot_infra::store::postgres::ensure_schema;
use logipilot_service::Services;

#[tokio::main]
async fn main() {
    logipilot_observability::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let mut settings = Settings::default();
    match std::env::var("SECRET_KEY") {
        Ok(secret) => settings.secret_key = secret,
        Err(_) => tracing::warn!("SECRET_KEY not set; using insecure dev default"),
    }
    if let Ok(email) = std::env::var("ADMIN_EMAIL") {
        settings.admin_email = email;
    }
    if let Ok(password) = std::env::var("ADMIN_PASSWORD") {
        settings.admin_password = password;
    }

    let pool = sqlx::PgPool::connect(&database_url)
        .await
        .expect("failed to connect to database");
    ensure_schema(&pool).await.expect("failed to ensure schema");

    let services = Services::new(PgStore::new(pool), &settings);
    match services.seed_admin(&settings).await {
        Ok(Some(account)) => {
            tracing::info!(email = %account.email, "administrator account created")
        }
        Ok(None) => tracing::info!("nothing to do"),
        Err(e) => {
            tracing::error!(error = %e, "bootstrap failed");
            std::process::exit(1);
        }
    }
}
