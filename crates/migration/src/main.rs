use sea_orm_migration::prelude::*;

/// Standalone migration runner. Reads `HACKFORGE_DATABASE_URL` and hands it to
/// the Sea-ORM migration CLI as `DATABASE_URL`.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        if let Ok(url) = std::env::var("HACKFORGE_DATABASE_URL") {
            std::env::set_var("DATABASE_URL", url);
        }
    }
    cli::run_cli(migration::Migrator).await;
}
