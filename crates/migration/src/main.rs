#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        // sea-orm-migration's CLI reads DATABASE_URL; assemble it from the
        // COMMIT_DATABASE_* variables when it is not set directly.
        std::env::set_var("DATABASE_URL", migration::db::database_url());
    }
    sea_orm_migration::cli::run_cli(migration::Migrator).await;
}
