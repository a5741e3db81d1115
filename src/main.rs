use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use postboard::{config::settings::Settings, create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = Settings::new();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("database connected");

    let addr = settings.addr;
    let app = create_app(AppState::new(pool, settings));

    info!("server running on http://localhost:{}", addr.port());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
