use dotenvy::dotenv;
use foodgram::{
    config::{Settings, database, reference_data},
    core::{ingredient, tag},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Runtime settings
    let settings = Settings::from_env()
        .inspect_err(|e| error!("Invalid settings: {}", e))?;

    // 4. Database and schema
    database::ensure_database_dir(&settings.database_url)?;
    let db = database::create_connection(&settings.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed tags and ingredients
    let reference = reference_data::load_reference_data(&settings.reference_data_path)
        .inspect_err(|e| error!("Failed to load reference data: {}", e))?;
    let tags = tag::seed_tags(&db, &reference.tags).await?;
    let ingredients = ingredient::seed_ingredients(&db, &reference.ingredients).await?;

    info!(
        tags,
        ingredients,
        page_size = settings.page_size,
        "Foodgram storage ready"
    );
    Ok(())
}
