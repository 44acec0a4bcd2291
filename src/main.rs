use tracing::info;

use cloudstore::{AuthService, Config, Store};

#[tokio::main]
async fn main() -> cloudstore::Result<()> {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = cloudstore::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        cloudstore::logging::init_console_only(&config.logging.level);
    }

    info!("CloudStore - local file-storage demo");

    let store = Store::open(&config.database).await?;
    store.initialize().await?;

    let users = store.get_all_users().await?;
    info!("Database ready with {} users", users.len());

    let auth = AuthService::new(&store);
    match auth.resume().await? {
        Some(user) => info!(user_id = %user.id, name = %user.name, "Resumed session"),
        None => info!("No active session"),
    }

    Ok(())
}
