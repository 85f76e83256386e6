use std::sync::Arc;

use tracing::info;

use vendauth::mail::SmtpMailer;
use vendauth::{Config, Database, WebServer};

#[tokio::main]
async fn main() -> std::io::Result<()> {
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
    if let Err(e) = vendauth::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        vendauth::logging::init_console_only(&config.logging.level);
    }

    info!("vendauth - Vendorly authentication service");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open database {}: {e}", config.database.path);
            std::process::exit(1);
        }
    };

    let mailer = match SmtpMailer::new(&config.smtp) {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            eprintln!("Failed to configure SMTP mailer: {e}");
            std::process::exit(1);
        }
    };

    let server = WebServer::new(&config, db, mailer);
    info!(
        "Starting API server on {}:{}",
        config.server.host, config.server.port
    );

    server.run().await
}
