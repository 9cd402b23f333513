mod cli;
mod config;
mod error;
mod game;
mod logging;
mod models;
mod store;

use clap::Parser;
use cli::{App, TerminalPrompter};
use colored::*;
use config::{Args, Config};
use error::Result;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env, if present
    dotenv::dotenv().ok();

    let config = Config::load(Args::parse())?;

    // Log to a file; the terminal belongs to the prompt
    let _guard = match logging::init(&config.log_dir) {
        Ok(guard) => guard,
        Err(e) => {
            println!(
                "{} {}",
                "Error: Failed to set up logging.".red(),
                e.to_string().red()
            );
            return Err(e);
        },
    };

    info!("Starting quiz manager with {:?}", config);

    let mut app = match App::from_config(&config, TerminalPrompter::new()).await {
        Ok(app) => {
            info!(
                "Loaded {} quizzes from {}",
                app.store().count(),
                config.quiz_file.display()
            );
            app
        },
        Err(e) => {
            error!("Failed to initialize application: {:?}", e);
            println!(
                "{} {}",
                "Error: Failed to load quizzes.".red(),
                e.to_string().red()
            );
            return Err(e);
        },
    };

    println!("{}", "Welcome to the quiz manager!".cyan().bold());
    println!("Type {} to see the available commands.", "help".magenta());

    app.run().await?;

    info!("Session ended");
    Ok(())
}
