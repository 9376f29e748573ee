mod config;
mod console;
mod quiz;
mod shell;

use config::Config;
use console::Console;
use dotenv::dotenv;
use quiz::{storage::JsonStore, QuizRepository};
use shell::Shell;
use tokio::io::BufReader;

type MainResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> MainResult {
    // The .env file is optional; plain environment variables work too.
    dotenv().ok();

    pretty_env_logger::init();
    log::info!("Starting quiz shell...");

    let config = Config::from_env()?;
    if let Some(color) = config.color {
        colored::control::set_override(color);
    }

    let store = JsonStore::new(&config.db_path);
    let repo = QuizRepository::new(store.load()?);
    log::info!(
        "Repository ready with {} quizzes from {}",
        repo.count(),
        store.path().display()
    );

    let console = Console::new(BufReader::new(tokio::io::stdin()), std::io::stdout());
    let mut shell = Shell::new(repo, console, config.authors).with_store(store);
    shell.run().await?;

    log::info!("Quiz shell closed");
    Ok(())
}
