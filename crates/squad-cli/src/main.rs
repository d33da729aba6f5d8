use clap::Parser;
use owo_colors::{OwoColorize, Style};
use squad_core::db;
use squad_core::error::CoreError;
use squad_core::repository::SqliteRepository;

mod cli;
mod commands;
mod config;
mod logging;
mod parser;
mod util;
mod views;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Invalid configuration: {}", "Error:".red().bold(), e);
            std::process::exit(2);
        }
    };
    logging::init(&config.log_level);

    let result = match cli.command {
        // Previewing never touches the database.
        cli::Commands::Preview(command) => commands::preview::preview_recurrence(command, cli.json),
        command => run(command, &config, cli.json).await,
    };

    if let Err(e) = result {
        handle_error(e);
    }
}

async fn run(command: cli::Commands, config: &config::Config, json: bool) -> anyhow::Result<()> {
    let db_pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(path = %config.database_path, error = ?e, "cannot open database");
            return Err(e.into());
        }
    };
    let repository = SqliteRepository::new(db_pool);

    match command {
        cli::Commands::Add(command) => {
            commands::add::add_schedule(&repository, command, json).await
        }
        cli::Commands::List(command) => {
            commands::list::list_schedules(&repository, command, config, json).await
        }
        cli::Commands::Show(command) => {
            commands::show::show_schedule(&repository, command, json).await
        }
        cli::Commands::Series(command) => {
            commands::show::show_series(&repository, command, json).await
        }
        cli::Commands::Edit(command) => {
            commands::edit::edit_schedule(&repository, command, json).await
        }
        cli::Commands::Delete(command) => {
            commands::delete::delete_schedule(&repository, command, json).await
        }
        cli::Commands::Preview(command) => commands::preview::preview_recurrence(command, json),
    }
}

fn handle_error(err: anyhow::Error) -> ! {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} Schedule not found: {}", "Error:".style(error_style), s);
            }
            CoreError::AmbiguousId(schedules) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, title) in schedules {
                    eprintln!("  {} ({})", id.yellow(), title);
                }
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidRecurrence(s) => {
                eprintln!("{} Invalid recurrence: {}", "Error:".style(error_style), s);
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {}", "Error:".style(error_style), err);
    }
    std::process::exit(1);
}
