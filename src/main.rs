use std::error::Error;

use accessible_chennai::{App, Cli, Mode, run_command, run_service};
use clap::Parser;
use log::LevelFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        return Err(e.into());
    }

    simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Off)
        .with_module_level("accessible_chennai", LevelFilter::Info)
        .env()
        .init()?;

    let cli = Cli::parse();
    let app = App::new(cli.config())?;

    match cli.mode {
        Mode::Serve { address, port } => {
            run_service(app, address, port).await?;
        }
        mode => {
            run_command(&app, mode).await?;
        }
    }

    Ok(())
}
