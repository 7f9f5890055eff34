use std::{io, path::PathBuf};

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod history;
mod model;
mod simulator;
mod telemetry;

use api::DeviceId;
use simulator::Simulator;

#[derive(Debug, Parser)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the dashboard API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
        /// CSV export used to seed the current position
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Print the positions parsed from a CSV export as JSON lines
    Dump { path: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::resolve(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { port, csv } => {
            let csv = csv.or(config.csv_path);
            let history = history::load(csv.as_deref())?;
            let simulator = web::Data::new(Simulator::new(history.first()));
            let start = simulator.current();
            info!(
                source = ?history.source(),
                count = history.records().len(),
                lat = start.lat,
                lon = start.lon,
                "initial position"
            );
            let device_id = web::Data::new(DeviceId(config.device_id));
            let port = port.unwrap_or(config.http_port);

            info!(host = %config.http_host, port, "starting http server");
            HttpServer::new(move || {
                App::new()
                    .wrap(Logger::default())
                    .app_data(simulator.clone())
                    .app_data(device_id.clone())
                    .configure(api::routes)
            })
            .bind((config.http_host.as_str(), port))?
            .run()
            .await?;
        }

        Command::Dump { path } => {
            let path = path.or(config.csv_path);
            let history = history::load(path.as_deref())?;
            for record in history.records() {
                println!("{}", serde_json::to_string(record)?);
            }
        }
    };

    Ok(())
}
