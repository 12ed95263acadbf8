use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

use commands::{check, serve};

#[derive(Parser)]
#[command(name = "forecastboard")]
#[command(about = "Revenue forecast dashboard server and deployment self-check")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Listen host, overrides HOST / FORECASTBOARD_HOST
        #[arg(long)]
        host: Option<String>,

        /// Listen port, overrides PORT / FORECASTBOARD_PORT
        #[arg(short, long)]
        port: Option<u16>,

        /// Static dataset file (JSON) to serve instead of the compiled-in figures
        ///
        /// The file holds a `tables` array; every table is checked for
        /// integrity before the server accepts connections.
        #[arg(short, long)]
        dataset_path: Option<PathBuf>,
    },
    /// Run the deployment self-check
    ///
    /// Builds the dataset, renders every chart at the default selection and
    /// exits non-zero when any check fails.
    Check {
        /// Static dataset file (JSON) to verify in addition to the compiled-in figures
        #[arg(short, long)]
        dataset_path: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve {
                host,
                port,
                dataset_path,
            } => {
                serve(host, port, dataset_path).await?;
            }
            Commands::Check { dataset_path } => {
                check(dataset_path.as_deref())?;
            }
        }
        Ok(())
    }
}
