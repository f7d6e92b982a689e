//! `carquote`: ask the estimator service for a price.
//!
//! ```text
//! carquote probe
//! carquote estimate --name "Toyota Camry" --type sedan --price 20000
//! ```

use anyhow::{Result, bail};
use carquote::CarQuote;
use carquote::client::{ClientError, EstimatorClient};
use carquote::report::{NO_DESCRIPTION, render_estimate};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "carquote", version, about = "Estimate the price of your car based on its type")]
struct Cli {
    /// Base URL of the estimator service
    #[arg(long, global = true, env = "CARQUOTE_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the estimator service is reachable
    Probe,

    /// Get a price estimate for one car
    Estimate {
        /// Car name, e.g. "Toyota Camry"
        #[arg(long)]
        name: String,

        #[arg(long = "type", value_enum)]
        kind: CarCategory,

        /// Base price in dollars
        #[arg(long, allow_negative_numbers = true)]
        price: f64,

        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CarCategory {
    Sedan,
    Suv,
    Truck,
    Coupe,
    Hatchback,
    Other,
}

impl CarCategory {
    fn as_str(self) -> &'static str {
        match self {
            Self::Sedan     => "sedan",
            Self::Suv       => "suv",
            Self::Truck     => "truck",
            Self::Coupe     => "coupe",
            Self::Hatchback => "hatchback",
            Self::Other     => "other",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = EstimatorClient::new(cli.api_url);

    match cli.command {
        Command::Probe => probe(&client).await,
        Command::Estimate { name, kind, price, description } => {
            let car = build_quote(name, kind, price, description)?;
            estimate(&client, &car).await
        }
    }
}

async fn probe(client: &EstimatorClient) -> Result<()> {
    match client.welcome().await {
        Ok(message) => {
            println!("Connected to backend API");
            println!("{message}");
            Ok(())
        }
        Err(e) => bail!("Cannot connect to backend at {}: {e}", client.base_url()),
    }
}

fn build_quote(name: String, kind: CarCategory, price: f64, description: String) -> Result<CarQuote> {
    if name.is_empty() || !(price > 0.0) {
        bail!("Please fill in all required fields with valid values");
    }

    let description = if description.is_empty() {
        NO_DESCRIPTION.to_owned()
    } else {
        description
    };

    Ok(CarQuote { name, kind: kind.as_str().to_owned(), price, description })
}

async fn estimate(client: &EstimatorClient, car: &CarQuote) -> Result<()> {
    if let Err(e) = client.welcome().await {
        tracing::warn!("backend API is not responding: {e}");
        eprintln!("Backend API is not responding. Make sure carquote-api is running.");
    }

    match client.estimate(car).await {
        Ok(estimated) => {
            println!("{}", render_estimate(car, estimated));
            Ok(())
        }
        Err(ClientError::Connect { .. }) => {
            bail!("Cannot connect to the API. Is the estimator running?")
        }
        Err(e @ ClientError::Status { .. }) => bail!("Error: {e}"),
        Err(e) => Err(e.into()),
    }
}
