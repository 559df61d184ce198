use dotenv::dotenv;
use reqwest::Client;
use log::{info, error};

mod config;
mod error;
mod history;
mod logging;
mod pipeline;
mod recommend;
mod utils;
mod yelp;

use config::{Config, Paths};
use error::Result;
use history::FileHistoryStore;
use recommend::Recommendation;
use yelp::YelpClient;

async fn suggest(paths: &Paths) -> Result<Recommendation> {
    let config = Config::load(&paths.config)?;
    let store = FileHistoryStore::new(&paths.history);
    let yelp = YelpClient::new(Client::new(), &paths.api_host)?;
    let mut rng = rand::rng();

    pipeline::run(&config, &yelp, &store, &mut rng).await
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    if let Err(e) = logging::setup_logging() {
        eprintln!("Failed to set up logging: {}", e);
    }

    let paths = Paths::from_env();
    info!("Starting WET");

    match suggest(&paths).await {
        Ok(recommendation) => {
            info!("Suggested {}", recommendation.business.name);
            println!("{}", recommendation);
        }
        Err(e) => {
            error!("Run aborted: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
