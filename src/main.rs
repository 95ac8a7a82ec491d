pub mod commands;
pub mod ledger;
pub mod roulette;
pub mod session;
pub mod stake;
pub mod stats;

use commands::start;
use dotenv::dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    // Login with a bot token from the environment
    start().await
}
