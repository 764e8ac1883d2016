use std::process::ExitCode;
use std::sync::Arc;

use peerhub::config::load_config;
use peerhub::store::TopicStore;
use peerhub::transport::serve;
use peerhub::utils::logging;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init("error");
            tracing::error!("failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.log.level);

    let store = Arc::new(TopicStore::new());
    if let Err(e) = serve(&config.listen_addr(), store).await {
        tracing::error!("server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
