use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(error) = proposal_desk::run().await {
        error!("proposal-desk exited with error: {:#}", error);
        std::process::exit(1);
    }
}
