use std::error::Error;

use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; variables may come from the real environment.
    let dotenv = dotenvy::dotenv();

    ai_llm_service::telemetry::init("info")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "ignoring unreadable .env"),
    }

    api::start().await?;

    Ok(())
}
