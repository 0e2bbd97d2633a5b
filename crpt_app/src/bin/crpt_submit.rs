use std::sync::Arc;
use std::time::Instant;

use crpt_api::CrptApi;
use crpt_api::Document;
use crpt_app::config_loader;
use crpt_app::tracing_setup;
use tracing::error;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_setup::init(tracing::Level::INFO);

    let config = config_loader::load_submit_config_or_default("crpt.toml");
    info!(
        requests_per_window = config.requests_per_window,
        window_ms = config.window_ms,
        simulate = config.simulate,
        "Starting submission run"
    );

    let mut builder = CrptApi::builder()
        .requests_per_window(config.requests_per_window)
        .window(config.window())
        .simulate(config.simulate);
    if let Some(base_url) = &config.base_url {
        builder = builder.base_url(base_url.clone());
    }
    let api = Arc::new(builder.build()?);

    let document = Document::sample();
    let signature = "signature";

    // One more caller than the window allows, so the throttling is visible
    // in the logged completion times.
    let mut handles = Vec::new();
    for worker in 0..=config.requests_per_window {
        let api = Arc::clone(&api);
        let document = document.clone();
        handles.push(tokio::spawn(async move {
            let started = Instant::now();
            match api.create_document(&document, signature).await {
                Ok(body) => {
                    info!(worker, elapsed_ms = started.elapsed().as_millis() as u64, %body, "submission accepted");
                }
                Err(err) => {
                    error!(worker, elapsed_ms = started.elapsed().as_millis() as u64, "submission failed: {err}");
                }
            }
        }));
    }

    for handle in handles {
        handle.await?;
    }

    Ok(())
}
