use std::sync::Arc;

use ai_model_service::{
    ModelService, config::default_config::config_from_env, error_handler::env_opt_bool, telemetry,
};
use api::core::app_state::AppState;
use item_qa::{ItemQa, ItemQaConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file when present.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    telemetry::init("info");

    let qa_cfg = ItemQaConfig::from_env()?;
    let variant = qa_cfg.variant;
    let model_cfg = config_from_env(variant.default_model())?;
    info!(
        %variant,
        provider = %model_cfg.provider,
        model = %model_cfg.model,
        items = qa_cfg.catalog.ids().count(),
        "Starting item Q&A server"
    );

    // Built once, shared read-only by every request.
    let model = ModelService::new(model_cfg)?;
    if env_opt_bool("MODEL_STARTUP_CHECK")?.unwrap_or(true) {
        model.ensure_ready().await?;
    } else {
        warn!("MODEL_STARTUP_CHECK=false, skipping model readiness check");
    }

    let qa = ItemQa::new(Arc::new(model), qa_cfg);
    api::start(AppState::new(qa)).await?;

    Ok(())
}
