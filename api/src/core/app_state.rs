use item_qa::{ItemQa, ModelVariant};

/// Default listen address when `API_ADDRESS` is not set.
pub const DEFAULT_API_ADDRESS: &str = "127.0.0.1:5000";

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Request pipeline with the model loaded at startup.
    pub qa: ItemQa,
}

impl AppState {
    pub fn new(qa: ItemQa) -> Self {
        Self { qa }
    }

    pub fn variant(&self) -> ModelVariant {
        self.qa.variant()
    }

    /// Whether `POST /refine` is served.
    pub fn serves_refine(&self) -> bool {
        self.qa.config().profile.refine_endpoint
    }
}

/// Listen address from `API_ADDRESS`, defaulting to [`DEFAULT_API_ADDRESS`].
pub fn api_address() -> String {
    std::env::var("API_ADDRESS")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string())
}
