// Типы ошибок

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SiteError {
    #[error("Host capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("Host call failed: {0}")]
    HostCallError(String),

    #[error("Element not found: {0}")]
    MissingElement(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Already initialized")]
    AlreadyInitialized,

    #[error("Not initialized: call boot() first")]
    NotInitialized,

    #[error("WASM serialization error: {0}")]
    SerdeWasmError(String),
}

impl SiteError {
    /// Ошибка отсутствующей возможности хоста
    pub fn unavailable(capability: &str) -> Self {
        SiteError::CapabilityUnavailable(capability.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<serde_wasm_bindgen::Error> for SiteError {
    fn from(error: serde_wasm_bindgen::Error) -> Self {
        SiteError::SerdeWasmError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;

// Для WASM-биндингов
#[cfg(target_arch = "wasm32")]
impl From<SiteError> for wasm_bindgen::JsValue {
    fn from(error: SiteError) -> Self {
        wasm_bindgen::JsValue::from_str(&error.to_string())
    }
}
