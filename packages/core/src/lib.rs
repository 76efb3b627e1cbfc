// Vizitka Core
// Rust/WASM клиент сайта-визитки и Telegram Mini App

#![warn(clippy::all)]

// Модули
pub mod config;
pub mod contact;
pub mod host;
pub mod page;
pub mod slider;
pub mod state;
pub mod utils;

// Re-exports для удобства
pub use config::Config;
pub use contact::{ContactChannel, ContactLinks};
pub use host::{HostApi, HostCapabilities, HostEnvironment};
pub use page::Page;
pub use slider::{AutoRotator, SlideRotator, SlideView, Ticker};
pub use state::SiteAdapter;
pub use utils::error::{Result, SiteError};

// WASM-specific bindings
#[cfg(target_arch = "wasm32")]
pub mod wasm;
