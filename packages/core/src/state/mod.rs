// Состояние приложения

pub mod mount;
pub mod site;

pub use mount::MountState;
pub use site::{AdapterState, DebugInfo, SiteAdapter};
