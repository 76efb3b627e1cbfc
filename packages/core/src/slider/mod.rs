// Слайдеры (hero и спикеры)
// Чистая логика без DOM: представление и таймер подключаются через трейты

pub mod auto;
pub mod rotator;

pub use auto::{AutoRotator, Ticker, VisibilityPolicy};
pub use rotator::{wrap_index, CrossFadePlan, SlideRotator, SlideView, Transition};
