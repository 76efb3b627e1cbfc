// Браузерная часть: web-sys реализации трейтов и экспортируемые функции

pub mod bindings;
pub mod dom;
pub mod telegram;
pub mod timers;
