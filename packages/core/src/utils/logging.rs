// Логирование
//
// Все модули пишут через `tracing`. Без подписчика события уходят в `log`
// (feature "log"), а в браузере `log` печатает в консоль через console_log.

#[cfg(target_arch = "wasm32")]
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    // Повторная инициализация (например, второй boot) не ошибка
    if console_log::init_with_level(level).is_err() {
        tracing::debug!(target: "site::logging", "Logger already installed");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(_level: log::Level) {}
