// Страница: DOM-операции и браузерные fallback'и
//
// Page описывает всё, что адаптеру нужно от документа. Реализация для
// браузера лежит в wasm::dom, в тестах используется фейк.

pub mod lazy;
pub mod scroll;

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

/// Локальная задача для event loop браузера
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

pub trait Page {
    /// Спрятать (или вернуть) собственные кнопки "Связаться" страницы
    fn set_contact_buttons_hidden(&self, hidden: bool);

    /// Повесить обработчик на кнопки "Связаться"
    fn on_contact_click(&self, handler: Rc<dyn Fn()>);

    /// Обработчик прокрутки окна; получает scrollTop
    fn on_scroll(&self, handler: Box<dyn FnMut(f64)>);

    fn set_css_variable(&self, name: &str, value: &str);

    /// Убрать лишнее пространство внизу страницы (стиль с фиксированным id)
    fn apply_bottom_spacing_fix(&self);

    /// Запретить выделение, копирование и контекстное меню вне полей ввода
    fn install_copy_guard(&self);

    fn confirm(&self, message: &str) -> bool;

    /// Переход в текущей вкладке (`location.href`)
    fn navigate(&self, url: &str);

    /// Открыть в новой вкладке
    fn open_window(&self, url: &str);

    fn history_back(&self);

    fn storage_get(&self, key: &str) -> Option<String>;
    fn storage_set(&self, key: &str, value: &str) -> bool;

    /// Запустить async-задачу на текущем event loop
    fn spawn(&self, task: LocalTask);

    /// Однократный отложенный вызов
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>);
}

/// Разрешено ли выделение/копирование внутри элемента
///
/// `tag_name` ожидается в любом регистре (`INPUT`, `textarea`).
pub fn allows_selection(tag_name: &str, content_editable: bool) -> bool {
    content_editable
        || ["INPUT", "TEXTAREA", "SELECT"]
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(tag_name))
}

/// `document.readyState` ещё до DOMContentLoaded
pub fn document_is_loading(ready_state: &str) -> bool {
    ready_state == "loading"
}

/// События, которые подавляет copy guard
pub const GUARDED_EVENTS: [&str; 4] = ["selectstart", "copy", "cut", "contextmenu"];
