// WASM bindings

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use crate::config::{Config, ConfigOverrides};
use crate::host::HostEnvironment;
use crate::page::document_is_loading;
use crate::slider::{AutoRotator, Transition, VisibilityPolicy};
use crate::state::{MountState, SiteAdapter};
use crate::utils::error::{Result, SiteError};
use crate::utils::logging::init_logging;
use crate::wasm::dom::{self, DomPage, DomSlides};
use crate::wasm::telegram::TelegramWebApp;
use crate::wasm::timers::IntervalTicker;

type DomRotator = AutoRotator<DomSlides, IntervalTicker>;
type DomAdapter = SiteAdapter<TelegramWebApp, DomPage>;

/// Всё, что должно жить до закрытия страницы
struct Site {
    adapter: Rc<DomAdapter>,
    // Обработчики кнопок держат только Weak
    _sliders: Vec<Rc<DomRotator>>,
}

// Глобальное состояние страницы (WASM однопоточный)
thread_local! {
    static SITE: RefCell<Option<Site>> = const { RefCell::new(None) };
    static MOUNT: Cell<MountState> = const { Cell::new(MountState::Idle) };
}

#[wasm_bindgen(start)]
pub fn start() {
    init_logging(log::Level::Info);
}

/// Запустить сайт с конфигурацией по умолчанию
#[wasm_bindgen]
pub fn boot() -> std::result::Result<(), JsValue> {
    boot_with(Config::global().clone())
}

/// Запустить сайт с частичной конфигурацией из JS-объекта
#[wasm_bindgen]
pub fn boot_with_config(overrides: JsValue) -> std::result::Result<(), JsValue> {
    let overrides: ConfigOverrides = if overrides.is_undefined() || overrides.is_null() {
        ConfigOverrides::default()
    } else {
        serde_wasm_bindgen::from_value(overrides).map_err(SiteError::from)?
    };
    let config = Config::global().clone().with_overrides(overrides);
    config.validate()?;
    boot_with(config)
}

fn update_mount<R>(f: impl FnOnce(&mut MountState) -> R) -> R {
    MOUNT.with(|cell| {
        let mut state = cell.get();
        let result = f(&mut state);
        cell.set(state);
        result
    })
}

fn boot_with(config: Config) -> std::result::Result<(), JsValue> {
    if !update_mount(MountState::begin) {
        tracing::debug!(target: "site::boot", "Site already mounted or mount pending");
        return Ok(());
    }

    let document = match web_sys::window().and_then(|window| window.document()) {
        Some(document) => document,
        None => {
            update_mount(MountState::fail);
            return Err(SiteError::MissingElement("document".to_string()).into());
        }
    };

    if document_is_loading(&document.ready_state()) {
        let on_ready = Closure::once_into_js(move || {
            if let Err(err) = finish_mount(config) {
                tracing::error!(target: "site::boot", error = %err, "Mount failed");
            }
        });
        if let Err(err) = document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref()) {
            update_mount(MountState::fail);
            return Err(err);
        }
        return Ok(());
    }

    finish_mount(config).map_err(Into::into)
}

fn finish_mount(config: Config) -> Result<()> {
    let result = mount(config);
    if result.is_ok() {
        update_mount(MountState::finish);
    } else {
        update_mount(MountState::fail);
    }
    result
}

fn mount(config: Config) -> Result<()> {
    let page = DomPage::new(&config)?;
    let window = page.window().clone();
    let document = page.document().clone();

    let sliders: Vec<Rc<DomRotator>> = [
        (&config.hero_slide_selector, &config.hero_button_selector),
        (&config.speaker_slide_selector, &config.speaker_button_selector),
    ]
    .into_iter()
    .filter_map(|(slides, buttons)| mount_slider(&document, slides, buttons, &config))
    .collect();
    install_visibility_listener(&document, &sliders);

    let anchors = dom::install_smooth_scroll(&document, &config.anchor_selector);
    dom::install_lazy_images(&window, &document, &config);

    let env = HostEnvironment::from_option(TelegramWebApp::detect());
    let adapter = SiteAdapter::new(env, page, config);
    if let Err(err) = adapter.init() {
        tracing::debug!(target: "site::boot", error = %err, "Adapter init skipped");
    }

    tracing::info!(
        target: "site::boot",
        sliders = sliders.len(),
        anchors,
        telegram = adapter.is_telegram(),
        "Site mounted"
    );

    SITE.with(|site| {
        *site.borrow_mut() = Some(Site {
            adapter,
            _sliders: sliders,
        });
    });
    Ok(())
}

fn mount_slider(
    document: &Document,
    slides_selector: &str,
    buttons_selector: &str,
    config: &Config,
) -> Option<Rc<DomRotator>> {
    let slides: Vec<HtmlElement> = dom::query_all(document, slides_selector);
    let view = DomSlides::new(slides, Transition::from_config(config), &config.active_slide_class);
    let rotator = Rc::new(AutoRotator::start(
        view,
        IntervalTicker,
        config.slide_interval_ms,
        VisibilityPolicy::from_config(config),
    )?);

    for (action, forward) in [("next", true), ("prev", false)] {
        let selector = format!("{}[data-action=\"{}\"]", buttons_selector, action);
        let Ok(Some(button)) = document.query_selector(&selector) else {
            continue;
        };
        let weak = Rc::downgrade(&rotator);
        dom::listen(&button, "click", move |_event| {
            if let Some(rotator) = weak.upgrade() {
                if forward {
                    rotator.show_next();
                } else {
                    rotator.show_previous();
                }
            }
        });
    }

    Some(rotator)
}

fn install_visibility_listener(document: &Document, sliders: &[Rc<DomRotator>]) {
    if sliders.is_empty() {
        return;
    }
    let weak: Vec<_> = sliders.iter().map(Rc::downgrade).collect();
    let doc = document.clone();
    dom::listen(document, "visibilitychange", move |_event| {
        let hidden = doc.hidden();
        for rotator in weak.iter().filter_map(|w| w.upgrade()) {
            rotator.handle_visibility(hidden);
        }
    });
}

fn adapter() -> Result<Rc<DomAdapter>> {
    SITE.with(|site| {
        site.borrow()
            .as_ref()
            .map(|site| Rc::clone(&site.adapter))
            .ok_or(SiteError::NotInitialized)
    })
}

/// Открыть выбор способа связи (для произвольных кнопок на странице)
#[wasm_bindgen]
pub fn open_contact() -> std::result::Result<(), JsValue> {
    adapter()?.spawn_contact();
    Ok(())
}

/// Запущен ли сайт внутри Telegram
#[wasm_bindgen]
pub fn is_in_telegram() -> bool {
    adapter().map(|a| a.is_telegram()).unwrap_or(false)
}

/// Отладочная информация о хосте
#[wasm_bindgen]
pub fn debug_info() -> std::result::Result<JsValue, JsValue> {
    let info = adapter()?.debug_info();
    Ok(serde_wasm_bindgen::to_value(&info).map_err(SiteError::from)?)
}

/// Прочитать значение (CloudStorage или localStorage)
#[wasm_bindgen]
pub async fn storage_get(key: String) -> std::result::Result<JsValue, JsValue> {
    let adapter = adapter()?;
    Ok(adapter
        .load_value(&key)
        .await
        .map(JsValue::from)
        .unwrap_or(JsValue::NULL))
}

/// Сохранить значение (CloudStorage или localStorage)
#[wasm_bindgen]
pub async fn storage_set(key: String, value: String) -> std::result::Result<bool, JsValue> {
    let adapter = adapter()?;
    Ok(adapter.save_value(&key, &value).await)
}
