// Telegram.WebApp для WASM
// Обертка над window.Telegram.WebApp: каждый член проверяется перед вызовом

use js_sys::{Array, Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::host::{
    Haptic, HostApi, HostCapabilities, HostEvent, HostEventKind, HostInfo, MainButtonParams,
    PopupParams, SafeAreaInsets, ThemeParams, ViewportState,
};
use crate::utils::error::{Result, SiteError};

/// Хост Telegram Mini App
pub struct TelegramWebApp {
    web_app: JsValue,
    capabilities: HostCapabilities,
}

fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn js_error(call: &str, error: JsValue) -> SiteError {
    SiteError::HostCallError(format!("{}: {:?}", call, error))
}

fn insets(web_app: &JsValue, key: &str) -> Option<SafeAreaInsets> {
    get(web_app, key).and_then(|value| serde_wasm_bindgen::from_value(value).ok())
}

fn read_viewport(web_app: &JsValue) -> ViewportState {
    ViewportState {
        viewport_height: get(web_app, "viewportHeight")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0),
        viewport_stable_height: get(web_app, "viewportStableHeight")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0),
        is_expanded: get(web_app, "isExpanded")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        is_state_stable: true,
        content_safe_area_insets: insets(web_app, "contentSafeAreaInsets"),
        safe_area_insets: insets(web_app, "safeAreaInsets"),
    }
}

impl TelegramWebApp {
    /// Найти `window.Telegram.WebApp`
    ///
    /// Скрипт telegram-web-app.js создаёт объект и в обычном браузере, поэтому
    /// без initData и с platform "unknown" хост считается отсутствующим.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let telegram = get(window.as_ref(), "Telegram")?;
        let web_app = get(&telegram, "WebApp")?;

        let platform = get(&web_app, "platform").and_then(|v| v.as_string());
        let init_data = get(&web_app, "initData").and_then(|v| v.as_string());
        let outside_telegram = platform.as_deref().map_or(true, |p| p == "unknown")
            && init_data.as_deref().map_or(true, str::is_empty);
        if outside_telegram {
            tracing::debug!(target: "site::host", "Telegram script loaded outside Telegram");
            return None;
        }

        let capabilities = HostCapabilities::detect(|name| get(&web_app, name).is_some());
        Some(Self {
            web_app,
            capabilities,
        })
    }

    fn child(&self, name: &str) -> Result<JsValue> {
        get(&self.web_app, name).ok_or_else(|| SiteError::unavailable(name))
    }

    fn method(target: &JsValue, name: &str) -> Result<Function> {
        get(target, name)
            .and_then(|value| value.dyn_into::<Function>().ok())
            .ok_or_else(|| SiteError::unavailable(name))
    }

    fn call_on(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue> {
        let method = Self::method(target, name)?;
        let args = args.iter().collect::<Array>();
        method.apply(target, &args).map_err(|e| js_error(name, e))
    }

    fn call(&self, name: &str, args: &[JsValue]) -> Result<()> {
        Self::call_on(&self.web_app, name, args).map(|_| ())
    }

    /// Вызвать колбэчный API и дождаться единственного вызова колбэка
    ///
    /// Колбэк получает до двух аргументов (CloudStorage передаёт `error, value`).
    async fn await_callback(
        &self,
        target: &JsValue,
        name: &str,
        args: &[JsValue],
    ) -> Result<(JsValue, JsValue)> {
        let method = Self::method(target, name)?;
        let mut failure = None;

        let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
            let callback = Closure::once_into_js(move |first: JsValue, second: JsValue| {
                let _ = resolve.call1(&JsValue::NULL, &Array::of2(&first, &second));
            });
            let call_args = args.iter().cloned().chain(std::iter::once(callback)).collect::<Array>();
            if let Err(err) = method.apply(target, &call_args) {
                failure = Some(err);
            }
        });

        if let Some(err) = failure {
            return Err(js_error(name, err));
        }

        let result = JsFuture::from(promise)
            .await
            .map_err(|e| js_error(name, e))?;
        let pair: Array = result.unchecked_into();
        Ok((pair.get(0), pair.get(1)))
    }
}

impl HostApi for TelegramWebApp {
    fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    fn info(&self) -> HostInfo {
        let string = |key: &str| get(&self.web_app, key).and_then(|v| v.as_string());
        HostInfo {
            version: string("version"),
            platform: string("platform"),
            color_scheme: string("colorScheme"),
        }
    }

    fn ready(&self) -> Result<()> {
        self.call("ready", &[])
    }

    fn expand(&self) -> Result<()> {
        self.call("expand", &[])
    }

    fn theme_params(&self) -> Result<ThemeParams> {
        let params = self.child("themeParams")?;
        Ok(serde_wasm_bindgen::from_value(params)?)
    }

    fn set_header_color(&self, color: &str) -> Result<()> {
        self.call("setHeaderColor", &[JsValue::from_str(color)])
    }

    fn set_background_color(&self, color: &str) -> Result<()> {
        self.call("setBackgroundColor", &[JsValue::from_str(color)])
    }

    fn viewport(&self) -> Result<ViewportState> {
        Ok(read_viewport(&self.web_app))
    }

    fn enable_closing_confirmation(&self) -> Result<()> {
        self.call("enableClosingConfirmation", &[])
    }

    fn disable_vertical_swipes(&self) -> Result<()> {
        self.call("disableVerticalSwipes", &[])
    }

    fn configure_main_button(&self, params: &MainButtonParams) -> Result<()> {
        let button = self.child("MainButton")?;
        let params = serde_wasm_bindgen::to_value(params)?;
        Self::call_on(&button, "setParams", &[params]).map(|_| ())
    }

    fn show_main_button(&self) -> Result<()> {
        let button = self.child("MainButton")?;
        Self::call_on(&button, "show", &[]).map(|_| ())
    }

    fn hide_back_button(&self) -> Result<()> {
        let button = self.child("BackButton")?;
        Self::call_on(&button, "hide", &[]).map(|_| ())
    }

    fn subscribe(&self, kind: HostEventKind, mut handler: Box<dyn FnMut(HostEvent)>) -> Result<()> {
        // Клики кнопок идут через их собственный onClick, остальное через onEvent
        let (target, method, mut args) = match kind {
            HostEventKind::MainButtonClicked => (self.child("MainButton")?, "onClick", Vec::new()),
            HostEventKind::BackButtonClicked => (self.child("BackButton")?, "onClick", Vec::new()),
            _ => (self.web_app.clone(), "onEvent", vec![JsValue::from_str(kind.name())]),
        };

        let web_app = self.web_app.clone();
        let closure = Closure::wrap(Box::new(move |payload: JsValue| {
            let event = match kind {
                HostEventKind::ThemeChanged => HostEvent::ThemeChanged,
                HostEventKind::ViewportChanged => {
                    let mut viewport = read_viewport(&web_app);
                    viewport.is_state_stable = get(&payload, "isStateStable")
                        .and_then(|v| v.as_bool())
                        .unwrap_or(true);
                    HostEvent::ViewportChanged(viewport)
                }
                HostEventKind::Activated => HostEvent::VisibilityChanged { visible: true },
                HostEventKind::Deactivated => HostEvent::VisibilityChanged { visible: false },
                HostEventKind::MainButtonClicked => HostEvent::MainButtonClicked,
                HostEventKind::BackButtonClicked => HostEvent::BackButtonClicked,
            };
            handler(event);
        }) as Box<dyn FnMut(JsValue)>);

        args.push(closure.as_ref().clone());
        Self::call_on(&target, method, &args)?;
        closure.forget();
        Ok(())
    }

    fn haptic(&self, feedback: Haptic) -> Result<()> {
        let haptic = self.child("HapticFeedback")?;
        let result = match feedback {
            Haptic::Impact(style) => {
                Self::call_on(&haptic, "impactOccurred", &[JsValue::from_str(style.as_str())])
            }
            Haptic::Notification(kind) => {
                Self::call_on(&haptic, "notificationOccurred", &[JsValue::from_str(kind.as_str())])
            }
            Haptic::Selection => Self::call_on(&haptic, "selectionChanged", &[]),
        };
        result.map(|_| ())
    }

    async fn show_popup(&self, params: &PopupParams) -> Result<Option<String>> {
        let params = serde_wasm_bindgen::to_value(params)?;
        let (button_id, _) = self.await_callback(&self.web_app, "showPopup", &[params]).await?;
        Ok(button_id.as_string().filter(|id| !id.is_empty()))
    }

    async fn show_confirm(&self, message: &str) -> Result<bool> {
        let (accepted, _) = self
            .await_callback(&self.web_app, "showConfirm", &[JsValue::from_str(message)])
            .await?;
        Ok(accepted.as_bool().unwrap_or(false))
    }

    fn open_link(&self, url: &str) -> Result<()> {
        self.call("openLink", &[JsValue::from_str(url)])
    }

    fn open_telegram_link(&self, url: &str) -> Result<()> {
        self.call("openTelegramLink", &[JsValue::from_str(url)])
    }

    async fn cloud_get(&self, key: &str) -> Result<Option<String>> {
        let storage = self.child("CloudStorage")?;
        let (error, value) = self
            .await_callback(&storage, "getItem", &[JsValue::from_str(key)])
            .await?;
        if !error.is_null() && !error.is_undefined() {
            return Err(js_error("CloudStorage.getItem", error));
        }
        // Отсутствующий ключ приходит пустой строкой
        Ok(value.as_string().filter(|v| !v.is_empty()))
    }

    async fn cloud_set(&self, key: &str, value: &str) -> Result<bool> {
        let storage = self.child("CloudStorage")?;
        let (error, stored) = self
            .await_callback(
                &storage,
                "setItem",
                &[JsValue::from_str(key), JsValue::from_str(value)],
            )
            .await?;
        if !error.is_null() && !error.is_undefined() {
            return Err(js_error("CloudStorage.setItem", error));
        }
        Ok(stored.as_bool().unwrap_or(false))
    }
}
