// Адаптер сайта: один экземпляр на страницу
//
// Ветка (есть хост / нет хоста) определяется один раз при создании.
// Все флаги страницы хранятся в AdapterState.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::config::Config;
use crate::contact::{contact_popup, ContactChannel, ContactLinks};
use crate::host::{
    Haptic, HostApi, HostCapabilities, HostEnvironment, HostEvent, HostEventKind, HostInfo,
    ImpactStyle, NotificationKind, ThemePlan, ViewportState,
};
use crate::page::Page;
use crate::utils::error::{Result, SiteError};

const HOST_TARGET: &str = "site::host";

/// Изменяемое состояние адаптера
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdapterState {
    pub initialized: bool,
    /// MainButton настроена и заменяет кнопки страницы
    pub main_button_active: bool,
    pub last_scroll_top: f64,
    pub theme_applications: u32,
    pub layout_applications: u32,
    pub visible: bool,
    /// Выбор способа связи уже идёт (popup открыт)
    pub contact_pending: bool,
}

/// Снимок для отладки (`debug_info()` в JS)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub is_telegram: bool,
    pub host: HostInfo,
    pub capabilities: HostCapabilities,
    pub viewport: Option<ViewportState>,
    pub main_button_active: bool,
}

pub struct SiteAdapter<H: HostApi, P: Page> {
    env: HostEnvironment<H>,
    capabilities: HostCapabilities,
    page: P,
    config: Config,
    links: ContactLinks,
    state: RefCell<AdapterState>,
}

impl<H, P> SiteAdapter<H, P>
where
    H: HostApi + 'static,
    P: Page + 'static,
{
    pub fn new(env: HostEnvironment<H>, page: P, config: Config) -> Rc<Self> {
        let links = ContactLinks::new(&config);
        let capabilities = env.capabilities();
        Rc::new(Self {
            env,
            capabilities,
            page,
            config,
            links,
            state: RefCell::new(AdapterState {
                visible: true,
                ..Default::default()
            }),
        })
    }

    /// Настроить страницу под найденное окружение
    ///
    /// # Errors
    ///
    /// `SiteError::AlreadyInitialized` при повторном вызове; повтор ничего не меняет.
    pub fn init(self: &Rc<Self>) -> Result<()> {
        {
            let mut state = self.state.borrow_mut();
            if state.initialized {
                return Err(SiteError::AlreadyInitialized);
            }
            state.initialized = true;
        }

        match &self.env {
            HostEnvironment::Present(host) => self.setup_host(host),
            HostEnvironment::Absent => self.setup_browser(),
        }
        Ok(())
    }

    pub fn is_telegram(&self) -> bool {
        self.env.is_present()
    }

    pub fn state(&self) -> AdapterState {
        self.state.borrow().clone()
    }

    pub fn links(&self) -> &ContactLinks {
        &self.links
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn host(&self) -> Option<&H> {
        self.env.host()
    }

    // ===== Настройка =====

    fn setup_host(self: &Rc<Self>, host: &H) {
        let info = host.info();
        tracing::info!(
            target: HOST_TARGET,
            version = info.version.as_deref().unwrap_or("unknown"),
            platform = info.platform.as_deref().unwrap_or("unknown"),
            "Telegram WebApp detected"
        );

        let caps = self.capabilities;
        self.call_host(caps.ready, "ready", || host.ready());
        self.call_host(caps.expand, "expand", || host.expand());

        // Защита от закрытия свайпом
        self.call_host(caps.closing_confirmation, "enableClosingConfirmation", || {
            host.enable_closing_confirmation()
        });
        self.call_host(caps.vertical_swipes, "disableVerticalSwipes", || {
            host.disable_vertical_swipes()
        });

        let plan = self.apply_theme();
        self.setup_main_button(host, &plan);
        self.call_host(caps.back_button, "BackButton.hide", || host.hide_back_button());
        self.subscribe_events(host);
        self.apply_layout();
        self.page.install_copy_guard();
    }

    fn setup_browser(self: &Rc<Self>) {
        tracing::info!(target: HOST_TARGET, "Telegram WebApp not detected, browser mode");
        self.page.set_contact_buttons_hidden(false);
        self.wire_contact_buttons();
    }

    fn wire_contact_buttons(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        self.page.on_contact_click(Rc::new(move || {
            if let Some(adapter) = weak.upgrade() {
                adapter.spawn_contact();
            }
        }));
    }

    fn setup_main_button(self: &Rc<Self>, host: &H, plan: &ThemePlan) {
        let configured = self.call_host(self.capabilities.main_button, "MainButton.setParams", || {
            host.configure_main_button(&plan.main_button)
        });
        if configured.is_none() {
            // Без MainButton остаются обычные кнопки страницы
            self.page.set_contact_buttons_hidden(false);
            self.wire_contact_buttons();
            return;
        }

        self.state.borrow_mut().main_button_active = true;
        self.page.set_contact_buttons_hidden(true);
        self.show_main_button();

        // Некоторые клиенты игнорируют show() до полной загрузки
        for &delay in &self.config.main_button_retry_ms {
            let weak = Rc::downgrade(self);
            self.page.schedule(
                delay,
                Box::new(move || {
                    if let Some(adapter) = weak.upgrade() {
                        adapter.show_main_button();
                    }
                }),
            );
        }

        let weak = Rc::downgrade(self);
        self.page.on_scroll(Box::new(move |scroll_top| {
            if let Some(adapter) = weak.upgrade() {
                adapter.handle_scroll(scroll_top);
            }
        }));
    }

    fn subscribe_events(self: &Rc<Self>, host: &H) {
        let kinds = [
            HostEventKind::ThemeChanged,
            HostEventKind::ViewportChanged,
            HostEventKind::Activated,
            HostEventKind::Deactivated,
            HostEventKind::MainButtonClicked,
            HostEventKind::BackButtonClicked,
        ];

        for kind in kinds {
            let available = match kind {
                HostEventKind::MainButtonClicked => self.capabilities.main_button,
                HostEventKind::BackButtonClicked => self.capabilities.back_button,
                _ => self.capabilities.events,
            };
            let weak = Rc::downgrade(self);
            self.call_host(available, kind.name(), || {
                host.subscribe(
                    kind,
                    Box::new(move |event: HostEvent| {
                        if let Some(adapter) = weak.upgrade() {
                            adapter.handle_event(event);
                        }
                    }),
                )
            });
        }
    }

    // ===== Тема и раскладка =====

    /// Применить цвета хоста и CSS-переменные темы
    pub fn apply_theme(&self) -> ThemePlan {
        let theming = self.capabilities.theming;
        let params = self
            .env
            .host()
            .and_then(|host| self.call_host(theming, "themeParams", || host.theme_params()))
            .unwrap_or_default();
        let plan = ThemePlan::new(&params, &self.config);

        if let Some(host) = self.env.host() {
            self.call_host(theming, "setHeaderColor", || host.set_header_color(&plan.header_color));
            self.call_host(theming, "setBackgroundColor", || {
                host.set_background_color(&plan.background_color)
            });
        }
        for (name, value) in &plan.css_variables {
            self.page.set_css_variable(name, value);
        }

        self.state.borrow_mut().theme_applications += 1;
        plan
    }

    /// Убрать лишние отступы и выставить safe area по текущему viewport
    pub fn apply_layout(&self) {
        let viewport = self
            .env
            .host()
            .and_then(|host| self.guarded("viewport", host.viewport()));
        self.apply_layout_with(viewport);
    }

    fn apply_layout_with(&self, viewport: Option<ViewportState>) {
        self.page.apply_bottom_spacing_fix();
        if let Some(viewport) = viewport {
            for (name, value) in viewport.css_variables() {
                self.page.set_css_variable(name, &value);
            }
            tracing::debug!(
                target: HOST_TARGET,
                height = viewport.viewport_height,
                bottom_inset = viewport.bottom_inset(),
                expanded = viewport.is_expanded,
                "Layout applied"
            );
        }
        self.state.borrow_mut().layout_applications += 1;
    }

    // ===== События =====

    pub fn handle_event(self: &Rc<Self>, event: HostEvent) {
        tracing::trace!(target: HOST_TARGET, ?event, "Host event");
        match event {
            HostEvent::ThemeChanged => self.refresh_theme(),
            HostEvent::ViewportChanged(viewport) => {
                if viewport.is_state_stable {
                    self.apply_layout_with(Some(viewport));
                }
            }
            HostEvent::VisibilityChanged { visible } => {
                self.state.borrow_mut().visible = visible;
                if visible {
                    self.refresh_theme();
                    self.apply_layout();
                }
            }
            HostEvent::MainButtonClicked => self.spawn_contact(),
            HostEvent::BackButtonClicked => {
                self.haptic(Haptic::Impact(ImpactStyle::Light));
                self.page.history_back();
            }
        }
    }

    fn refresh_theme(&self) {
        let plan = self.apply_theme();
        if self.state.borrow().main_button_active {
            if let Some(host) = self.env.host() {
                self.call_host(self.capabilities.main_button, "MainButton.setParams", || {
                    host.configure_main_button(&plan.main_button)
                });
            }
        }
    }

    /// Показывать MainButton при прокрутке вниз за порог
    pub fn handle_scroll(&self, scroll_top: f64) {
        let show = {
            let mut state = self.state.borrow_mut();
            let show = state.main_button_active
                && scroll_top > self.config.scroll_show_threshold_px
                && scroll_top > state.last_scroll_top;
            state.last_scroll_top = scroll_top;
            show
        };
        if show {
            self.show_main_button();
        }
    }

    fn show_main_button(&self) {
        if let Some(host) = self.env.host() {
            self.call_host(self.capabilities.main_button, "MainButton.show", || host.show_main_button());
        }
    }

    // ===== Связаться =====

    /// Запустить выбор способа связи в фоне (обработчики кликов синхронные)
    ///
    /// Пока предыдущий выбор не завершён, повторные клики игнорируются.
    pub fn spawn_contact(self: &Rc<Self>) {
        if !self.begin_contact() {
            return;
        }
        let adapter = Rc::clone(self);
        self.page.spawn(Box::pin(async move {
            adapter.run_contact().await;
            adapter.state.borrow_mut().contact_pending = false;
        }));
    }

    /// Спросить пользователя и открыть выбранную ссылку
    ///
    /// `None`, если выбор уже идёт.
    pub async fn request_contact(&self) -> Option<ContactChannel> {
        if !self.begin_contact() {
            return None;
        }
        let channel = self.run_contact().await;
        self.state.borrow_mut().contact_pending = false;
        Some(channel)
    }

    fn begin_contact(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.contact_pending {
            tracing::debug!(target: "site::contact", "Contact request already in progress");
            return false;
        }
        state.contact_pending = true;
        true
    }

    async fn run_contact(&self) -> ContactChannel {
        let channel = match self.env.host() {
            Some(host) => {
                self.haptic(Haptic::Impact(ImpactStyle::Medium));
                self.choose_in_host(host).await
            }
            None => self.choose_in_browser(),
        };

        tracing::info!(target: "site::contact", ?channel, "Contact channel chosen");
        self.open_channel(channel);
        channel
    }

    async fn choose_in_host(&self, host: &H) -> ContactChannel {
        let caps = self.capabilities;
        if caps.popup {
            match host.show_popup(&contact_popup(&self.config)).await {
                Ok(button_id) => return ContactChannel::from_button_id(button_id.as_deref()),
                Err(err) => {
                    tracing::warn!(target: HOST_TARGET, error = %err, "showPopup failed, trying showConfirm");
                }
            }
        }

        if caps.confirm {
            match host.show_confirm(&self.config.browser_confirm_message).await {
                Ok(accepted) => return ContactChannel::from_confirm(accepted),
                Err(err) => {
                    tracing::warn!(target: HOST_TARGET, error = %err, "showConfirm failed, using browser confirm");
                }
            }
        }

        self.choose_in_browser()
    }

    fn choose_in_browser(&self) -> ContactChannel {
        ContactChannel::from_confirm(self.page.confirm(&self.config.browser_confirm_message))
    }

    fn open_channel(&self, channel: ContactChannel) {
        let Some(url) = self.links.url_for(channel) else {
            self.haptic(Haptic::Selection);
            return;
        };
        self.haptic(Haptic::Notification(NotificationKind::Success));

        let caps = self.capabilities;
        let opened = self.env.host().and_then(|host| match channel {
            ContactChannel::Telegram => {
                self.call_host(caps.open_telegram_link, "openTelegramLink", || host.open_telegram_link(url))
            }
            _ => self.call_host(caps.open_link, "openLink", || host.open_link(url)),
        });

        if opened.is_none() {
            match channel {
                ContactChannel::Telegram => self.page.open_window(url),
                _ => self.page.navigate(url),
            }
        }
    }

    // ===== Хранилище =====

    /// Прочитать значение: CloudStorage хоста, иначе localStorage
    pub async fn load_value(&self, key: &str) -> Option<String> {
        if let Some(host) = self.cloud_host() {
            match host.cloud_get(key).await {
                Ok(value) => return value,
                Err(err) => {
                    tracing::warn!(target: HOST_TARGET, key, error = %err, "CloudStorage.getItem failed");
                }
            }
        }
        self.page.storage_get(key)
    }

    /// Сохранить значение: CloudStorage хоста, иначе localStorage
    pub async fn save_value(&self, key: &str, value: &str) -> bool {
        if let Some(host) = self.cloud_host() {
            match host.cloud_set(key, value).await {
                Ok(stored) => return stored,
                Err(err) => {
                    tracing::warn!(target: HOST_TARGET, key, error = %err, "CloudStorage.setItem failed");
                }
            }
        }
        self.page.storage_set(key, value)
    }

    fn cloud_host(&self) -> Option<&H> {
        self.env.host().filter(|_| self.capabilities.cloud_storage)
    }

    pub fn debug_info(&self) -> DebugInfo {
        let host = self.env.host();
        DebugInfo {
            is_telegram: host.is_some(),
            host: host.map(|h| h.info()).unwrap_or_default(),
            capabilities: self.capabilities,
            viewport: host.and_then(|h| h.viewport().ok()),
            main_button_active: self.state.borrow().main_button_active,
        }
    }

    // ===== Вспомогательное =====

    fn haptic(&self, feedback: Haptic) {
        if let Some(host) = self.env.host() {
            self.call_host(self.capabilities.haptics, "HapticFeedback", || host.haptic(feedback));
        }
    }

    /// Вызвать член хоста, только если он есть в наборе возможностей
    fn call_host<T>(&self, available: bool, call: &str, f: impl FnOnce() -> Result<T>) -> Option<T> {
        if !available {
            tracing::debug!(target: HOST_TARGET, call, "Skipped: capability not detected");
            return None;
        }
        self.guarded(call, f())
    }

    /// Ошибка хоста никогда не всплывает: отсутствие метода пишется в debug,
    /// исключение пишется в warn
    fn guarded<T>(&self, call: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(SiteError::CapabilityUnavailable(name)) => {
                tracing::debug!(target: HOST_TARGET, call, capability = %name, "Host capability unavailable");
                None
            }
            Err(err) => {
                tracing::warn!(target: HOST_TARGET, call, error = %err, "Host call failed");
                None
            }
        }
    }
}
