//! Фейковые реализации Ticker, HostApi и Page для интеграционных тестов

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use vizitka_core::host::{
    Haptic, HostApi, HostCapabilities, HostEvent, HostEventKind, HostInfo, MainButtonParams,
    PopupParams, ThemeParams, ViewportState,
};
use vizitka_core::page::{LocalTask, Page};
use vizitka_core::slider::{SlideView, Ticker};
use vizitka_core::{Result, SiteError};

// ===== Часы =====

struct Scheduled {
    period: u64,
    next_due: u64,
    tick: Option<Box<dyn FnMut()>>,
    cancelled: Rc<Cell<bool>>,
}

#[derive(Default)]
struct ClockState {
    now: u64,
    created: usize,
    intervals: Vec<Scheduled>,
}

/// Детерминированные часы: интервалы срабатывают только в `advance`
#[derive(Clone, Default)]
pub struct FakeTicker {
    state: Rc<RefCell<ClockState>>,
}

pub struct FakeHandle {
    cancelled: Rc<Cell<bool>>,
}

impl Drop for FakeHandle {
    fn drop(&mut self) {
        self.cancelled.set(true);
    }
}

impl Ticker for FakeTicker {
    type Handle = FakeHandle;

    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> FakeHandle {
        let cancelled = Rc::new(Cell::new(false));
        let mut state = self.state.borrow_mut();
        let now = state.now;
        state.created += 1;
        state.intervals.push(Scheduled {
            period: period_ms as u64,
            next_due: now + period_ms as u64,
            tick: Some(tick),
            cancelled: cancelled.clone(),
        });
        FakeHandle { cancelled }
    }
}

impl FakeTicker {
    pub fn now(&self) -> u64 {
        self.state.borrow().now
    }

    /// Сколько интервалов было создано за всё время
    pub fn created(&self) -> usize {
        self.state.borrow().created
    }

    /// Сколько интервалов сейчас не отменено
    pub fn live(&self) -> usize {
        self.state
            .borrow()
            .intervals
            .iter()
            .filter(|s| !s.cancelled.get())
            .count()
    }

    /// Продвинуть время, вызывая интервалы в порядке срабатывания
    pub fn advance(&self, ms: u64) {
        let target = self.state.borrow().now + ms;
        loop {
            let due = {
                let mut state = self.state.borrow_mut();
                state.intervals.retain(|s| !s.cancelled.get());
                state
                    .intervals
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.next_due <= target)
                    .min_by_key(|(_, s)| s.next_due)
                    .map(|(i, s)| (i, s.next_due))
            };
            let Some((index, due)) = due else {
                break;
            };

            let (mut tick, cancelled) = {
                let mut state = self.state.borrow_mut();
                state.now = due;
                let scheduled = &mut state.intervals[index];
                scheduled.next_due += scheduled.period;
                (scheduled.tick.take().unwrap(), scheduled.cancelled.clone())
            };

            tick();

            if !cancelled.get() {
                let mut state = self.state.borrow_mut();
                if let Some(scheduled) = state
                    .intervals
                    .iter_mut()
                    .find(|s| Rc::ptr_eq(&s.cancelled, &cancelled))
                {
                    scheduled.tick = Some(tick);
                }
            }
        }
        self.state.borrow_mut().now = target;
    }
}

// ===== Слайды =====

/// Слайды как вектор флагов "active"
#[derive(Clone)]
pub struct FlagSlides {
    pub flags: Rc<RefCell<Vec<bool>>>,
}

impl FlagSlides {
    pub fn new(n: usize) -> Self {
        Self {
            flags: Rc::new(RefCell::new(vec![false; n])),
        }
    }

    pub fn active_count(&self) -> usize {
        self.flags.borrow().iter().filter(|f| **f).count()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.flags.borrow().iter().position(|f| *f)
    }
}

impl SlideView for FlagSlides {
    fn len(&self) -> usize {
        self.flags.borrow().len()
    }

    fn apply(&mut self, _previous: Option<usize>, active: usize) {
        for (i, flag) in self.flags.borrow_mut().iter_mut().enumerate() {
            *flag = i == active;
        }
    }
}

// ===== Хост =====

#[derive(Debug, Default)]
pub struct HostLog {
    /// Все обращения, включая недоступные
    pub attempts: Vec<String>,
    pub calls: Vec<String>,
    pub header_colors: Vec<String>,
    pub background_colors: Vec<String>,
    pub main_button_params: Vec<MainButtonParams>,
    pub main_button_shows: usize,
    pub haptics: Vec<Haptic>,
    pub popups: Vec<PopupParams>,
    pub opened_links: Vec<String>,
    pub opened_telegram_links: Vec<String>,
    pub subscribed: Vec<HostEventKind>,
}

pub struct FakeHost {
    pub caps: HostCapabilities,
    pub theme: RefCell<ThemeParams>,
    pub viewport: RefCell<ViewportState>,
    pub popup_answer: RefCell<Result<Option<String>>>,
    pub confirm_answer: RefCell<Result<bool>>,
    /// Вызовы, которые "бросают исключение"
    pub failing: RefCell<HashSet<&'static str>>,
    pub cloud: RefCell<HashMap<String, String>>,
    pub log: RefCell<HostLog>,
    handlers: RefCell<HashMap<HostEventKind, Vec<Box<dyn FnMut(HostEvent)>>>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::with_capabilities(HostCapabilities::all())
    }

    pub fn with_capabilities(caps: HostCapabilities) -> Self {
        Self {
            caps,
            theme: RefCell::new(ThemeParams::default()),
            viewport: RefCell::new(ViewportState::default()),
            popup_answer: RefCell::new(Ok(None)),
            confirm_answer: RefCell::new(Ok(false)),
            failing: RefCell::new(HashSet::new()),
            cloud: RefCell::new(HashMap::new()),
            log: RefCell::new(HostLog::default()),
            handlers: RefCell::new(HashMap::new()),
        }
    }

    pub fn answer_popup(self, button_id: &str) -> Self {
        *self.popup_answer.borrow_mut() = Ok(Some(button_id.to_string()));
        self
    }

    pub fn fail(self, call: &'static str) -> Self {
        self.failing.borrow_mut().insert(call);
        self
    }

    /// Доставить событие подписчикам (как это делает Telegram)
    pub fn fire(&self, kind: HostEventKind, event: HostEvent) {
        let mut handlers = self.handlers.borrow_mut().remove(&kind).unwrap_or_default();
        for handler in handlers.iter_mut() {
            handler(event.clone());
        }
        self.handlers.borrow_mut().entry(kind).or_default().extend(handlers);
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().calls.clone()
    }

    pub fn attempts(&self) -> Vec<String> {
        self.log.borrow().attempts.clone()
    }

    fn gate(&self, available: bool, call: &'static str) -> Result<()> {
        self.log.borrow_mut().attempts.push(call.to_string());
        if !available {
            return Err(SiteError::unavailable(call));
        }
        if self.failing.borrow().contains(call) {
            return Err(SiteError::HostCallError(format!("{} threw", call)));
        }
        self.log.borrow_mut().calls.push(call.to_string());
        Ok(())
    }
}

impl HostApi for FakeHost {
    fn capabilities(&self) -> HostCapabilities {
        self.caps
    }

    fn info(&self) -> HostInfo {
        HostInfo {
            version: Some("8.0".to_string()),
            platform: Some("ios".to_string()),
            color_scheme: Some("light".to_string()),
        }
    }

    fn ready(&self) -> Result<()> {
        self.gate(self.caps.ready, "ready")
    }

    fn expand(&self) -> Result<()> {
        self.gate(self.caps.expand, "expand")
    }

    fn theme_params(&self) -> Result<ThemeParams> {
        self.gate(self.caps.theming, "themeParams")?;
        Ok(self.theme.borrow().clone())
    }

    fn set_header_color(&self, color: &str) -> Result<()> {
        self.gate(self.caps.theming, "setHeaderColor")?;
        self.log.borrow_mut().header_colors.push(color.to_string());
        Ok(())
    }

    fn set_background_color(&self, color: &str) -> Result<()> {
        self.gate(self.caps.theming, "setBackgroundColor")?;
        self.log.borrow_mut().background_colors.push(color.to_string());
        Ok(())
    }

    fn viewport(&self) -> Result<ViewportState> {
        Ok(*self.viewport.borrow())
    }

    fn enable_closing_confirmation(&self) -> Result<()> {
        self.gate(self.caps.closing_confirmation, "enableClosingConfirmation")
    }

    fn disable_vertical_swipes(&self) -> Result<()> {
        self.gate(self.caps.vertical_swipes, "disableVerticalSwipes")
    }

    fn configure_main_button(&self, params: &MainButtonParams) -> Result<()> {
        self.gate(self.caps.main_button, "MainButton.setParams")?;
        self.log.borrow_mut().main_button_params.push(params.clone());
        Ok(())
    }

    fn show_main_button(&self) -> Result<()> {
        self.gate(self.caps.main_button, "MainButton.show")?;
        self.log.borrow_mut().main_button_shows += 1;
        Ok(())
    }

    fn hide_back_button(&self) -> Result<()> {
        self.gate(self.caps.back_button, "BackButton.hide")
    }

    fn subscribe(&self, kind: HostEventKind, handler: Box<dyn FnMut(HostEvent)>) -> Result<()> {
        let available = match kind {
            HostEventKind::MainButtonClicked => self.caps.main_button,
            HostEventKind::BackButtonClicked => self.caps.back_button,
            _ => self.caps.events,
        };
        self.gate(available, kind.name())?;
        self.log.borrow_mut().subscribed.push(kind);
        self.handlers.borrow_mut().entry(kind).or_default().push(handler);
        Ok(())
    }

    fn haptic(&self, feedback: Haptic) -> Result<()> {
        self.gate(self.caps.haptics, "HapticFeedback")?;
        self.log.borrow_mut().haptics.push(feedback);
        Ok(())
    }

    async fn show_popup(&self, params: &PopupParams) -> Result<Option<String>> {
        self.gate(self.caps.popup, "showPopup")?;
        self.log.borrow_mut().popups.push(params.clone());
        self.popup_answer.borrow().clone()
    }

    async fn show_confirm(&self, _message: &str) -> Result<bool> {
        self.gate(self.caps.confirm, "showConfirm")?;
        self.confirm_answer.borrow().clone()
    }

    fn open_link(&self, url: &str) -> Result<()> {
        self.gate(self.caps.open_link, "openLink")?;
        self.log.borrow_mut().opened_links.push(url.to_string());
        Ok(())
    }

    fn open_telegram_link(&self, url: &str) -> Result<()> {
        self.gate(self.caps.open_telegram_link, "openTelegramLink")?;
        self.log.borrow_mut().opened_telegram_links.push(url.to_string());
        Ok(())
    }

    async fn cloud_get(&self, key: &str) -> Result<Option<String>> {
        self.gate(self.caps.cloud_storage, "CloudStorage.getItem")?;
        Ok(self.cloud.borrow().get(key).cloned())
    }

    async fn cloud_set(&self, key: &str, value: &str) -> Result<bool> {
        self.gate(self.caps.cloud_storage, "CloudStorage.setItem")?;
        self.cloud.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(true)
    }
}

// ===== Страница =====

#[derive(Debug, Default)]
pub struct PageLog {
    pub contact_buttons_hidden: Option<bool>,
    pub css: HashMap<String, String>,
    pub spacing_fixes: usize,
    pub copy_guards: usize,
    pub confirms: Vec<String>,
    pub navigated: Vec<String>,
    pub opened_windows: Vec<String>,
    pub history_back: usize,
    pub scheduled: Vec<u32>,
}

pub struct FakePage {
    pub confirm_answer: Cell<bool>,
    pub storage: RefCell<HashMap<String, String>>,
    pub log: RefCell<PageLog>,
    contact_handlers: RefCell<Vec<Rc<dyn Fn()>>>,
    scroll_handlers: RefCell<Vec<Box<dyn FnMut(f64)>>>,
    tasks: RefCell<Vec<LocalTask>>,
    timers: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            confirm_answer: Cell::new(false),
            storage: RefCell::new(HashMap::new()),
            log: RefCell::new(PageLog::default()),
            contact_handlers: RefCell::new(Vec::new()),
            scroll_handlers: RefCell::new(Vec::new()),
            tasks: RefCell::new(Vec::new()),
            timers: RefCell::new(Vec::new()),
        }
    }

    pub fn confirming(self, answer: bool) -> Self {
        self.confirm_answer.set(answer);
        self
    }

    pub fn contact_handler_count(&self) -> usize {
        self.contact_handlers.borrow().len()
    }

    /// Клик по кнопке "Связаться"
    pub fn click_contact(&self) {
        let handler = self.contact_handlers.borrow().first().cloned();
        if let Some(handler) = handler {
            handler();
        }
    }

    pub fn scroll_to(&self, scroll_top: f64) {
        let mut handlers: Vec<_> = self.scroll_handlers.borrow_mut().drain(..).collect();
        for handler in handlers.iter_mut() {
            handler(scroll_top);
        }
        self.scroll_handlers.borrow_mut().extend(handlers);
    }

    /// Выполнить все запущенные async-задачи до завершения
    pub fn run_tasks(&self) -> usize {
        let mut count = 0;
        loop {
            let tasks: Vec<LocalTask> = self.tasks.borrow_mut().drain(..).collect();
            if tasks.is_empty() {
                return count;
            }
            for task in tasks {
                futures::executor::block_on(task);
                count += 1;
            }
        }
    }

    /// Сработать все отложенные вызовы
    pub fn run_timers(&self) {
        let timers: Vec<_> = self.timers.borrow_mut().drain(..).collect();
        for timer in timers {
            timer();
        }
    }
}

impl Page for FakePage {
    fn set_contact_buttons_hidden(&self, hidden: bool) {
        self.log.borrow_mut().contact_buttons_hidden = Some(hidden);
    }

    fn on_contact_click(&self, handler: Rc<dyn Fn()>) {
        self.contact_handlers.borrow_mut().push(handler);
    }

    fn on_scroll(&self, handler: Box<dyn FnMut(f64)>) {
        self.scroll_handlers.borrow_mut().push(handler);
    }

    fn set_css_variable(&self, name: &str, value: &str) {
        self.log.borrow_mut().css.insert(name.to_string(), value.to_string());
    }

    fn apply_bottom_spacing_fix(&self) {
        self.log.borrow_mut().spacing_fixes += 1;
    }

    fn install_copy_guard(&self) {
        self.log.borrow_mut().copy_guards += 1;
    }

    fn confirm(&self, message: &str) -> bool {
        self.log.borrow_mut().confirms.push(message.to_string());
        self.confirm_answer.get()
    }

    fn navigate(&self, url: &str) {
        self.log.borrow_mut().navigated.push(url.to_string());
    }

    fn open_window(&self, url: &str) {
        self.log.borrow_mut().opened_windows.push(url.to_string());
    }

    fn history_back(&self) {
        self.log.borrow_mut().history_back += 1;
    }

    fn storage_get(&self, key: &str) -> Option<String> {
        self.storage.borrow().get(key).cloned()
    }

    fn storage_set(&self, key: &str, value: &str) -> bool {
        self.storage.borrow_mut().insert(key.to_string(), value.to_string());
        true
    }

    fn spawn(&self, task: LocalTask) {
        self.tasks.borrow_mut().push(task);
    }

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        self.log.borrow_mut().scheduled.push(delay_ms);
        self.timers.borrow_mut().push(task);
    }
}
