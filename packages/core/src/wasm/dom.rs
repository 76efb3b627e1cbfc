// DOM: реализация Page, SlideView и DeferredImage поверх web-sys

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, CssStyleDeclaration, Document, Element, Event, EventTarget,
    HtmlElement, HtmlImageElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Node, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    Window,
};

use crate::config::Config;
use crate::page::lazy::{DeferredImage, LazyLoader};
use crate::page::scroll::anchor_target;
use crate::page::{allows_selection, LocalTask, Page, GUARDED_EVENTS};
use crate::slider::{CrossFadePlan, SlideView, Transition};
use crate::utils::error::{Result, SiteError};

const BOTTOM_SPACING_CSS: &str = r#"
html, body, .main-wrapper, .main-container, .project-section-7, .values-banner {
    padding-bottom: 0 !important;
    margin-bottom: 0 !important;
}
body {
    overflow-x: hidden !important;
}
body::after {
    display: none !important;
}
"#;

/// Все элементы по селектору, приведённые к `T`
pub fn query_all<T: JsCast>(document: &Document, selector: &str) -> Vec<T> {
    let list = match document.query_selector_all(selector) {
        Ok(list) => list,
        Err(err) => {
            tracing::warn!(target: "site::dom", selector, error = ?err, "Invalid selector");
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

/// Подписаться на событие навсегда (на время жизни страницы)
pub fn listen<F>(target: &EventTarget, event: &str, handler: F)
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if let Err(err) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        tracing::warn!(target: "site::dom", event, error = ?err, "addEventListener failed");
    }
    closure.forget();
}

// ===== Слайды =====

/// Группа слайдов в DOM
pub struct DomSlides {
    slides: Vec<HtmlElement>,
    transition: Transition,
    active_class: String,
    current: Rc<Cell<usize>>,
    pending_hide: Option<Timeout>,
}

impl DomSlides {
    pub fn new(slides: Vec<HtmlElement>, transition: Transition, active_class: &str) -> Self {
        if let Transition::CrossFade { hide_delay_ms } = transition {
            for slide in &slides {
                let _ = slide
                    .style()
                    .set_property("transition", &format!("opacity {}ms ease", hide_delay_ms));
            }
        }
        Self {
            slides,
            transition,
            active_class: active_class.to_string(),
            current: Rc::new(Cell::new(0)),
            pending_hide: None,
        }
    }

    fn set_visible(slide: &HtmlElement, visible: bool, opacity: &str) {
        let style = slide.style();
        let _ = style.set_property("visibility", if visible { "visible" } else { "hidden" });
        let _ = style.set_property("opacity", opacity);
    }
}

impl SlideView for DomSlides {
    fn len(&self) -> usize {
        self.slides.len()
    }

    fn apply(&mut self, previous: Option<usize>, active: usize) {
        self.current.set(active);

        for (i, slide) in self.slides.iter().enumerate() {
            let _ = slide
                .class_list()
                .toggle_with_force(&self.active_class, i == active);
        }

        let Transition::CrossFade { hide_delay_ms } = self.transition else {
            return;
        };

        // Незавершённое скрытие прошлого перехода отменяется
        self.pending_hide = None;

        let plan = CrossFadePlan::new(self.slides.len(), previous, active);
        Self::set_visible(&self.slides[plan.show], true, "1");
        for &i in &plan.hide {
            Self::set_visible(&self.slides[i], false, "0");
        }

        if let Some(prev) = plan.fade_out {
            let slide = self.slides[prev].clone();
            let _ = slide.style().set_property("opacity", "0");
            let current = Rc::clone(&self.current);
            self.pending_hide = Some(Timeout::new(hide_delay_ms, move || {
                if CrossFadePlan::delayed_hide_applies(prev, current.get()) {
                    Self::set_visible(&slide, false, "0");
                }
            }));
        }
    }
}

// ===== Изображения =====

pub struct DomImage {
    image: HtmlImageElement,
    fade_ms: u32,
}

impl DeferredImage for DomImage {
    fn real_source(&self) -> Option<String> {
        self.image.get_attribute("data-src")
    }

    fn reveal(&self, src: &str) {
        let style = self.image.style();
        let _ = style.set_property("opacity", "0");
        let _ = style.set_property("transition", &format!("opacity {}ms ease", self.fade_ms));

        let image = self.image.clone();
        let onload = Closure::once_into_js(move || {
            let _ = image.style().set_property("opacity", "1");
        });
        self.image.set_onload(Some(onload.unchecked_ref()));
        self.image.set_src(src);
        let _ = self.image.remove_attribute("data-src");
    }
}

/// Ленивая загрузка `img[data-src]`; без IntersectionObserver грузит всё сразу
pub fn install_lazy_images(window: &Window, document: &Document, config: &Config) {
    let elements: Vec<HtmlImageElement> = query_all(document, &config.lazy_image_selector);
    if elements.is_empty() {
        return;
    }

    let loader = Rc::new(RefCell::new(LazyLoader::new(
        elements
            .iter()
            .cloned()
            .map(|image| DomImage {
                image,
                fade_ms: config.lazy_fade_ms,
            })
            .collect(),
    )));

    let supported = Reflect::has(window.as_ref(), &JsValue::from_str("IntersectionObserver")).unwrap_or(false);
    if !supported {
        let loaded = loader.borrow_mut().load_all();
        tracing::info!(target: "site::lazy", loaded, "IntersectionObserver unavailable, eager loading");
        return;
    }

    let observed = elements.clone();
    let callback_loader = Rc::clone(&loader);
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
        let visible: Vec<usize> = entries
            .iter()
            .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
            .filter(|entry| entry.is_intersecting())
            .filter_map(|entry| {
                let target = JsValue::from(entry.target());
                observed
                    .iter()
                    .position(|image| Object::is(AsRef::<JsValue>::as_ref(image), &target))
            })
            .collect();

        let finished = callback_loader.borrow_mut().handle_visible(&visible);
        for index in finished {
            observer.unobserve(&observed[index]);
        }
        if callback_loader.borrow().is_done() {
            observer.disconnect();
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_root_margin(&config.lazy_root_margin);

    match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
        Ok(observer) => {
            for image in &elements {
                observer.observe(image);
            }
            callback.forget();
            tracing::debug!(target: "site::lazy", images = elements.len(), "Lazy images observed");
        }
        Err(err) => {
            tracing::warn!(target: "site::lazy", error = ?err, "IntersectionObserver failed, eager loading");
            loader.borrow_mut().load_all();
        }
    }
}

// ===== Плавная прокрутка =====

/// Плавная прокрутка к якорям; возвращает число ссылок
pub fn install_smooth_scroll(document: &Document, selector: &str) -> usize {
    let anchors: Vec<Element> = query_all(document, selector);
    for anchor in &anchors {
        let document = document.clone();
        let link = anchor.clone();
        listen(anchor, "click", move |event: Event| {
            event.prevent_default();
            let Some(href) = link.get_attribute("href") else {
                return;
            };
            let Some(selector) = anchor_target(&href) else {
                return;
            };
            match document.query_selector(selector) {
                Ok(Some(target)) => {
                    let options = ScrollIntoViewOptions::new();
                    options.set_behavior(ScrollBehavior::Smooth);
                    options.set_block(ScrollLogicalPosition::Start);
                    target.scroll_into_view_with_scroll_into_view_options(&options);
                }
                Ok(None) => {}
                Err(_) => tracing::debug!(target: "site::dom", selector, "Anchor is not a valid selector"),
            }
        });
    }
    anchors.len()
}

// ===== Страница =====

fn event_element(event: &Event) -> Option<Element> {
    let target = event.target()?;
    if let Some(element) = target.dyn_ref::<Element>() {
        return Some(element.clone());
    }
    // selectstart приходит на текстовый узел
    target.dyn_ref::<Node>()?.parent_element()
}

fn event_allows_selection(event: &Event) -> bool {
    let Some(element) = event_element(event) else {
        return false;
    };
    let editable = element
        .dyn_ref::<HtmlElement>()
        .map(|html| html.is_content_editable())
        .unwrap_or(false);
    allows_selection(&element.tag_name(), editable)
}

/// Страница в браузере
pub struct DomPage {
    window: Window,
    document: Document,
    config: Config,
}

impl DomPage {
    pub fn new(config: &Config) -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| SiteError::MissingElement("window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| SiteError::MissingElement("document".to_string()))?;
        Ok(Self {
            window,
            document,
            config: config.clone(),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn contact_buttons(&self) -> Vec<HtmlElement> {
        query_all(&self.document, &self.config.contact_button_selector)
    }

    fn root_style(&self) -> Option<CssStyleDeclaration> {
        self.document
            .document_element()?
            .dyn_into::<HtmlElement>()
            .ok()
            .map(|root| root.style())
    }
}

impl Page for DomPage {
    fn set_contact_buttons_hidden(&self, hidden: bool) {
        for button in self.contact_buttons() {
            let style = button.style();
            let classes = button.class_list();
            if hidden {
                let _ = style.set_property("display", "none");
                let _ = classes.add_1(&self.config.hidden_button_class);
            } else {
                let _ = style.remove_property("display");
                let _ = classes.remove_1(&self.config.hidden_button_class);
            }
        }
    }

    fn on_contact_click(&self, handler: Rc<dyn Fn()>) {
        for button in self.contact_buttons() {
            let handler = Rc::clone(&handler);
            listen(&button, "click", move |_event| handler());
        }
    }

    fn on_scroll(&self, mut handler: Box<dyn FnMut(f64)>) {
        let window = self.window.clone();
        let closure = Closure::wrap(Box::new(move |_event: Event| {
            handler(window.scroll_y().unwrap_or(0.0));
        }) as Box<dyn FnMut(Event)>);

        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        if let Err(err) = self
            .window
            .add_event_listener_with_callback_and_add_event_listener_options(
                "scroll",
                closure.as_ref().unchecked_ref(),
                &options,
            )
        {
            tracing::warn!(target: "site::dom", error = ?err, "Scroll listener failed");
        }
        closure.forget();
    }

    fn set_css_variable(&self, name: &str, value: &str) {
        if let Some(style) = self.root_style() {
            let _ = style.set_property(name, value);
        }
    }

    fn apply_bottom_spacing_fix(&self) {
        let id = &self.config.bottom_spacing_style_id;
        if let Some(old) = self.document.get_element_by_id(id) {
            old.remove();
        }

        let (Ok(style), Some(head)) = (self.document.create_element("style"), self.document.head()) else {
            tracing::warn!(target: "site::dom", "Cannot insert bottom spacing style");
            return;
        };
        style.set_id(id);
        style.set_text_content(Some(BOTTOM_SPACING_CSS));
        if let Err(err) = head.append_child(&style) {
            tracing::warn!(target: "site::dom", error = ?err, "Cannot insert bottom spacing style");
        }

        if let Some(body) = self.document.body() {
            let _ = body.style().set_property("padding-bottom", "0");
            let _ = body.style().set_property("margin-bottom", "0");
        }
    }

    fn install_copy_guard(&self) {
        for event_name in GUARDED_EVENTS {
            listen(&self.document, event_name, move |event: Event| {
                if !event_allows_selection(&event) {
                    event.prevent_default();
                }
            });
        }
        if let Some(body) = self.document.body() {
            let _ = body.style().set_property("user-select", "none");
            let _ = body.style().set_property("-webkit-user-select", "none");
        }
    }

    fn confirm(&self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }

    fn navigate(&self, url: &str) {
        if let Err(err) = self.window.location().set_href(url) {
            tracing::warn!(target: "site::dom", url, error = ?err, "Navigation failed");
        }
    }

    fn open_window(&self, url: &str) {
        if let Err(err) = self.window.open_with_url_and_target(url, "_blank") {
            tracing::warn!(target: "site::dom", url, error = ?err, "window.open failed");
        }
    }

    fn history_back(&self) {
        if let Ok(history) = self.window.history() {
            let _ = history.back();
        }
    }

    fn storage_get(&self, key: &str) -> Option<String> {
        self.window
            .local_storage()
            .ok()
            .flatten()?
            .get_item(key)
            .ok()
            .flatten()
    }

    fn storage_set(&self, key: &str, value: &str) -> bool {
        match self.window.local_storage() {
            Ok(Some(storage)) => storage.set_item(key, value).is_ok(),
            _ => false,
        }
    }

    fn spawn(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        Timeout::new(delay_ms, task).forget();
    }
}
