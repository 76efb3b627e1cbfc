// Автоматическая смена слайдов по таймеру
//
// Таймер живёт столько же, сколько его Handle: сброс Handle отменяет интервал,
// поэтому у группы слайдов никогда не бывает двух живых таймеров.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::rotator::{SlideRotator, SlideView};

/// Источник повторяющихся интервалов (setInterval в браузере, фейковые часы в тестах)
pub trait Ticker {
    /// Живой интервал; drop отменяет его
    type Handle;

    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> Self::Handle;
}

/// Поведение таймера при скрытии вкладки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityPolicy {
    /// Остановить таймер, пока страница скрыта, и запустить заново при возврате
    PauseWhenHidden,
    /// Не реагировать на visibilitychange
    KeepRunning,
}

impl VisibilityPolicy {
    pub fn from_config(config: &crate::config::Config) -> Self {
        if config.pause_when_hidden {
            VisibilityPolicy::PauseWhenHidden
        } else {
            VisibilityPolicy::KeepRunning
        }
    }
}

struct Inner<V: SlideView, H> {
    rotator: SlideRotator<V>,
    timer: Option<H>,
    paused: bool,
}

/// Слайдер с автопрокруткой
pub struct AutoRotator<V: SlideView, T: Ticker> {
    inner: Rc<RefCell<Inner<V, T::Handle>>>,
    ticker: T,
    period_ms: u32,
    policy: VisibilityPolicy,
}

impl<V, T> AutoRotator<V, T>
where
    V: SlideView + 'static,
    T: Ticker,
    T::Handle: 'static,
{
    /// Активировать первый слайд и запустить таймер
    ///
    /// Для пустой группы ничего не делает и возвращает `None`.
    pub fn start(view: V, ticker: T, period_ms: u32, policy: VisibilityPolicy) -> Option<Self> {
        let rotator = SlideRotator::new(view)?;

        let auto = Self {
            inner: Rc::new(RefCell::new(Inner {
                rotator,
                timer: None,
                paused: false,
            })),
            ticker,
            period_ms,
            policy,
        };
        auto.restart_timer();

        tracing::debug!(
            target: "site::slider",
            slides = auto.len(),
            period_ms,
            "Slider started"
        );
        Some(auto)
    }

    /// Отменить текущий интервал и запланировать новый от текущего момента
    pub fn restart_timer(&self) {
        // Старый Handle отменяется до создания нового
        self.inner.borrow_mut().timer = None;

        let weak: Weak<RefCell<Inner<V, T::Handle>>> = Rc::downgrade(&self.inner);
        let handle = self.ticker.every(
            self.period_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().rotator.next();
                }
            }),
        );

        let mut inner = self.inner.borrow_mut();
        inner.timer = Some(handle);
        inner.paused = false;
    }

    /// Ручной переход вперёд (кнопка "next")
    pub fn show_next(&self) -> usize {
        let index = self.inner.borrow_mut().rotator.next();
        self.restart_timer();
        index
    }

    /// Ручной переход назад (кнопка "prev")
    pub fn show_previous(&self) -> usize {
        let index = self.inner.borrow_mut().rotator.previous();
        self.restart_timer();
        index
    }

    /// Реакция на visibilitychange
    pub fn handle_visibility(&self, hidden: bool) {
        if self.policy == VisibilityPolicy::KeepRunning {
            return;
        }

        if hidden {
            let mut inner = self.inner.borrow_mut();
            if inner.timer.take().is_some() {
                inner.paused = true;
                tracing::trace!(target: "site::slider", "Slider paused");
            }
        } else if self.inner.borrow().paused {
            self.restart_timer();
            tracing::trace!(target: "site::slider", "Slider resumed");
        }
    }

    pub fn active(&self) -> usize {
        self.inner.borrow().rotator.active()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().rotator.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().timer.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.inner.borrow().paused
    }

    pub fn policy(&self) -> VisibilityPolicy {
        self.policy
    }

    /// Доступ к представлению (для проверки состояния в тестах и отладке)
    pub fn with_view<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(self.inner.borrow().rotator.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    // Минимальный тикер: запоминает последний колбэк, вызывается вручную
    #[derive(Clone, Default)]
    struct ManualTicker {
        tick: Rc<RefCell<Option<Box<dyn FnMut()>>>>,
        created: Rc<Cell<usize>>,
        live: Rc<Cell<usize>>,
    }

    struct ManualHandle {
        live: Rc<Cell<usize>>,
    }

    impl Drop for ManualHandle {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    impl Ticker for ManualTicker {
        type Handle = ManualHandle;

        fn every(&self, _period_ms: u32, tick: Box<dyn FnMut()>) -> ManualHandle {
            *self.tick.borrow_mut() = Some(tick);
            self.created.set(self.created.get() + 1);
            self.live.set(self.live.get() + 1);
            ManualHandle {
                live: self.live.clone(),
            }
        }
    }

    impl ManualTicker {
        fn fire(&self) {
            let mut tick = self.tick.borrow_mut().take().unwrap();
            tick();
            *self.tick.borrow_mut() = Some(tick);
        }
    }

    struct Count(usize);

    impl SlideView for Count {
        fn len(&self) -> usize {
            self.0
        }

        fn apply(&mut self, _previous: Option<usize>, _active: usize) {}
    }

    fn start(n: usize, policy: VisibilityPolicy) -> (AutoRotator<Count, ManualTicker>, ManualTicker) {
        let ticker = ManualTicker::default();
        let auto = AutoRotator::start(Count(n), ticker.clone(), 5000, policy).unwrap();
        (auto, ticker)
    }

    #[test]
    fn test_zero_slides_creates_no_timer() {
        let ticker = ManualTicker::default();
        let auto = AutoRotator::start(Count(0), ticker.clone(), 5000, VisibilityPolicy::KeepRunning);
        assert!(auto.is_none());
        assert_eq!(ticker.created.get(), 0);
    }

    #[test]
    fn test_tick_advances() {
        let (auto, ticker) = start(3, VisibilityPolicy::KeepRunning);
        ticker.fire();
        assert_eq!(auto.active(), 1);
        ticker.fire();
        ticker.fire();
        assert_eq!(auto.active(), 0);
    }

    #[test]
    fn test_manual_navigation_keeps_one_live_timer() {
        let (auto, ticker) = start(3, VisibilityPolicy::KeepRunning);
        auto.show_next();
        auto.show_previous();
        auto.show_previous();
        assert_eq!(auto.active(), 2);
        assert_eq!(ticker.created.get(), 4);
        assert_eq!(ticker.live.get(), 1);
    }

    #[test]
    fn test_pause_and_resume() {
        let (auto, ticker) = start(3, VisibilityPolicy::PauseWhenHidden);
        auto.handle_visibility(true);
        assert!(!auto.is_running());
        assert!(auto.is_paused());
        assert_eq!(ticker.live.get(), 0);

        auto.handle_visibility(false);
        assert!(auto.is_running());
        assert_eq!(ticker.live.get(), 1);
    }

    #[test]
    fn test_keep_running_ignores_visibility() {
        let (auto, ticker) = start(3, VisibilityPolicy::KeepRunning);
        auto.handle_visibility(true);
        assert!(auto.is_running());
        assert_eq!(ticker.created.get(), 1);
    }

    #[test]
    fn test_tick_after_drop_is_noop() {
        let (auto, ticker) = start(2, VisibilityPolicy::KeepRunning);
        drop(auto);
        // Колбэк держит только Weak: после drop слайдера тик ничего не делает
        ticker.fire();
    }
}
