// Таймеры браузера

use gloo_timers::callback::Interval;

use crate::slider::Ticker;

/// setInterval; drop Interval вызывает clearInterval
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalTicker;

impl Ticker for IntervalTicker {
    type Handle = Interval;

    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> Interval {
        Interval::new(period_ms, tick)
    }
}
