// Состояние слайдера: упорядоченный набор слайдов и один активный индекс

/// Визуальный переход между слайдами
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Переключение CSS-класса активного слайда
    ClassToggle,
    /// Cross-fade: новый слайд проявляется сразу, старый скрывается после задержки
    CrossFade { hide_delay_ms: u32 },
}

impl Transition {
    pub fn from_config(config: &crate::config::Config) -> Self {
        if config.crossfade {
            Transition::CrossFade {
                hide_delay_ms: config.crossfade_hide_delay_ms,
            }
        } else {
            Transition::ClassToggle
        }
    }
}

/// Что сделать со слайдами при cross-fade переходе
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossFadePlan {
    /// Слайд, который сразу становится видимым
    pub show: usize,
    /// Предыдущий слайд: гаснет сейчас, скрывается после задержки
    pub fade_out: Option<usize>,
    /// Остальные слайды скрываются сразу
    pub hide: Vec<usize>,
}

impl CrossFadePlan {
    pub fn new(len: usize, previous: Option<usize>, active: usize) -> Self {
        let fade_out = previous.filter(|&prev| prev != active && prev < len);
        let hide = (0..len)
            .filter(|&i| i != active && Some(i) != fade_out)
            .collect();
        Self {
            show: active,
            fade_out,
            hide,
        }
    }

    /// Отложенное скрытие `target` выполняется, только если слайд не стал
    /// снова активным к моменту срабатывания
    pub fn delayed_hide_applies(target: usize, current: usize) -> bool {
        target != current
    }
}

/// Представление группы слайдов
///
/// `apply` обязан оставить активным ровно один слайд `active`.
/// `previous` равен `None` только при первичной активации.
pub trait SlideView {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn apply(&mut self, previous: Option<usize>, active: usize);
}

/// Привести произвольный (в том числе отрицательный) индекс в диапазон `[0, len)`
///
/// `len` должен быть больше нуля.
pub fn wrap_index(index: isize, len: usize) -> usize {
    index.rem_euclid(len as isize) as usize
}

/// Слайдер с одним активным слайдом
#[derive(Debug)]
pub struct SlideRotator<V: SlideView> {
    view: V,
    active: usize,
}

impl<V: SlideView> SlideRotator<V> {
    /// Создать слайдер и активировать первый слайд
    ///
    /// Возвращает `None` для пустой группы: без слайдов слайдер не нужен.
    pub fn new(mut view: V) -> Option<Self> {
        if view.is_empty() {
            return None;
        }
        view.apply(None, 0);
        Some(Self { view, active: 0 })
    }

    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Сделать активным слайд `index` (индекс заворачивается по модулю длины)
    pub fn activate(&mut self, index: isize) -> usize {
        let next = wrap_index(index, self.len());
        let previous = self.active;
        self.view.apply(Some(previous), next);
        self.active = next;
        next
    }

    pub fn next(&mut self) -> usize {
        self.activate(self.active as isize + 1)
    }

    pub fn previous(&mut self) -> usize {
        self.activate(self.active as isize - 1)
    }
}
