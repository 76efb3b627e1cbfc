// Ленивая загрузка изображений
//
// Браузерная часть (IntersectionObserver) сообщает индексы изображений,
// попавших в зону видимости; LazyLoader подменяет src и говорит, какие
// изображения больше не нужно наблюдать.

/// Изображение с отложенной загрузкой (`img[data-src]`)
pub trait DeferredImage {
    /// Настоящий адрес из `data-src`
    fn real_source(&self) -> Option<String>;

    /// Подставить адрес и плавно показать изображение
    fn reveal(&self, src: &str);
}

pub struct LazyLoader<I: DeferredImage> {
    pending: Vec<Option<I>>,
}

impl<I: DeferredImage> LazyLoader<I> {
    pub fn new(images: Vec<I>) -> Self {
        Self {
            pending: images.into_iter().map(Some).collect(),
        }
    }

    /// Сколько изображений ещё не загружено
    pub fn remaining(&self) -> usize {
        self.pending.iter().filter(|image| image.is_some()).count()
    }

    pub fn is_done(&self) -> bool {
        self.remaining() == 0
    }

    pub fn get(&self, index: usize) -> Option<&I> {
        self.pending.get(index).and_then(Option::as_ref)
    }

    /// Загрузить изображения, попавшие в зону видимости
    ///
    /// Возвращает индексы, которые нужно снять с наблюдения. Повторные и
    /// неизвестные индексы игнорируются.
    pub fn handle_visible(&mut self, visible: &[usize]) -> Vec<usize> {
        let mut finished = Vec::new();
        for &index in visible {
            let Some(image) = self.pending.get_mut(index).and_then(Option::take) else {
                continue;
            };
            match image.real_source() {
                Some(src) if !src.is_empty() => image.reveal(&src),
                _ => {
                    tracing::warn!(target: "site::lazy", index, "Deferred image has no data-src");
                }
            }
            finished.push(index);
        }
        finished
    }

    /// Fallback без IntersectionObserver: загрузить всё сразу
    pub fn load_all(&mut self) -> usize {
        let all: Vec<usize> = (0..self.pending.len()).collect();
        self.handle_visible(&all).len()
    }
}
