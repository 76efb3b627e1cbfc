// Монтирование страницы: boot() может прийти повторно, в том числе до DOMContentLoaded

/// Стадия монтирования сайта
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MountState {
    #[default]
    Idle,
    /// Ждём DOMContentLoaded или уже монтируем
    Pending,
    Mounted,
}

impl MountState {
    /// Занять монтирование; `false`, если оно уже запланировано или завершено
    pub fn begin(&mut self) -> bool {
        if *self != MountState::Idle {
            return false;
        }
        *self = MountState::Pending;
        true
    }

    pub fn finish(&mut self) {
        *self = MountState::Mounted;
    }

    /// Монтирование не удалось: следующий boot() может попробовать снова
    pub fn fail(&mut self) {
        *self = MountState::Idle;
    }
}
