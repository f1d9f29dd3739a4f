use std::sync::Arc;

use crate::domain::{Clock, SystemClock};

#[derive(Debug, Clone)]
pub struct DialogOptions {
    /// Re-check showing errors after every edit so fixed fields clear.
    pub auto_validate: bool,
    pub clock: Arc<dyn Clock>,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            auto_validate: true,
            clock: Arc::new(SystemClock),
        }
    }
}

impl DialogOptions {
    pub fn with_auto_validate(mut self, enabled: bool) -> Self {
        self.auto_validate = enabled;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
