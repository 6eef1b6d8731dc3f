use std::time::Duration;

use rust_decimal::Decimal;

use crate::view_model::AppViewModel;
use crate::ResultViewState;

/// Time the result payload outlives its visibility, covering the exit animation.
pub const GRACE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    result: ResultViewState,
    current_price: Decimal,
    grace_delay: Duration,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            result: ResultViewState::new(),
            current_price: Decimal::ZERO,
            grace_delay: GRACE_DELAY,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grace_delay(grace_delay: Duration) -> Self {
        Self {
            grace_delay,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let payload = self.result.payload();
        AppViewModel {
            current_price: self.current_price,
            show: self.result.visible_kind(),
            account: payload.and_then(|p| p.account.clone()),
            output_value: payload.and_then(|p| p.output_value),
            dirty: self.dirty,
        }
    }

    pub fn result_view(&self) -> &ResultViewState {
        &self.result
    }

    pub fn current_price(&self) -> Decimal {
        self.current_price
    }

    pub fn grace_delay(&self) -> Duration {
        self.grace_delay
    }

    /// Returns whether the state changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn result_mut(&mut self) -> &mut ResultViewState {
        &mut self.result
    }

    pub(crate) fn set_price(&mut self, price: Decimal) {
        if self.current_price != price {
            self.current_price = price;
            self.mark_dirty();
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
