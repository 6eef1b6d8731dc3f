use rust_decimal::Decimal;

use crate::{Account, MachineKind};

/// Identifies one scheduled payload clear. A clear only applies when its
/// generation matches the pending one.
pub type ClearGeneration = u64;

/// Outcome of a successful purchase, shown by the result view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseResult {
    pub kind: MachineKind,
    pub account: Option<Account>,
    pub output_value: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultView {
    #[default]
    Hidden,
    Visible(PurchaseResult),
    /// Hidden, but the payload is kept until the exit animation finishes.
    ClearingPayload {
        payload: PurchaseResult,
        generation: ClearGeneration,
    },
}

/// Two-phase result view: visibility drops on dismiss, the payload only
/// after the grace delay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultViewState {
    view: ResultView,
    last_generation: ClearGeneration,
}

impl ResultViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.view, ResultView::Visible(_))
    }

    pub fn visible_kind(&self) -> Option<MachineKind> {
        match &self.view {
            ResultView::Visible(payload) => Some(payload.kind),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&PurchaseResult> {
        match &self.view {
            ResultView::Hidden => None,
            ResultView::Visible(payload) | ResultView::ClearingPayload { payload, .. } => {
                Some(payload)
            }
        }
    }

    /// Shows `result`, replacing any current payload.
    ///
    /// Returns the generation of the pending clear this reveal cancelled.
    pub fn reveal(&mut self, result: PurchaseResult) -> Option<ClearGeneration> {
        let cancelled = match &self.view {
            ResultView::ClearingPayload { generation, .. } => Some(*generation),
            ResultView::Hidden | ResultView::Visible(_) => None,
        };
        self.view = ResultView::Visible(result);
        cancelled
    }

    /// Hides the view and returns the generation of the clear to schedule.
    /// No-op unless the view is visible.
    pub fn dismiss(&mut self) -> Option<ClearGeneration> {
        match std::mem::take(&mut self.view) {
            ResultView::Visible(payload) => {
                self.last_generation += 1;
                let generation = self.last_generation;
                self.view = ResultView::ClearingPayload {
                    payload,
                    generation,
                };
                Some(generation)
            }
            other => {
                self.view = other;
                None
            }
        }
    }

    /// Drops the payload if `generation` is the pending clear. Stale clears
    /// (superseded by a later reveal or dismiss) are ignored.
    pub fn clear_elapsed(&mut self, generation: ClearGeneration) -> bool {
        match &self.view {
            ResultView::ClearingPayload {
                generation: pending,
                ..
            } if *pending == generation => {
                self.view = ResultView::Hidden;
                true
            }
            _ => false,
        }
    }
}
