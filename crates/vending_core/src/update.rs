use crate::{AppState, Effect, Msg, PurchaseResult};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PriceUpdated(price) => {
            state.set_price(price);
            Vec::new()
        }
        Msg::PurchaseSucceeded {
            kind,
            account,
            output_value,
        } => {
            let cancelled = state.result_mut().reveal(PurchaseResult {
                kind,
                account,
                output_value,
            });
            state.mark_dirty();
            // Stale clears are ignored by generation; cancelling only saves the wakeup.
            cancelled
                .map(|generation| Effect::CancelClear { generation })
                .into_iter()
                .collect()
        }
        Msg::DismissClicked => match state.result_mut().dismiss() {
            Some(generation) => {
                state.mark_dirty();
                vec![Effect::ScheduleClear {
                    generation,
                    after: state.grace_delay(),
                }]
            }
            None => Vec::new(),
        },
        Msg::ClearElapsed { generation } => {
            if state.result_mut().clear_elapsed(generation) {
                state.mark_dirty();
            }
            Vec::new()
        }
    };

    (state, effects)
}
