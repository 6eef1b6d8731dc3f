use rust_decimal::Decimal;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use vending_core::{update, AppState, AppViewModel, ClearGeneration, Effect, Msg};
use vending_logging::{vending_debug, vending_trace, vending_warn};

/// Single owner of the app state.
///
/// Messages from the orchestrator, the poller and the UI are applied through
/// the pure `update`; effects (the payload-clear timer) are executed here and
/// every state change is published as a fresh view model.
pub struct Coordinator {
    msg_tx: mpsc::UnboundedSender<Msg>,
    view_rx: watch::Receiver<AppViewModel>,
    task: JoinHandle<()>,
}

impl Coordinator {
    /// Spawns the message loop on the current tokio runtime.
    pub fn spawn(state: AppState) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(state.view());
        let task = tokio::spawn(run(state, msg_rx, msg_tx.clone(), view_tx));
        Self {
            msg_tx,
            view_rx,
            task,
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<Msg> {
        self.msg_tx.clone()
    }

    /// Queues `msg`. Returns false when the message loop has stopped.
    pub fn send(&self, msg: Msg) -> bool {
        match self.msg_tx.send(msg) {
            Ok(()) => true,
            Err(err) => {
                vending_warn!("coordinator is gone; dropped {:?}", err.0);
                false
            }
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.view_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppViewModel> {
        self.view_rx.clone()
    }

    /// Feeds every price the poller publishes into the app state.
    pub fn forward_prices(&self, mut prices: watch::Receiver<Decimal>) -> JoinHandle<()> {
        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let initial = *prices.borrow_and_update();
            if msg_tx.send(Msg::PriceUpdated(initial)).is_err() {
                return;
            }
            while prices.changed().await.is_ok() {
                let price = *prices.borrow_and_update();
                if msg_tx.send(Msg::PriceUpdated(price)).is_err() {
                    break;
                }
            }
        })
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct PendingClear {
    generation: ClearGeneration,
    timer: JoinHandle<()>,
}

async fn run(
    mut state: AppState,
    mut msg_rx: mpsc::UnboundedReceiver<Msg>,
    msg_tx: mpsc::UnboundedSender<Msg>,
    view_tx: watch::Sender<AppViewModel>,
) {
    let mut pending: Option<PendingClear> = None;

    while let Some(msg) = msg_rx.recv().await {
        vending_trace!("coordinator msg {:?}", msg);
        let (next, effects) = update(state, msg);
        state = next;

        for effect in effects {
            match effect {
                Effect::ScheduleClear { generation, after } => {
                    if let Some(previous) = pending.take() {
                        previous.timer.abort();
                    }
                    let msg_tx = msg_tx.clone();
                    let timer = tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        let _ = msg_tx.send(Msg::ClearElapsed { generation });
                    });
                    pending = Some(PendingClear { generation, timer });
                }
                Effect::CancelClear { generation } => match pending.take() {
                    Some(clear) if clear.generation == generation => {
                        vending_debug!("cancelled payload clear {}", generation);
                        clear.timer.abort();
                    }
                    other => pending = other,
                },
            }
        }

        let view = state.view();
        if state.consume_dirty() {
            view_tx.send_replace(view);
        }
    }

    if let Some(clear) = pending {
        clear.timer.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::Coordinator;
    use tokio::sync::{mpsc, watch};
    use vending_core::{AppViewModel, Msg};

    #[tokio::test]
    async fn send_reports_a_stopped_loop() {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        drop(msg_rx);
        let (_view_tx, view_rx) = watch::channel(AppViewModel::default());
        let coordinator = Coordinator {
            msg_tx,
            view_rx,
            task: tokio::spawn(async {}),
        };

        assert!(!coordinator.send(Msg::DismissClicked));
    }
}
