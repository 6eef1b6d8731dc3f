//! Vending engine: price polling, purchase orchestration and effect execution.
mod coordinator;
mod poller;
mod price;
mod purchase;
mod retry;
mod settings;
mod types;

pub use coordinator::Coordinator;
pub use poller::PricePoller;
pub use price::{HttpPriceSettings, HttpPriceSource, PriceSource, SugarOracle, UnixClock};
pub use purchase::{AccountProvider, PurchaseOrchestrator, TransactionSubmitter};
pub use retry::{ExponentialBackoff, FixedInterval, RetryPolicy};
pub use settings::EngineSettings;
pub use types::{
    AccountError, PriceError, PurchaseError, PurchaseOutcome, PurchaseRequest, SubmitError,
};
