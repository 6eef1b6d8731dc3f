//! Vending core: pure quote arithmetic, result-view state machine and view-model helpers.
mod account;
mod effect;
mod input;
mod machine;
mod msg;
mod quote;
mod result_view;
mod state;
mod update;
mod view_model;

pub use account::{find_account, has_fungible_tokens, has_member_card, Account, TokenBalance};
pub use effect::Effect;
pub use input::{validate_input, InputError};
pub use machine::{MachineKind, UnknownMachine};
pub use msg::Msg;
pub use quote::{quote, FixedPricing, MarketPricing, PriceTable, PricingRule, DISCOUNT_MULTIPLIER};
pub use result_view::{ClearGeneration, PurchaseResult, ResultView, ResultViewState};
pub use state::{AppState, GRACE_DELAY};
pub use update::update;
pub use view_model::AppViewModel;
