use rust_decimal::Decimal;

use crate::{Account, MachineKind};

/// Snapshot handed to the presentation layer.
///
/// `account` and `output_value` outlive `show` by the grace delay so the
/// closing result view keeps its content while it animates out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub current_price: Decimal,
    pub show: Option<MachineKind>,
    pub account: Option<Account>,
    pub output_value: Option<Decimal>,
    pub dirty: bool,
}
