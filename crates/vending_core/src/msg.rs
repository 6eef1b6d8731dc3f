use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The price poller fetched a new market price.
    PriceUpdated(Decimal),
    /// A purchase transaction was accepted; reveal its result view.
    PurchaseSucceeded {
        kind: crate::MachineKind,
        account: Option<crate::Account>,
        output_value: Option<Decimal>,
    },
    /// User closed the result view.
    DismissClicked,
    /// Grace delay for a scheduled payload clear has elapsed.
    ClearElapsed {
        generation: crate::ClearGeneration,
    },
}
