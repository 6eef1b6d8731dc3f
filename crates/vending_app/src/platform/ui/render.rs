use rust_decimal::Decimal;
use vending_core::{has_fungible_tokens, has_member_card, Account, AppViewModel};
use vending_engine::EngineSettings;

/// Lines describing the current view model, top to bottom.
pub(crate) fn render(view: &AppViewModel, settings: &EngineSettings) -> Vec<String> {
    let mut lines = vec![price_line(view.current_price)];

    match view.show {
        Some(kind) => {
            lines.push(format!("== {} ==", kind));
            match (kind.output_token_name(), view.output_value) {
                (Some(token), Some(value)) => {
                    lines.push(format!("You received {} {}", value, token))
                }
                (None, _) => lines.push("GC tokens dispensed".to_string()),
                (Some(token), None) => lines.push(format!("You received some {}", token)),
            }
            if let Some(account) = &view.account {
                lines.push(account_line(account, settings));
            }
            lines.push("(type `dismiss` to close)".to_string());
        }
        None if view.account.is_some() || view.output_value.is_some() => {
            lines.push("result view closing".to_string());
        }
        None => {}
    }
    lines
}

pub(crate) fn price_line(price: Decimal) -> String {
    format!("Market price estimate: {} candies/GC", price.normalize())
}

pub(crate) fn account_line(account: &Account, settings: &EngineSettings) -> String {
    let mut line = format!(
        "{}: {} GC, {} XRD",
        account.address,
        account.balance(&settings.gc_token_resource).normalize(),
        account.balance(&settings.xrd_resource).normalize()
    );
    if account.holds(&settings.member_card_resource) {
        line.push_str(" [member]");
    }
    line
}

/// Summary of every known account, plus hints drawn from the whole set.
pub(crate) fn render_accounts(accounts: &[Account], settings: &EngineSettings) -> Vec<String> {
    if accounts.is_empty() {
        return vec!["no accounts".to_string()];
    }
    let mut lines: Vec<String> = accounts
        .iter()
        .map(|account| account_line(account, settings))
        .collect();
    if !has_fungible_tokens(accounts, &settings.gc_token_resource) {
        lines.push("No GC tokens yet: try `dispense <account>`".to_string());
    }
    if has_member_card(accounts, &settings.member_card_resource) {
        lines.push("Member discount available".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{price_line, render, render_accounts};
    use rust_decimal_macros::dec;
    use vending_core::{Account, AppViewModel, MachineKind};
    use vending_engine::EngineSettings;

    #[test]
    fn hidden_view_shows_only_price() {
        let view = AppViewModel {
            current_price: dec!(2.50),
            ..AppViewModel::default()
        };
        assert_eq!(
            render(&view, &EngineSettings::default()),
            vec!["Market price estimate: 2.5 candies/GC".to_string()]
        );
    }

    #[test]
    fn visible_view_names_the_output_token() {
        let settings = EngineSettings::default();
        let view = AppViewModel {
            current_price: dec!(2),
            show: Some(MachineKind::Candy),
            account: Some(
                Account::new("account_bob")
                    .with_balance(settings.gc_token_resource.clone(), dec!(15)),
            ),
            output_value: Some(dec!(30)),
            dirty: false,
        };
        let lines = render(&view, &settings);
        assert_eq!(lines[1], "== candy ==");
        assert_eq!(lines[2], "You received 30 Candies");
        assert_eq!(lines[3], "account_bob: 15 GC, 0 XRD");
    }

    #[test]
    fn dispenser_and_closing_states() {
        let settings = EngineSettings::default();
        let dispensed = AppViewModel {
            show: Some(MachineKind::TokenDispenser),
            ..AppViewModel::default()
        };
        assert_eq!(render(&dispensed, &settings)[2], "GC tokens dispensed");

        let closing = AppViewModel {
            output_value: Some(dec!(3)),
            ..AppViewModel::default()
        };
        assert_eq!(render(&closing, &settings)[1], "result view closing");
    }

    #[test]
    fn account_summary_hints() {
        let settings = EngineSettings::default();
        let accounts = vec![
            Account::new("account_alice").with_balance(settings.xrd_resource.clone(), dec!(1000)),
            Account::new("account_bob")
                .with_balance(settings.member_card_resource.clone(), dec!(1)),
        ];
        let lines = render_accounts(&accounts, &settings);
        assert_eq!(lines[0], "account_alice: 0 GC, 1000 XRD");
        assert_eq!(lines[1], "account_bob: 0 GC, 0 XRD [member]");
        assert!(lines.contains(&"No GC tokens yet: try `dispense <account>`".to_string()));
        assert!(lines.contains(&"Member discount available".to_string()));
        assert_eq!(price_line(dec!(0)), "Market price estimate: 0 candies/GC");
    }
}
