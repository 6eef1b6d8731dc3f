use rust_decimal::Decimal;
use vending_core::{MachineKind, UnknownMachine};
use vending_engine::PurchaseRequest;

pub(crate) const HELP: &str = "\
commands:
  accounts                                    list accounts and balances
  price                                       show the market price estimate
  dispense <account>                          get GC tokens from the dispenser
  quote <machine> <account> <amount> [member|no-member]
  buy <machine> <account> <amount> [member|no-member]
  dismiss                                     close the result view
  quit
machines: gumball, candy, member";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Help,
    Accounts,
    Price,
    Dismiss,
    Quit,
    Quote(PurchaseRequest),
    Buy(PurchaseRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum CommandError {
    #[error("unknown command {0:?}, try `help`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Machine(#[from] UnknownMachine),
    #[error("{0:?} is not an amount")]
    Amount(String),
    #[error("amount must not be negative")]
    NegativeAmount,
    #[error("use `dispense <account>` for the token dispenser")]
    DispenserAmount,
}

const PURCHASE_USAGE: &str = "<buy|quote> <machine> <account> <amount> [member|no-member]";

/// Parses one input line. Blank lines yield `Ok(None)`.
pub(crate) fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "accounts" => Command::Accounts,
        "price" => Command::Price,
        "dismiss" | "close" => Command::Dismiss,
        "quit" | "exit" => Command::Quit,
        "dispense" => match args {
            [account] => Command::Buy(PurchaseRequest::dispense(*account)),
            _ => return Err(CommandError::Usage("dispense <account>")),
        },
        "buy" => Command::Buy(parse_purchase(args)?),
        "quote" => Command::Quote(parse_purchase(args)?),
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_purchase(args: &[&str]) -> Result<PurchaseRequest, CommandError> {
    let (machine, account, amount, flag) = match args {
        [machine, account, amount] => (*machine, *account, *amount, None),
        [machine, account, amount, flag] => (*machine, *account, *amount, Some(*flag)),
        _ => return Err(CommandError::Usage(PURCHASE_USAGE)),
    };

    let kind: MachineKind = machine.parse()?;
    if !kind.consumes_input() {
        return Err(CommandError::DispenserAmount);
    }
    let amount: Decimal = amount
        .parse()
        .map_err(|_| CommandError::Amount(amount.to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CommandError::NegativeAmount);
    }

    let request = PurchaseRequest::new(kind, account, amount);
    match flag.map(str::to_ascii_lowercase).as_deref() {
        None => Ok(request),
        Some("member") => Ok(request.with_member_card(true)),
        Some("no-member") => Ok(request.with_member_card(false)),
        Some(_) => Err(CommandError::Usage(PURCHASE_USAGE)),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_command, Command, CommandError};
    use rust_decimal_macros::dec;
    use vending_core::MachineKind;
    use vending_engine::PurchaseRequest;

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse_command("help"), Ok(Some(Command::Help)));
        assert_eq!(parse_command("Accounts"), Ok(Some(Command::Accounts)));
        assert_eq!(parse_command("dismiss"), Ok(Some(Command::Dismiss)));
        assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn buy_with_member_flag() {
        assert_eq!(
            parse_command("buy candy account_bob 7 member"),
            Ok(Some(Command::Buy(
                PurchaseRequest::new(MachineKind::Candy, "account_bob", dec!(7))
                    .with_member_card(true)
            )))
        );
    }

    #[test]
    fn quote_without_flag_leaves_eligibility_open() {
        let Ok(Some(Command::Quote(request))) = parse_command("quote gumball account_a 2.5") else {
            panic!("expected a quote");
        };
        assert_eq!(request.kind, MachineKind::Gumball);
        assert_eq!(request.input_amount, dec!(2.5));
        assert_eq!(request.member_card, None);
    }

    #[test]
    fn dispense_takes_only_an_account() {
        assert_eq!(
            parse_command("dispense account_alice"),
            Ok(Some(Command::Buy(PurchaseRequest::dispense("account_alice"))))
        );
        assert_eq!(
            parse_command("buy tokenDispenser account_alice 1"),
            Err(CommandError::DispenserAmount)
        );
    }

    #[test]
    fn bad_input_is_rejected() {
        assert_eq!(
            parse_command("buy candy account_a -1"),
            Err(CommandError::NegativeAmount)
        );
        assert_eq!(
            parse_command("buy candy account_a lots"),
            Err(CommandError::Amount("lots".to_string()))
        );
        assert!(matches!(
            parse_command("buy fudge account_a 1"),
            Err(CommandError::Machine(_))
        ));
        assert!(matches!(parse_command("buy candy"), Err(CommandError::Usage(_))));
        assert_eq!(
            parse_command("sell candy"),
            Err(CommandError::Unknown("sell".to_string()))
        );
    }
}
