use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use vending_core::{quote, FixedPricing, MachineKind, PriceTable, PricingRule};

#[test]
fn known_quotes() {
    assert_eq!(quote(dec!(10), dec!(1.5), false), 15);
    assert_eq!(quote(dec!(10), dec!(1.5), true), 30);
    assert_eq!(quote(dec!(7), dec!(0.33), false), 2);
    assert_eq!(quote(dec!(0), dec!(5), true), 0);
    assert_eq!(quote(dec!(12), dec!(0), true), 0);
}

#[test]
fn quote_floors_exact_product() {
    let amounts = [dec!(0), dec!(0.5), dec!(1), dec!(3.3), dec!(7), dec!(19.99), dec!(250)];
    let prices = [dec!(0), dec!(0.1), dec!(0.33), dec!(1.5), dec!(2), dec!(4.999)];

    for amount in amounts {
        for price in prices {
            let plain = (amount * price).floor();
            let doubled = (amount * price * Decimal::TWO).floor();
            assert_eq!(Decimal::from(quote(amount, price, false)), plain, "{amount} x {price}");
            assert_eq!(Decimal::from(quote(amount, price, true)), doubled, "{amount} x {price} x2");
        }
    }
}

#[test]
fn quote_is_monotonic_in_amount_and_price() {
    let steps: Vec<Decimal> = (0..40).map(|i| Decimal::new(i * 37, 2)).collect();
    for eligible in [false, true] {
        for window in steps.windows(2) {
            let (lo, hi) = (window[0], window[1]);
            assert!(quote(lo, dec!(1.7), eligible) <= quote(hi, dec!(1.7), eligible));
            assert!(quote(dec!(3.1), lo, eligible) <= quote(dec!(3.1), hi, eligible));
        }
    }
}

#[test]
fn candy_follows_market_price() {
    let table = PriceTable::default();
    assert_eq!(
        table.quote(MachineKind::Candy, dec!(10), dec!(1.5), false),
        Some(15)
    );
    assert_eq!(
        table.quote(MachineKind::Candy, dec!(10), dec!(1.5), true),
        Some(30)
    );
}

#[test]
fn gumball_uses_fixed_price_regardless_of_market() {
    let table = PriceTable::new(dec!(3), dec!(0.1));
    assert_eq!(
        table.quote(MachineKind::Gumball, dec!(2), dec!(4.5), false),
        Some(6)
    );
    assert_eq!(
        table.quote(MachineKind::Gumball, dec!(2), dec!(0), true),
        Some(12)
    );
}

#[test]
fn custom_rule_shares_floor_contract() {
    let rule = FixedPricing {
        per_token: dec!(0.75),
        discountable: true,
    };
    assert_eq!(rule.quote(dec!(3), dec!(100), false), 2);
    assert_eq!(rule.quote(dec!(3), dec!(100), true), 4);
}
