use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DepositQuote {
    pub deposit: Decimal,
    pub remaining: Decimal,
}

pub fn calculate_deposit(price: Decimal, percent: Decimal, minimum: Decimal) -> DepositQuote {
    let price = price.max(Decimal::ZERO);
    let percent = percent.max(Decimal::ZERO);
    let minimum = minimum.max(Decimal::ZERO);

    let deposit = (price * percent)
        .max(minimum)
        .min(price)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    DepositQuote {
        deposit,
        remaining: price - deposit,
    }
}
