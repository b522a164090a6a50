/// payoff projection - month by month until debt free
use chrono::{TimeZone, Utc};
use debt_snowball_rs::{
    Debt, EventStore, Money, Rate, SafeTimeProvider, SnowballStrategy, StrategyConfig, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));

    let debts = vec![
        Debt::builder()
            .name("Store Card")
            .balance(Money::from_major(900))
            .rate(Rate::from_percentage(25))
            .min_payment(Money::from_major(40))
            .build()?,
        Debt::builder()
            .name("Car Loan")
            .balance(Money::from_major(6_500))
            .rate(Rate::from_percentage(7))
            .min_payment(Money::from_major(210))
            .build()?,
        Debt::builder()
            .name("Medical Bill")
            .balance(Money::from_major(350))
            .min_payment(Money::from_major(25))
            .build()?,
    ];

    let strategy = SnowballStrategy::new(StrategyConfig::default())?;
    let mut events = EventStore::new();
    let projection = strategy.project(&debts, Money::from_major(500), &time, &mut events)?;

    for milestone in &projection.payoffs {
        println!(
            "{:<14} paid off in month {:>3} ({}), total {}",
            milestone.name,
            milestone.month,
            milestone.month_start,
            milestone.total_paid.round_dp(2)
        );
    }
    println!(
        "debt free after {} months, interest paid {}",
        projection.months_to_debt_free,
        projection.total_interest.round_dp(2)
    );

    Ok(())
}
