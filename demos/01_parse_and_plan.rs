/// parse form input once, then plan against a declared monthly budget
use debt_snowball_rs::{
    DebtDraft, EventStore, Money, NumberFormat, SafeTimeProvider, SnowballStrategy,
    StrategyConfig, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);
    let strategy = SnowballStrategy::new(
        StrategyConfig::default().with_number_format(NumberFormat::Continental),
    )?;

    let debts = strategy.parse_debts(vec![
        DebtDraft {
            name: "Kartu Kredit".to_string(),
            current_balance: "Rp 4.250.000".to_string(),
            interest_rate: "24%".to_string(),
            min_payment: "425.000".to_string(),
            ..Default::default()
        },
        DebtDraft {
            name: "Cicilan Motor".to_string(),
            current_balance: "Rp 12.600.000".to_string(),
            min_payment: "1.050.000".to_string(),
            ..Default::default()
        },
    ])?;

    let mut events = EventStore::new();
    let outcome = strategy.plan(&debts, Money::from_major(2_000_000), &time, &mut events)?;

    if let Some(shortfall) = outcome.capacity.shortfall {
        println!("budget is {} short of the minimum payments", shortfall);
    }
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    println!("events: {}", events.to_json()?);

    Ok(())
}
