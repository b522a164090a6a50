/// quick start - rank debts and get this month's snowball target
use debt_snowball_rs::{allocate, rank, Allocation, Debt, Money, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let debts = vec![
        Debt::builder()
            .name("Visa Card")
            .balance(Money::from_major(1_200))
            .rate(Rate::from_percentage(22))
            .min_payment(Money::from_major(80))
            .build()?,
        Debt::builder()
            .name("Phone Plan")
            .balance(Money::from_major(500))
            .min_payment(Money::from_major(50))
            .build()?,
    ];

    match allocate(&rank(&debts), Money::from_major(100))? {
        Allocation::Settled => println!("all debts paid off!"),
        Allocation::Active(plan) => {
            println!("attack {}: pay {}", plan.target.name, plan.payment_amount);
            for payment in plan.maintenance_payments() {
                println!("  keep {} alive with {}", payment.name, payment.amount);
            }
        }
    }

    Ok(())
}
