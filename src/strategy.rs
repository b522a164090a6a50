use hourglass_rs::SafeTimeProvider;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::allocation::{allocate, Allocation};
use crate::budget::BudgetCapacity;
use crate::config::StrategyConfig;
use crate::debt::{Debt, DebtDraft};
use crate::decimal::Money;
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::projection::{project, PayoffProjection};
use crate::payments::{submit_with, PaymentExecutor, PaymentReceipt, PaymentRequest};
use crate::ranking::rank_with;

/// budget assessment together with the month's allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyOutcome {
    pub capacity: BudgetCapacity,
    pub allocation: Allocation,
}

/// snowball planner over caller-owned debt snapshots
///
/// holds no debt state between calls; every method recomputes from the
/// slice it is given.
#[derive(Debug, Clone, Default)]
pub struct SnowballStrategy {
    config: StrategyConfig,
}

impl SnowballStrategy {
    pub fn new(config: StrategyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// parse form drafts with the configured number format
    pub fn parse_debts(&self, drafts: Vec<DebtDraft>) -> Result<Vec<Debt>> {
        drafts
            .into_iter()
            .map(|draft| draft.into_debt(self.config.number_format))
            .collect()
    }

    pub fn rank(&self, debts: &[Debt]) -> Vec<Debt> {
        rank_with(debts, self.config.settled_epsilon)
    }

    /// allocate an already derived monthly extra
    pub fn allocate_extra(
        &self,
        debts: &[Debt],
        monthly_extra: Money,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<Allocation> {
        let allocation = allocate(&self.rank(debts), monthly_extra)?;
        record(&allocation, time_provider, events);
        Ok(allocation)
    }

    /// derive the extra from a declared budget and allocate it
    pub fn plan(
        &self,
        debts: &[Debt],
        declared_budget: Money,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<StrategyOutcome> {
        let capacity = BudgetCapacity::assess(declared_budget, debts, self.config.settled_epsilon)?;
        debug!(
            "budget {} covers minimums {} with extra {}",
            capacity.declared_budget, capacity.total_minimums, capacity.monthly_extra
        );

        if let Some(shortfall) = capacity.shortfall {
            events.emit(Event::BudgetShortfall {
                declared_budget,
                total_minimums: capacity.total_minimums,
                shortfall,
                timestamp: time_provider.now(),
            });
        }

        let allocation = self.allocate_extra(debts, capacity.monthly_extra, time_provider, events)?;
        Ok(StrategyOutcome {
            capacity,
            allocation,
        })
    }

    /// full payoff timeline for a declared budget
    pub fn project(
        &self,
        debts: &[Debt],
        declared_budget: Money,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<PayoffProjection> {
        let capacity = BudgetCapacity::assess(declared_budget, debts, self.config.settled_epsilon)?;
        project(debts, capacity.monthly_extra, &self.config, time_provider, events)
    }

    /// submit a payment, checking settlement against the configured threshold
    pub fn submit_payment<E: PaymentExecutor + ?Sized>(
        &self,
        executor: &mut E,
        request: &PaymentRequest,
        debt: &Debt,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<PaymentReceipt> {
        submit_with(
            executor,
            request,
            debt,
            self.config.settled_epsilon,
            time_provider,
            events,
        )
    }
}

fn record(allocation: &Allocation, time_provider: &SafeTimeProvider, events: &mut EventStore) {
    let event = match allocation {
        Allocation::Settled => Event::AllDebtsSettled {
            timestamp: time_provider.now(),
        },
        Allocation::Active(plan) => Event::PlanComputed {
            target_id: plan.target.id,
            target_name: plan.target.name.clone(),
            payment_amount: plan.payment_amount,
            extra_power: plan.extra_power,
            maintenance_count: plan.others.len(),
            timestamp: time_provider.now(),
        },
    };
    events.emit(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SnowballError;
    use crate::parse::NumberFormat;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        ))
    }

    fn drafts() -> Vec<DebtDraft> {
        vec![
            DebtDraft {
                name: "Card A".to_string(),
                current_balance: "500".to_string(),
                min_payment: "50".to_string(),
                ..Default::default()
            },
            DebtDraft {
                name: "Card B".to_string(),
                current_balance: "1,200".to_string(),
                min_payment: "80".to_string(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_plan_from_budget() {
        let strategy = SnowballStrategy::new(
            StrategyConfig::default().with_number_format(NumberFormat::Standard),
        )
        .unwrap();
        let debts = strategy.parse_debts(drafts()).unwrap();
        let mut events = EventStore::new();

        let outcome = strategy.plan(&debts, Money::from_major(230), &time(), &mut events).unwrap();

        assert_eq!(outcome.capacity.monthly_extra, Money::from_major(100));
        let plan = outcome.allocation.plan().unwrap();
        assert_eq!(plan.target.name, "Card A");
        assert_eq!(plan.payment_amount, Money::from_major(150));
        assert!(matches!(events.events(), [Event::PlanComputed { .. }]));
    }

    #[test]
    fn test_plan_with_shortfall_still_recommends_minimum() {
        let strategy = SnowballStrategy::default();
        let debts = strategy.parse_debts(drafts()).unwrap();
        let mut events = EventStore::new();

        let outcome = strategy.plan(&debts, Money::from_major(100), &time(), &mut events).unwrap();

        assert_eq!(outcome.capacity.shortfall, Some(Money::from_major(30)));
        assert_eq!(outcome.allocation.plan().unwrap().payment_amount, Money::from_major(50));
        assert!(matches!(
            events.events(),
            [Event::BudgetShortfall { .. }, Event::PlanComputed { .. }]
        ));
    }

    #[test]
    fn test_settled_snapshot() {
        let strategy = SnowballStrategy::default();
        let debts = vec![Debt::builder()
            .name("Done")
            .balance(Money::ZERO)
            .min_payment(Money::from_major(20))
            .build()
            .unwrap()];
        let mut events = EventStore::new();

        let outcome = strategy.plan(&debts, Money::from_major(500), &time(), &mut events).unwrap();
        assert!(outcome.allocation.is_settled());
        assert!(matches!(events.events(), [Event::AllDebtsSettled { .. }]));
    }

    #[test]
    fn test_recomputes_from_fresh_snapshot() {
        let strategy = SnowballStrategy::default();
        let mut debts = strategy.parse_debts(drafts()).unwrap();
        let mut events = EventStore::new();

        let before = strategy.plan(&debts, Money::from_major(230), &time(), &mut events).unwrap();
        assert_eq!(before.allocation.plan().unwrap().target.name, "Card A");

        // card a paid off externally
        debts[0].current_balance = Money::ZERO;
        let after = strategy.plan(&debts, Money::from_major(230), &time(), &mut events).unwrap();
        let plan = after.allocation.plan().unwrap();
        assert_eq!(plan.target.name, "Card B");
        assert_eq!(plan.payment_amount, Money::from_major(230));
    }

    #[test]
    fn test_project_through_strategy() {
        let strategy = SnowballStrategy::new(StrategyConfig::without_interest()).unwrap();
        let debts = strategy.parse_debts(drafts()).unwrap();
        let mut events = EventStore::new();

        let projection = strategy.project(&debts, Money::from_major(230), &time(), &mut events).unwrap();
        assert_eq!(projection.months_to_debt_free, 8);
        assert_eq!(projection.payoffs.len(), 2);
    }

    struct AcceptAll;

    impl PaymentExecutor for AcceptAll {
        fn execute(&mut self, request: &PaymentRequest) -> Result<PaymentReceipt> {
            Ok(PaymentReceipt {
                debt_id: request.debt_id,
                amount_applied: request.amount,
                remaining_balance: Money::ZERO,
            })
        }
    }

    #[test]
    fn test_submit_payment_uses_configured_threshold() {
        let strategy = SnowballStrategy::new(
            StrategyConfig::default().with_settled_epsilon(Money::from_major(10)),
        )
        .unwrap();
        let dust = Debt::builder()
            .name("Dust")
            .balance(Money::from_major(5))
            .min_payment(Money::from_major(5))
            .build()
            .unwrap();
        let time = time();
        let mut events = EventStore::new();

        // ranking already drops it, so payment must refuse it too
        assert!(strategy.rank(std::slice::from_ref(&dust)).is_empty());
        let request = PaymentRequest::maintenance(&dust, time.now());
        let result = strategy.submit_payment(&mut AcceptAll, &request, &dust, &time, &mut events);
        assert_eq!(result, Err(SnowballError::DebtAlreadySettled { id: dust.id }));

        let default = SnowballStrategy::default();
        let receipt = default
            .submit_payment(&mut AcceptAll, &request, &dust, &time, &mut events)
            .unwrap();
        assert!(receipt.settled());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = StrategyConfig::default().with_max_projection_months(0);
        assert!(SnowballStrategy::new(config).is_err());
    }
}
