use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::debt::Debt;
use crate::decimal::Money;
use crate::errors::{Result, SnowballError};
use crate::types::{DebtId, DebtStanding};

/// this month's recommendation for a non-empty set of active debts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    /// smallest active balance
    pub target: Debt,
    /// remaining active debts, minimum payment only
    pub others: Vec<Debt>,
    /// recommended payment on the target
    pub payment_amount: Money,
    /// surplus above all minimums that powers the target payment
    pub extra_power: Money,
}

/// a single line of the maintenance list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenancePayment {
    pub debt_id: DebtId,
    pub name: String,
    pub amount: Money,
}

impl PaymentPlan {
    /// minimum payment owed on each maintenance debt, capped at its balance
    pub fn maintenance_payments(&self) -> Vec<MaintenancePayment> {
        self.others
            .iter()
            .map(|debt| MaintenancePayment {
                debt_id: debt.id,
                name: debt.name.clone(),
                amount: debt.min_payment.min(debt.current_balance),
            })
            .collect()
    }

    /// target payment plus every maintenance payment
    pub fn total_monthly_outlay(&self) -> Money {
        let maintenance: Money = self.maintenance_payments().iter().map(|p| p.amount).sum();
        self.payment_amount + maintenance
    }

    /// whether this month's payment clears the target entirely
    pub fn pays_off_target(&self) -> bool {
        self.payment_amount >= self.target.current_balance
    }

    pub fn standing_of(&self, id: DebtId) -> Option<DebtStanding> {
        if self.target.id == id {
            Some(DebtStanding::Target)
        } else if self.others.iter().any(|d| d.id == id) {
            Some(DebtStanding::Maintenance)
        } else {
            None
        }
    }
}

/// outcome of allocating a month's budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Allocation {
    /// nothing left to pay
    Settled,
    Active(PaymentPlan),
}

impl Allocation {
    pub fn is_settled(&self) -> bool {
        matches!(self, Allocation::Settled)
    }

    pub fn plan(&self) -> Option<&PaymentPlan> {
        match self {
            Allocation::Settled => None,
            Allocation::Active(plan) => Some(plan),
        }
    }
}

/// reject extras the plan cannot honour
pub(crate) fn check_extra(monthly_extra: Money) -> Result<()> {
    if monthly_extra.is_negative() {
        return Err(SnowballError::NegativeExtraPayment {
            extra: monthly_extra,
        });
    }
    if !monthly_extra.is_within_limit() {
        return Err(SnowballError::InvalidAmount {
            input: monthly_extra.to_string(),
            reason: format!("extra payment exceeds {}", Money::MAX_AMOUNT),
        });
    }
    Ok(())
}

/// allocate the monthly extra to the first of the ranked active debts
///
/// `active` must already be ranked. the target receives its minimum plus
/// `monthly_extra`, never more than its balance. a negative extra is rejected
/// rather than letting the target fall below its minimum payment.
pub fn allocate(active: &[Debt], monthly_extra: Money) -> Result<Allocation> {
    check_extra(monthly_extra)?;

    let Some((target, others)) = active.split_first() else {
        debug!("no active debts, all settled");
        return Ok(Allocation::Settled);
    };

    let power_payment = target
        .min_payment
        .checked_add(monthly_extra)
        .ok_or_else(|| SnowballError::InvalidAmount {
            input: target.min_payment.to_string(),
            reason: format!("minimum payment of {} overflows with the extra", target.name),
        })?;
    let payment_amount = power_payment.min(target.current_balance);

    info!(
        "snowball target {} ({}): pay {} of balance {}, {} in maintenance",
        target.name,
        target.id,
        payment_amount,
        target.current_balance,
        others.len()
    );

    Ok(Allocation::Active(PaymentPlan {
        target: target.clone(),
        others: others.to_vec(),
        payment_amount,
        extra_power: monthly_extra,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::rank;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn debt(id: u128, name: &str, balance: Money, min: i64) -> Debt {
        Debt::builder()
            .id(Uuid::from_u128(id))
            .name(name)
            .balance(balance)
            .min_payment(Money::from_major(min))
            .build()
            .unwrap()
    }

    #[test]
    fn test_allocate_targets_smallest() {
        let debts = vec![
            debt(1, "Card A", Money::from_major(500), 50),
            debt(2, "Card B", Money::from_major(1_200), 80),
            debt(3, "Loan C", Money::ZERO, 0),
        ];

        let allocation = allocate(&rank(&debts), Money::from_major(100)).unwrap();
        let plan = allocation.plan().unwrap();

        assert_eq!(plan.target.name, "Card A");
        assert_eq!(plan.payment_amount, Money::from_major(150));
        assert_eq!(plan.extra_power, Money::from_major(100));
        assert_eq!(plan.others.len(), 1);
        assert_eq!(plan.others[0].name, "Card B");
        assert!(!plan.pays_off_target());
    }

    #[test]
    fn test_allocate_clamps_to_balance() {
        let debts = vec![debt(1, "Only Debt", Money::from_major(80), 50)];

        let allocation = allocate(&rank(&debts), Money::from_major(100)).unwrap();
        let plan = allocation.plan().unwrap();

        assert_eq!(plan.payment_amount, Money::from_major(80));
        assert!(plan.pays_off_target());
        assert!(plan.others.is_empty());
    }

    #[test]
    fn test_allocate_empty_is_settled() {
        assert_eq!(allocate(&[], Money::ZERO).unwrap(), Allocation::Settled);
        assert!(allocate(&[], Money::from_major(1_000)).unwrap().is_settled());
    }

    #[test]
    fn test_allocate_dust_balance_is_settled() {
        let debts = vec![debt(1, "Dust", Money::from_decimal(dec!(0.005)), 10)];

        let allocation = allocate(&rank(&debts), Money::from_major(25)).unwrap();
        assert_eq!(allocation, Allocation::Settled);
    }

    #[test]
    fn test_allocate_zero_extra_pays_minimum() {
        let debts = vec![
            debt(1, "Card", Money::from_major(400), 40),
            debt(2, "Loan", Money::from_major(900), 60),
        ];

        let allocation = allocate(&rank(&debts), Money::ZERO).unwrap();
        let plan = allocation.plan().unwrap();
        assert_eq!(plan.payment_amount, Money::from_major(40));
        assert_eq!(plan.total_monthly_outlay(), Money::from_major(100));
    }

    #[test]
    fn test_allocate_rejects_negative_extra() {
        let debts = vec![debt(1, "Card", Money::from_major(400), 40)];

        let result = allocate(&debts, Money::from_major(-10));
        assert_eq!(
            result,
            Err(SnowballError::NegativeExtraPayment { extra: Money::from_major(-10) })
        );
    }

    #[test]
    fn test_allocate_at_amount_limit() {
        let debts = vec![Debt::builder()
            .id(Uuid::from_u128(1))
            .name("Sovereign")
            .balance(Money::MAX_AMOUNT)
            .min_payment(Money::MAX_AMOUNT)
            .build()
            .unwrap()];

        let allocation = allocate(&debts, Money::MAX_AMOUNT).unwrap();
        assert_eq!(allocation.plan().unwrap().payment_amount, Money::MAX_AMOUNT);

        let huge = Money::from_str_exact("79228162514264337593543950330").unwrap();
        assert!(matches!(allocate(&debts, huge), Err(SnowballError::InvalidAmount { .. })));
    }

    #[test]
    fn test_allocate_unvalidated_debt_errors_instead_of_overflowing() {
        let huge = Money::from_str_exact("79228162514264337593543950330").unwrap();
        let debts = vec![Debt {
            id: Uuid::from_u128(1),
            name: "Deserialized".to_string(),
            current_balance: huge,
            total_amount: huge,
            interest_rate: crate::decimal::Rate::ZERO,
            min_payment: huge,
            due_date: None,
        }];

        let result = allocate(&debts, Money::MAX_AMOUNT);
        assert!(matches!(result, Err(SnowballError::InvalidAmount { .. })));
    }

    #[test]
    fn test_maintenance_payments_capped_at_balance() {
        let debts = vec![
            debt(1, "Target", Money::from_major(20), 5),
            debt(2, "Almost done", Money::from_major(30), 50),
            debt(3, "Big", Money::from_major(5_000), 150),
        ];

        let allocation = allocate(&rank(&debts), Money::from_major(10)).unwrap();
        let plan = allocation.plan().unwrap();
        let maintenance = plan.maintenance_payments();

        assert_eq!(maintenance[0].amount, Money::from_major(30));
        assert_eq!(maintenance[1].amount, Money::from_major(150));
        assert_eq!(plan.total_monthly_outlay(), Money::from_major(195));
    }

    #[test]
    fn test_standing_of() {
        let debts = vec![
            debt(1, "Target", Money::from_major(20), 5),
            debt(2, "Other", Money::from_major(30), 5),
        ];

        let allocation = allocate(&rank(&debts), Money::ZERO).unwrap();
        let plan = allocation.plan().unwrap();
        assert_eq!(plan.standing_of(Uuid::from_u128(1)), Some(DebtStanding::Target));
        assert_eq!(plan.standing_of(Uuid::from_u128(2)), Some(DebtStanding::Maintenance));
        assert_eq!(plan.standing_of(Uuid::from_u128(9)), None);
    }
}
