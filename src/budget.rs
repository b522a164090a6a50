use log::warn;
use serde::{Deserialize, Serialize};

use crate::debt::Debt;
use crate::decimal::Money;
use crate::errors::{Result, SnowballError};

/// how a declared monthly budget covers the active minimum payments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetCapacity {
    pub declared_budget: Money,
    /// sum of minimum payments over active debts
    pub total_minimums: Money,
    /// surplus above all minimums, never negative
    pub monthly_extra: Money,
    /// amount the budget falls short of the minimums, if any
    pub shortfall: Option<Money>,
}

impl BudgetCapacity {
    /// derive the extra capacity for the debts above `epsilon`
    pub fn assess(declared_budget: Money, debts: &[Debt], epsilon: Money) -> Result<Self> {
        if declared_budget.is_negative() {
            return Err(SnowballError::NegativeBudget {
                budget: declared_budget,
            });
        }
        if !declared_budget.is_within_limit() {
            return Err(SnowballError::InvalidAmount {
                input: declared_budget.to_string(),
                reason: format!("budget exceeds {}", Money::MAX_AMOUNT),
            });
        }

        let total_minimums = debts
            .iter()
            .filter(|debt| !debt.is_settled(epsilon))
            .try_fold(Money::ZERO, |acc, debt| acc.checked_add(debt.min_payment))
            .ok_or_else(|| SnowballError::InvalidAmount {
                input: declared_budget.to_string(),
                reason: "sum of minimum payments overflows".to_string(),
            })?;

        let surplus = declared_budget - total_minimums;
        let shortfall = if surplus.is_negative() {
            warn!(
                "monthly budget {} does not cover minimum payments {}",
                declared_budget, total_minimums
            );
            Some(surplus.abs())
        } else {
            None
        };

        Ok(Self {
            declared_budget,
            total_minimums,
            monthly_extra: surplus.clamp_non_negative(),
            shortfall,
        })
    }

    pub fn is_insufficient(&self) -> bool {
        self.shortfall.is_some()
    }
}
