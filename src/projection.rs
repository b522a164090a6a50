use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate};
use hourglass_rs::SafeTimeProvider;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::allocation::check_extra;
use crate::config::StrategyConfig;
use crate::debt::Debt;
use crate::decimal::Money;
use crate::errors::{Result, SnowballError};
use crate::events::{Event, EventStore};
use crate::ranking::rank_with;
use crate::types::{DebtId, PaymentKind};

/// one payment inside a projected month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPayment {
    pub debt_id: DebtId,
    pub name: String,
    pub kind: PaymentKind,
    pub interest: Money,
    pub amount: Money,
    pub ending_balance: Money,
}

/// projected month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedMonth {
    /// 1-based month number
    pub month: u32,
    pub month_start: NaiveDate,
    pub target_id: DebtId,
    pub payments: Vec<ProjectedPayment>,
    pub interest_charged: Money,
    pub total_paid: Money,
    pub remaining_balance: Money,
}

/// point at which a debt reaches zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffMilestone {
    pub debt_id: DebtId,
    pub name: String,
    pub month: u32,
    pub month_start: NaiveDate,
    pub total_paid: Money,
}

/// full payoff timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffProjection {
    pub monthly_pool: Money,
    pub months: Vec<ProjectedMonth>,
    /// in payoff order
    pub payoffs: Vec<PayoffMilestone>,
    pub total_paid: Money,
    pub total_interest: Money,
    pub months_to_debt_free: u32,
    pub debt_free_on: Option<NaiveDate>,
}

impl PayoffProjection {
    pub fn milestone_for(&self, id: DebtId) -> Option<&PayoffMilestone> {
        self.payoffs.iter().find(|m| m.debt_id == id)
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn first_of_next_month(time: &SafeTimeProvider) -> Result<NaiveDate> {
    let today = time.now().date_naive();
    NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
        .and_then(|d| d.checked_add_months(Months::new(1)))
        .ok_or_else(|| SnowballError::InvalidDate {
            message: format!("no month follows {today}"),
        })
}

/// simulate snowball payments until every debt is settled
///
/// the pool is fixed up front as the extra plus every active minimum, so a
/// paid-off debt's minimum rolls into the next smallest balance.
pub fn project(
    debts: &[Debt],
    monthly_extra: Money,
    config: &StrategyConfig,
    time: &SafeTimeProvider,
    events: &mut EventStore,
) -> Result<PayoffProjection> {
    check_extra(monthly_extra)?;
    for debt in debts {
        debt.validate()?;
    }

    let epsilon = config.settled_epsilon;
    let mut working = rank_with(debts, epsilon);
    let monthly_pool = working.iter().map(|d| d.min_payment).sum::<Money>() + monthly_extra;
    let start = first_of_next_month(time)?;

    if !working.is_empty() && !monthly_pool.is_positive() {
        return Err(SnowballError::PayoffNotConverging {
            months: config.max_projection_months,
        });
    }

    let mut paid_by_debt: HashMap<DebtId, Money> = HashMap::new();
    let mut months = Vec::new();
    let mut payoffs = Vec::new();
    let mut total_paid = Money::ZERO;
    let mut total_interest = Money::ZERO;
    let mut month = 0u32;

    while !working.is_empty() {
        if month >= config.max_projection_months {
            return Err(SnowballError::PayoffNotConverging {
                months: config.max_projection_months,
            });
        }
        month += 1;
        let month_start = start
            .checked_add_months(Months::new(month - 1))
            .ok_or_else(|| SnowballError::InvalidDate {
                message: format!("month {month} after {start} is out of range"),
            })?;

        let mut interest = vec![Money::ZERO; working.len()];
        if config.accrue_interest {
            for (debt, charged) in working.iter_mut().zip(interest.iter_mut()) {
                *charged = debt.monthly_interest();
                debt.current_balance += *charged;
            }
            // interest outrunning the pool, stop before the balances overflow
            if working.iter().any(|d| !d.current_balance.is_within_limit()) {
                return Err(SnowballError::PayoffNotConverging { months: month });
            }
        }

        // minimums first, then the remainder down the ranking
        let mut amounts: Vec<Money> = working
            .iter()
            .map(|d| d.min_payment.min(d.current_balance))
            .collect();
        let mut leftover = (monthly_pool - amounts.iter().sum::<Money>()).clamp_non_negative();
        for (debt, amount) in working.iter().zip(amounts.iter_mut()) {
            if !leftover.is_positive() {
                break;
            }
            let extra = leftover.min(debt.current_balance - *amount);
            *amount += extra;
            leftover -= extra;
        }

        let target_id = working[0].id;
        let mut payments = Vec::with_capacity(working.len());
        for (i, debt) in working.iter_mut().enumerate() {
            debt.current_balance -= amounts[i];
            *paid_by_debt.entry(debt.id).or_insert(Money::ZERO) += amounts[i];

            payments.push(ProjectedPayment {
                debt_id: debt.id,
                name: debt.name.clone(),
                kind: if i == 0 { PaymentKind::Target } else { PaymentKind::Maintenance },
                interest: interest[i],
                amount: amounts[i],
                ending_balance: debt.current_balance,
            });
        }

        let month_interest: Money = interest.iter().sum();
        let month_paid: Money = amounts.iter().sum();
        total_interest += month_interest;
        total_paid += month_paid;

        let next = rank_with(&working, epsilon);
        for debt in working.iter().filter(|d| d.is_settled(epsilon)) {
            let paid = paid_by_debt.get(&debt.id).copied().unwrap_or(Money::ZERO);
            info!("{} paid off in month {} ({})", debt.name, month, month_start);

            events.emit(Event::DebtPaidOff {
                debt_id: debt.id,
                name: debt.name.clone(),
                month,
                month_start,
                total_paid: paid,
            });
            if let Some(new_target) = next.first() {
                events.emit(Event::SnowballRolled {
                    from_id: debt.id,
                    to_id: new_target.id,
                    freed_minimum: debt.min_payment,
                    month,
                });
            }
            payoffs.push(PayoffMilestone {
                debt_id: debt.id,
                name: debt.name.clone(),
                month,
                month_start,
                total_paid: paid,
            });
        }

        months.push(ProjectedMonth {
            month,
            month_start,
            target_id,
            payments,
            interest_charged: month_interest,
            total_paid: month_paid,
            remaining_balance: next.iter().map(|d| d.current_balance).sum(),
        });
        working = next;
    }

    debug!(
        "projection finished after {} months, paid {} including {} interest",
        month, total_paid, total_interest
    );

    Ok(PayoffProjection {
        monthly_pool,
        debt_free_on: months.last().map(|m| m.month_start),
        months,
        payoffs,
        total_paid,
        total_interest,
        months_to_debt_free: month,
    })
}
