use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::allocation::PaymentPlan;
use crate::debt::Debt;
use crate::decimal::Money;
use crate::errors::{Result, SnowballError};
use crate::events::{Event, EventStore};
use crate::types::{DebtId, PaymentKind, SETTLED_EPSILON};

/// payment request for the external execution service, which moves the money
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub debt_id: DebtId,
    pub debt_name: String,
    pub amount: Money,
    pub kind: PaymentKind,
    /// wallet or account the money is drawn from
    pub funding_source: Option<String>,
    pub requested_at: DateTime<Utc>,
}

impl PaymentRequest {
    /// pay the plan's recommended amount on its target
    pub fn for_target(plan: &PaymentPlan, now: DateTime<Utc>) -> Self {
        Self {
            debt_id: plan.target.id,
            debt_name: plan.target.name.clone(),
            amount: plan.payment_amount,
            kind: PaymentKind::Target,
            funding_source: None,
            requested_at: now,
        }
    }

    /// pay the minimum on a debt in maintenance mode
    pub fn maintenance(debt: &Debt, now: DateTime<Utc>) -> Self {
        Self {
            debt_id: debt.id,
            debt_name: debt.name.clone(),
            amount: debt.min_payment.min(debt.current_balance),
            kind: PaymentKind::Maintenance,
            funding_source: None,
            requested_at: now,
        }
    }

    pub fn from_source(mut self, funding_source: impl Into<String>) -> Self {
        self.funding_source = Some(funding_source.into());
        self
    }

    /// check the request against the debt it names
    pub fn validate(&self, debt: &Debt) -> Result<()> {
        self.validate_with(debt, SETTLED_EPSILON)
    }

    /// as [`PaymentRequest::validate`], treating balances at or below `epsilon` as settled
    pub fn validate_with(&self, debt: &Debt, epsilon: Money) -> Result<()> {
        if self.debt_id != debt.id {
            return Err(SnowballError::DebtMismatch {
                requested: self.debt_id,
                actual: debt.id,
            });
        }
        if debt.is_settled(epsilon) {
            return Err(SnowballError::DebtAlreadySettled { id: debt.id });
        }
        if !self.amount.is_positive() {
            return Err(SnowballError::InvalidPaymentAmount {
                amount: self.amount,
            });
        }
        if self.amount > debt.current_balance {
            return Err(SnowballError::Overpayment {
                balance: debt.current_balance,
                requested: self.amount,
            });
        }
        Ok(())
    }
}

/// confirmation returned by the execution service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub debt_id: DebtId,
    pub amount_applied: Money,
    pub remaining_balance: Money,
}

impl PaymentReceipt {
    pub fn settled(&self) -> bool {
        self.settled_with(SETTLED_EPSILON)
    }

    pub fn settled_with(&self, epsilon: Money) -> bool {
        self.remaining_balance <= epsilon
    }
}

/// atomic payment execution against the backing store
pub trait PaymentExecutor {
    fn execute(&mut self, request: &PaymentRequest) -> Result<PaymentReceipt>;
}

/// validate a request, hand it to the executor and record the outcome
pub fn submit<E: PaymentExecutor + ?Sized>(
    executor: &mut E,
    request: &PaymentRequest,
    debt: &Debt,
    time_provider: &SafeTimeProvider,
    events: &mut EventStore,
) -> Result<PaymentReceipt> {
    submit_with(executor, request, debt, SETTLED_EPSILON, time_provider, events)
}

/// [`submit`] with a caller-chosen settled threshold
pub fn submit_with<E: PaymentExecutor + ?Sized>(
    executor: &mut E,
    request: &PaymentRequest,
    debt: &Debt,
    epsilon: Money,
    time_provider: &SafeTimeProvider,
    events: &mut EventStore,
) -> Result<PaymentReceipt> {
    request.validate_with(debt, epsilon)?;

    events.emit(Event::PaymentRequested {
        debt_id: request.debt_id,
        amount: request.amount,
        kind: request.kind,
        timestamp: time_provider.now(),
    });

    let receipt = executor.execute(request).inspect_err(|e| {
        warn!("payment of {} on {} failed: {}", request.amount, request.debt_name, e);
    })?;

    info!(
        "paid {} on {}, remaining {}",
        receipt.amount_applied, request.debt_name, receipt.remaining_balance
    );
    events.emit(Event::PaymentConfirmed {
        debt_id: receipt.debt_id,
        amount_applied: receipt.amount_applied,
        remaining_balance: receipt.remaining_balance,
        timestamp: time_provider.now(),
    });
    Ok(receipt)
}
