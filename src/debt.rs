use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{Result, SnowballError};
use crate::parse::{parse_non_negative_money, parse_rate, NumberFormat};
use crate::types::DebtId;

/// one outstanding liability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: DebtId,
    pub name: String,
    /// amount still owed
    pub current_balance: Money,
    /// original principal
    pub total_amount: Money,
    /// annual rate, informational for ranking
    pub interest_rate: Rate,
    /// contractual minimum monthly payment
    pub min_payment: Money,
    pub due_date: Option<NaiveDate>,
}

impl Debt {
    pub fn builder() -> DebtBuilder {
        DebtBuilder::new()
    }

    pub fn is_settled(&self, epsilon: Money) -> bool {
        self.current_balance <= epsilon
    }

    /// share of the original principal already repaid, in `[0, 1]`
    pub fn paid_off_ratio(&self) -> Decimal {
        if !self.total_amount.is_positive() {
            return Decimal::ZERO;
        }
        let paid = (self.total_amount - self.current_balance).clamp_non_negative();
        (paid.as_decimal() / self.total_amount.as_decimal()).min(Decimal::ONE)
    }

    /// interest one month adds to the current balance
    pub fn monthly_interest(&self) -> Money {
        self.current_balance
            .apply_periodic_rate(self.interest_rate.monthly_rate())
    }

    /// signed days from the provider's current date to the due date
    pub fn days_until_due(&self, time: &SafeTimeProvider) -> Option<i64> {
        let today = time.now().date_naive();
        self.due_date.map(|due| (due - today).num_days())
    }
}

/// builder for debts created in code
#[derive(Debug, Default)]
pub struct DebtBuilder {
    id: Option<DebtId>,
    name: Option<String>,
    current_balance: Option<Money>,
    total_amount: Option<Money>,
    interest_rate: Option<Rate>,
    min_payment: Option<Money>,
    due_date: Option<NaiveDate>,
}

impl DebtBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: DebtId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn balance(mut self, balance: Money) -> Self {
        self.current_balance = Some(balance);
        self
    }

    pub fn total_amount(mut self, total: Money) -> Self {
        self.total_amount = Some(total);
        self
    }

    pub fn rate(mut self, rate: Rate) -> Self {
        self.interest_rate = Some(rate);
        self
    }

    pub fn min_payment(mut self, min_payment: Money) -> Self {
        self.min_payment = Some(min_payment);
        self
    }

    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn build(self) -> Result<Debt> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or(SnowballError::InvalidDebt {
                field: "name",
                message: "name is required".to_string(),
            })?;
        let current_balance = self.current_balance.ok_or(SnowballError::InvalidDebt {
            field: "current_balance",
            message: "balance is required".to_string(),
        })?;

        let debt = Debt {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            name,
            current_balance,
            // new debts start with nothing repaid
            total_amount: self.total_amount.unwrap_or(current_balance),
            interest_rate: self.interest_rate.unwrap_or(Rate::ZERO),
            min_payment: self.min_payment.unwrap_or(Money::ZERO),
            due_date: self.due_date,
        };
        debt.validate()?;
        Ok(debt)
    }
}

impl Debt {
    /// non-negative amounts within [`Money::MAX_AMOUNT`], rate within 0–1000%
    pub fn validate(&self) -> Result<()> {
        let debt = self;
        let amounts = [
            ("current_balance", debt.current_balance),
            ("total_amount", debt.total_amount),
            ("min_payment", debt.min_payment),
        ];
        for (field, amount) in amounts {
            if amount.is_negative() {
                return Err(SnowballError::InvalidDebt {
                    field,
                    message: format!("must not be negative, got {amount}"),
                });
            }
            if !amount.is_within_limit() {
                return Err(SnowballError::InvalidDebt {
                    field,
                    message: format!("must not exceed {}, got {amount}", Money::MAX_AMOUNT),
                });
            }
        }
        if debt.interest_rate.is_negative() || !debt.interest_rate.is_within_limit() {
            return Err(SnowballError::InvalidDebt {
                field: "interest_rate",
                message: format!("must be between 0% and 1000%, got {}", debt.interest_rate),
            });
        }
        Ok(())
    }
}

/// debt as typed into a form, before any number has been parsed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtDraft {
    pub id: Option<DebtId>,
    pub name: String,
    pub current_balance: String,
    /// empty means same as the current balance
    #[serde(default)]
    pub total_amount: String,
    #[serde(default)]
    pub interest_rate: String,
    #[serde(default)]
    pub min_payment: String,
    pub due_date: Option<NaiveDate>,
}

impl DebtDraft {
    /// parse every field once and produce a validated debt
    pub fn into_debt(self, format: NumberFormat) -> Result<Debt> {
        let optional_money = |field: &'static str, input: &str| -> Result<Option<Money>> {
            if input.trim().is_empty() {
                return Ok(None);
            }
            parse_non_negative_money(input, format)
                .map(Some)
                .map_err(|e| SnowballError::InvalidDebt { field, message: e.to_string() })
        };

        let current_balance = parse_non_negative_money(&self.current_balance, format)
            .map_err(|e| SnowballError::InvalidDebt {
                field: "current_balance",
                message: e.to_string(),
            })?;
        let total_amount = optional_money("total_amount", &self.total_amount)?;
        let min_payment = optional_money("min_payment", &self.min_payment)?;
        let interest_rate = if self.interest_rate.trim().is_empty() {
            None
        } else {
            Some(parse_rate(&self.interest_rate, format).map_err(|e| {
                SnowballError::InvalidDebt {
                    field: "interest_rate",
                    message: e.to_string(),
                }
            })?)
        };

        let mut builder = Debt::builder()
            .name(self.name.trim())
            .balance(current_balance);
        if let Some(id) = self.id {
            builder = builder.id(id);
        }
        if let Some(total) = total_amount {
            builder = builder.total_amount(total);
        }
        if let Some(rate) = interest_rate {
            builder = builder.rate(rate);
        }
        if let Some(min) = min_payment {
            builder = builder.min_payment(min);
        }
        if let Some(due) = self.due_date {
            builder = builder.due_date(due);
        }
        builder.build()
    }
}
