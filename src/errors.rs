use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnowballError {
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount {
        input: String,
        reason: String,
    },

    #[error("invalid debt field {field}: {message}")]
    InvalidDebt {
        field: &'static str,
        message: String,
    },

    #[error("negative extra payment: {extra}")]
    NegativeExtraPayment {
        extra: Money,
    },

    #[error("negative monthly budget: {budget}")]
    NegativeBudget {
        budget: Money,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("payment exceeds balance: balance {balance}, requested {requested}")]
    Overpayment {
        balance: Money,
        requested: Money,
    },

    #[error("payment request for {requested} does not match debt {actual}")]
    DebtMismatch {
        requested: Uuid,
        actual: Uuid,
    },

    #[error("debt already settled: {id}")]
    DebtAlreadySettled {
        id: Uuid,
    },

    #[error("payoff does not converge within {months} months")]
    PayoffNotConverging {
        months: u32,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("payment execution failed: {message}")]
    ExecutionFailed {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, SnowballError>;
