pub mod allocation;
pub mod budget;
pub mod config;
pub mod debt;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod parse;
pub mod payments;
pub mod projection;
pub mod ranking;
pub mod strategy;
pub mod types;

// re-export key types
pub use allocation::{allocate, Allocation, MaintenancePayment, PaymentPlan};
pub use budget::BudgetCapacity;
pub use config::StrategyConfig;
pub use debt::{Debt, DebtBuilder, DebtDraft};
pub use decimal::{Money, Rate};
pub use errors::{Result, SnowballError};
pub use events::{Event, EventStore};
pub use parse::{parse_money, parse_non_negative_money, parse_rate, NumberFormat};
pub use payments::{submit, submit_with, PaymentExecutor, PaymentReceipt, PaymentRequest};
pub use projection::{project, PayoffMilestone, PayoffProjection, ProjectedMonth, ProjectedPayment};
pub use ranking::{rank, rank_with};
pub use strategy::{SnowballStrategy, StrategyOutcome};
pub use types::{DebtId, DebtStanding, PaymentKind, SETTLED_EPSILON};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
