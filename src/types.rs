use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a debt
pub type DebtId = Uuid;

/// balance at or below which a debt counts as paid off
pub const SETTLED_EPSILON: crate::decimal::Money = crate::decimal::Money::CENT;

/// role a payment plays in the monthly plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentKind {
    /// accelerated payment on the snowball target
    Target,
    /// minimum-only payment on a debt in maintenance mode
    Maintenance,
}

/// standing of a single debt inside a computed plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtStanding {
    /// balance at or below the settled threshold
    Settled,
    /// smallest active balance, receives the extra capacity
    Target,
    /// active but not targeted, minimum payment only
    Maintenance,
}
