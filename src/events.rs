use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{DebtId, PaymentKind};

/// all events emitted while planning or projecting payoffs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // planning events
    PlanComputed {
        target_id: DebtId,
        target_name: String,
        payment_amount: Money,
        extra_power: Money,
        maintenance_count: usize,
        timestamp: DateTime<Utc>,
    },
    AllDebtsSettled {
        timestamp: DateTime<Utc>,
    },
    BudgetShortfall {
        declared_budget: Money,
        total_minimums: Money,
        shortfall: Money,
        timestamp: DateTime<Utc>,
    },

    // projection events
    DebtPaidOff {
        debt_id: DebtId,
        name: String,
        month: u32,
        month_start: NaiveDate,
        total_paid: Money,
    },
    SnowballRolled {
        from_id: DebtId,
        to_id: DebtId,
        freed_minimum: Money,
        month: u32,
    },

    // payment events
    PaymentRequested {
        debt_id: DebtId,
        amount: Money,
        kind: PaymentKind,
        timestamp: DateTime<Utc>,
    },
    PaymentConfirmed {
        debt_id: DebtId,
        amount_applied: Money,
        remaining_balance: Money,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// serialize collected events for an audit trail
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.events)
    }
}
