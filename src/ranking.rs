use log::debug;

use crate::debt::Debt;
use crate::decimal::Money;
use crate::types::SETTLED_EPSILON;

/// active debts ordered smallest balance first
///
/// settled debts (balance at or below one cent) are dropped. equal balances
/// are ordered by id so the result never depends on input order.
pub fn rank(debts: &[Debt]) -> Vec<Debt> {
    rank_with(debts, SETTLED_EPSILON)
}

/// [`rank`] with an explicit settled threshold
pub fn rank_with(debts: &[Debt], epsilon: Money) -> Vec<Debt> {
    let mut active: Vec<Debt> = debts
        .iter()
        .filter(|debt| !debt.is_settled(epsilon))
        .cloned()
        .collect();

    active.sort_by(|a, b| {
        a.current_balance
            .cmp(&b.current_balance)
            .then_with(|| a.id.cmp(&b.id))
    });

    debug!(
        "ranked {} active of {} debts (epsilon {})",
        active.len(),
        debts.len(),
        epsilon
    );
    active
}
