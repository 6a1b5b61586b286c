//! Balance computation over a normalized snapshot.
//!
//! `balance(m) = paid_by(m) - owed_by(m)`, then every settlement
//! `from -> to, amount` subtracts `amount` from `from` and adds it to `to`.
//! Positive balances are owed to the member, negative ones are owed by them.
//!
//! These functions are pure. They take whole slices and pick out the records
//! of the group at hand, so callers can hand over everything they fetched.

use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::debug;

use crate::core::errors::{IntegrityWarning, flag};
use crate::core::models::{
    expense::Expense,
    group::Group,
    settlement::Settlement,
    summary::{GroupSummary, MemberBalance},
};
use crate::core::splits::round_money;

pub fn compute_group_summary(
    group: &Group,
    expenses: &[Expense],
    settlements: &[Settlement],
    current_user_id: &str,
) -> GroupSummary {
    debug!("Computing summary for group {}", group.id);
    let mut warnings = Vec::new();
    let mut balances: Vec<Decimal> = vec![Decimal::ZERO; group.members.len()];
    let index_of = |reference: &str| group.position_of(reference);
    let mut total_spent = Decimal::ZERO;

    for expense in expenses.iter().filter(|e| e.group_id == group.id) {
        let amount = expense.amount.value;
        total_spent += amount;

        match index_of(expense.payer_id.as_str()) {
            Some(i) => balances[i] += amount,
            None => flag(
                &mut warnings,
                IntegrityWarning::UnknownPayer {
                    expense_id: expense.id.clone(),
                    payer_id: expense.payer_id.clone(),
                },
            ),
        }

        for share in expense.splits.iter() {
            match index_of(share.member_id.as_str()) {
                Some(i) => balances[i] -= share.amount,
                None => flag(
                    &mut warnings,
                    IntegrityWarning::UnknownSplitMember {
                        expense_id: expense.id.clone(),
                        member_id: share.member_id.clone(),
                    },
                ),
            }
        }
    }

    for settlement in settlements.iter().filter(|s| s.group_id == group.id) {
        let amount = settlement.amount.value;
        for (member_id, delta) in [
            (&settlement.from_member_id, -amount),
            (&settlement.to_member_id, amount),
        ] {
            match index_of(member_id.as_str()) {
                Some(i) => balances[i] += delta,
                None => flag(
                    &mut warnings,
                    IntegrityWarning::UnknownSettlementParty {
                        settlement_id: settlement.id.clone(),
                        member_id: member_id.clone(),
                    },
                ),
            }
        }
    }

    let per_member_balance: Vec<MemberBalance> = group
        .members
        .iter()
        .zip(balances)
        .map(|(member, balance)| MemberBalance {
            member_id: member.id.clone(),
            name: member.name.clone(),
            balance: round_money(balance),
        })
        .collect();

    let current_user_balance = match group.member_for_user(current_user_id) {
        Some(member) => per_member_balance
            .iter()
            .find(|b| b.member_id == member.id)
            .map(|b| b.balance)
            .unwrap_or(Decimal::ZERO),
        None => {
            flag(
                &mut warnings,
                IntegrityWarning::ViewerNotInRoster {
                    group_id: group.id.clone(),
                    user_id: current_user_id.to_string(),
                },
            );
            Decimal::ZERO
        }
    };

    GroupSummary {
        group_id: group.id.clone(),
        group_name: group.name.clone(),
        category: group.category,
        total_spent: round_money(total_spent),
        per_member_balance,
        current_user_balance,
        warnings,
    }
}

/// Sum of the current user's balance over `groups`. A group listed more than
/// once is counted once.
pub fn compute_global_balance(
    groups: &[Group],
    expenses: &[Expense],
    settlements: &[Settlement],
    current_user_id: &str,
) -> Decimal {
    let mut seen = HashSet::new();
    let total: Decimal = groups
        .iter()
        .filter(|g| seen.insert(g.id.as_str()))
        .map(|g| compute_group_summary(g, expenses, settlements, current_user_id).current_user_balance)
        .sum();
    debug!("Global balance for {}: {}", current_user_id, total);
    round_money(total)
}
