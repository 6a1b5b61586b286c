//! Split encodings and the canonical per-member allocation.
//!
//! Expenses have been stored in three shapes over time: a map keyed by
//! member id, a map carrying the legacy `self` key for the viewer's share,
//! and no splits at all. [`SplitShape`] captures which one a row used and
//! [`SplitShape::resolve`] turns it into an [`Allocation`] once, at ingestion.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;
use utoipa::ToSchema;

use crate::constants::{MONEY_DECIMAL_PLACES, SELF_SPLIT_KEY};
use crate::core::errors::LedgerError;
use crate::core::models::amount::parse_decimal;
use crate::core::models::group::MemberId;

/// Rounds to cents, always carrying two decimal places.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_DECIMAL_PLACES);
    rounded
}

/// Drops everything below a cent, so a share never exceeds its exact value.
fn truncate_cents(value: Decimal) -> Decimal {
    let mut truncated = value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::ToZero);
    truncated.rescale(MONEY_DECIMAL_PLACES);
    truncated
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct Share {
    pub member_id: MemberId,
    #[schema(value_type = String, example = "33.33")]
    pub amount: Decimal,
}

/// Ordered member → owed amount mapping. Each member appears at most once.
#[derive(Clone, Debug, Default, PartialEq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Allocation(Vec<Share>);

impl Allocation {
    pub fn new() -> Self {
        Allocation(Vec::new())
    }

    /// Adds `amount` to the member's share, appending the member if absent.
    pub fn add(&mut self, member_id: &str, amount: Decimal) {
        match self.0.iter_mut().find(|s| s.member_id == member_id) {
            Some(share) => share.amount += amount,
            None => self.0.push(Share {
                member_id: member_id.to_string(),
                amount,
            }),
        }
    }

    pub fn get(&self, member_id: &str) -> Option<Decimal> {
        self.0.iter().find(|s| s.member_id == member_id).map(|s| s.amount)
    }

    pub fn total(&self) -> Decimal {
        self.0.iter().map(|s| s.amount).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Share> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(MemberId, Decimal)> for Allocation {
    fn from_iter<I: IntoIterator<Item = (MemberId, Decimal)>>(iter: I) -> Self {
        let mut allocation = Allocation::new();
        for (member_id, amount) in iter {
            allocation.add(&member_id, amount);
        }
        allocation
    }
}

/// How the allocation of an expense was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SplitSource {
    Recorded,
    ViewerSentinel,
    EqualFallback,
}

/// The split column of a transaction row, classified.
#[derive(Clone, Debug, PartialEq)]
pub enum SplitShape {
    ByMember(BTreeMap<MemberId, Decimal>),
    ViewerRelative {
        viewer_share: Decimal,
        others: BTreeMap<MemberId, Decimal>,
    },
    Unrecorded,
    /// Present but not a map (array, string, number)
    Malformed,
}

/// Everything outside the split column needed to resolve it.
pub struct SplitContext<'a> {
    pub amount: Decimal,
    pub payer_id: &'a str,
    pub participant_ids: &'a [MemberId],
    pub roster: &'a [MemberId],
    /// Roster key of the viewing user in this group
    pub viewer_key: &'a str,
}

impl SplitShape {
    pub fn from_raw(raw: Option<&Value>) -> Self {
        let map = match raw {
            None | Some(Value::Null) => return SplitShape::Unrecorded,
            Some(Value::Object(map)) => map,
            Some(_) => return SplitShape::Malformed,
        };
        if map.is_empty() {
            return SplitShape::Unrecorded;
        }
        // Entries that do not parse count as a zero share
        let mut entries: BTreeMap<MemberId, Decimal> = map
            .iter()
            .map(|(k, v)| (k.clone(), parse_decimal(v).unwrap_or(Decimal::ZERO)))
            .collect();
        match entries.remove(SELF_SPLIT_KEY) {
            Some(viewer_share) => SplitShape::ViewerRelative {
                viewer_share,
                others: entries,
            },
            None => SplitShape::ByMember(entries),
        }
    }

    pub fn resolve(&self, ctx: &SplitContext<'_>) -> (Allocation, SplitSource) {
        match self {
            SplitShape::ByMember(entries) => (
                entries.iter().map(|(k, v)| (k.clone(), *v)).collect(),
                SplitSource::Recorded,
            ),
            // Only the viewer's exposure is recoverable; everyone else owes nothing here
            SplitShape::ViewerRelative { viewer_share, others } => {
                let mut allocation = Allocation::new();
                let share = others.get(ctx.viewer_key).copied().unwrap_or(*viewer_share);
                allocation.add(ctx.viewer_key, share);
                (allocation, SplitSource::ViewerSentinel)
            }
            SplitShape::Unrecorded | SplitShape::Malformed => {
                let sharers = if ctx.participant_ids.is_empty() {
                    ctx.roster
                } else {
                    ctx.participant_ids
                };
                (equal_split(ctx.amount, sharers, ctx.payer_id), SplitSource::EqualFallback)
            }
        }
    }
}

/// Splits `amount` evenly across `sharers`, in order. Each share is cut
/// down to cents and the leftover cents are handed out one at a time, to the
/// payer first when the payer shares the expense, then to the sharers in order.
pub fn equal_split(amount: Decimal, sharers: &[MemberId], payer_id: &str) -> Allocation {
    let sharers = dedup(sharers);
    if sharers.is_empty() {
        let mut allocation = Allocation::new();
        if !payer_id.is_empty() {
            allocation.add(payer_id, amount);
        }
        return allocation;
    }
    let per = truncate_cents(amount / Decimal::from(sharers.len()));
    let shares = sharers.iter().map(|id| (id.clone(), per)).collect();
    settle_remainder(amount, shares, payer_id)
}

/// Splits `amount` proportionally to each sharer's weight.
pub fn weighted_split(
    amount: Decimal,
    weights: &[(MemberId, Decimal)],
    payer_id: &str,
) -> Result<Allocation, LedgerError> {
    let total_weight: Decimal = weights.iter().map(|(_, w)| *w).sum();
    if total_weight <= Decimal::ZERO || weights.iter().any(|(_, w)| w.is_sign_negative()) {
        return Err(LedgerError::InvalidWeights);
    }
    let shares = weights
        .iter()
        .map(|(id, w)| (id.clone(), truncate_cents(amount * *w / total_weight)))
        .collect();
    Ok(settle_remainder(amount, shares, payer_id))
}

fn settle_remainder(amount: Decimal, shares: Vec<(MemberId, Decimal)>, payer_id: &str) -> Allocation {
    let allocated: Decimal = shares.iter().map(|(_, s)| *s).sum();
    let mut remainder = amount - allocated;
    let mut allocation: Allocation = shares.into_iter().collect();
    if remainder.is_zero() {
        return allocation;
    }

    let mut order: Vec<MemberId> = Vec::with_capacity(allocation.len());
    if allocation.get(payer_id).is_some() {
        order.push(payer_id.to_string());
    }
    order.extend(
        allocation
            .iter()
            .map(|s| s.member_id.clone())
            .filter(|id| id != payer_id),
    );
    debug!("Distributing split remainder {} over {} sharers", remainder, order.len());

    let cent = Decimal::new(1, MONEY_DECIMAL_PLACES);
    let step = if remainder.is_sign_negative() { -cent } else { cent };
    for member_id in order.iter().cycle() {
        if remainder.abs() < cent {
            break;
        }
        allocation.add(member_id, step);
        remainder -= step;
    }
    // Amounts recorded below cent precision leave a residue smaller than a cent
    if let Some(first) = order.first().filter(|_| !remainder.is_zero()) {
        allocation.add(first, remainder);
    }
    allocation
}

fn dedup(ids: &[MemberId]) -> Vec<MemberId> {
    let mut seen: Vec<MemberId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(id.clone());
        }
    }
    seen
}
