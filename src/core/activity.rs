//! Merged, newest-first feed of expenses and settlements.

use rust_decimal::Decimal;
use tracing::debug;

use crate::core::format::{format_brl, format_usd};
use crate::core::models::{
    activity::{ActivityItem, ActivityKind},
    expense::Expense,
    group::Group,
    settlement::Settlement,
};

/// Wording of feed descriptions.
#[derive(Clone, Debug)]
pub struct FeedLocale {
    pub you_subject: &'static str,
    pub you_object: &'static str,
    pub someone_subject: &'static str,
    pub someone_object: &'static str,
    pub unknown_group: &'static str,
    pub paid: &'static str,
    pub money: fn(Decimal) -> String,
}

impl FeedLocale {
    pub fn pt_br() -> Self {
        FeedLocale {
            you_subject: "Você",
            you_object: "você",
            someone_subject: "Alguém",
            someone_object: "alguém",
            unknown_group: "Grupo",
            paid: "pagou",
            money: format_brl,
        }
    }

    pub fn en_us() -> Self {
        FeedLocale {
            you_subject: "You",
            you_object: "you",
            someone_subject: "Someone",
            someone_object: "someone",
            unknown_group: "Group",
            paid: "paid",
            money: format_usd,
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en_us" => FeedLocale::en_us(),
            _ => FeedLocale::pt_br(),
        }
    }
}

impl Default for FeedLocale {
    fn default() -> Self {
        FeedLocale::pt_br()
    }
}

pub fn build_activity_feed(
    expenses: &[Expense],
    settlements: &[Settlement],
    groups: &[Group],
    current_user_id: &str,
    limit: usize,
) -> Vec<ActivityItem> {
    build_activity_feed_with_locale(expenses, settlements, groups, current_user_id, limit, &FeedLocale::default())
}

pub fn build_activity_feed_with_locale(
    expenses: &[Expense],
    settlements: &[Settlement],
    groups: &[Group],
    current_user_id: &str,
    limit: usize,
    locale: &FeedLocale,
) -> Vec<ActivityItem> {
    let names = Names {
        groups,
        current_user_id,
        locale,
    };
    let mut items: Vec<ActivityItem> = Vec::with_capacity(expenses.len() + settlements.len());

    for expense in expenses {
        let payer = names.subject(&expense.group_id, &expense.payer_id);
        items.push(ActivityItem {
            id: format!("tx_{}", expense.id),
            kind: ActivityKind::Expense,
            description: format!("{} {} {}", payer, locale.paid, (locale.money)(expense.amount.value)),
            group_name: names.group(&expense.group_id),
            created_at: expense.created_at,
        });
    }

    for settlement in settlements {
        let from = names.subject(&settlement.group_id, &settlement.from_member_id);
        let to = names.object(&settlement.group_id, &settlement.to_member_id);
        items.push(ActivityItem {
            id: format!("pay_{}", settlement.id),
            kind: ActivityKind::Settlement,
            description: format!(
                "{} {} {} {}",
                from,
                locale.paid,
                to,
                (locale.money)(settlement.amount.value)
            ),
            group_name: names.group(&settlement.group_id),
            created_at: settlement.created_at,
        });
    }

    // sort_by is stable: equal timestamps keep expenses-then-settlements order
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(limit);
    debug!("Built activity feed with {} items for {}", items.len(), current_user_id);
    items
}

struct Names<'a> {
    groups: &'a [Group],
    current_user_id: &'a str,
    locale: &'a FeedLocale,
}

impl Names<'_> {
    fn find_group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    fn is_viewer(&self, group_id: &str, member_id: &str) -> bool {
        if member_id == self.current_user_id {
            return true;
        }
        self.find_group(group_id)
            .and_then(|g| g.resolve(member_id))
            .is_some_and(|m| m.belongs_to(self.current_user_id))
    }

    fn name_of(&self, group_id: &str, member_id: &str) -> Option<String> {
        self.find_group(group_id)
            .and_then(|g| g.resolve(member_id))
            .map(|m| m.name.clone())
            .filter(|n| !n.trim().is_empty())
    }

    fn subject(&self, group_id: &str, member_id: &str) -> String {
        if self.is_viewer(group_id, member_id) {
            return self.locale.you_subject.to_string();
        }
        self.name_of(group_id, member_id)
            .unwrap_or_else(|| self.locale.someone_subject.to_string())
    }

    fn object(&self, group_id: &str, member_id: &str) -> String {
        if self.is_viewer(group_id, member_id) {
            return self.locale.you_object.to_string();
        }
        self.name_of(group_id, member_id)
            .unwrap_or_else(|| self.locale.someone_object.to_string())
    }

    fn group(&self, group_id: &str) -> String {
        self.find_group(group_id)
            .map(|g| g.name.clone())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.locale.unknown_group.to_string())
    }
}
