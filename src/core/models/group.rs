use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::INVITE_PREFIX;

pub type GroupId = String;
pub type MemberId = String;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GroupCategory {
    Apartment,
    House,
    Trip,
    #[default]
    Other,
}

impl GroupCategory {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("apartment") => GroupCategory::Apartment,
            Some("house") => GroupCategory::House,
            Some("trip") => GroupCategory::Trip,
            _ => GroupCategory::Other,
        }
    }
}

impl std::fmt::Display for GroupCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GroupCategory::Apartment => "apartment",
            GroupCategory::House => "house",
            GroupCategory::Trip => "trip",
            GroupCategory::Other => "other",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Member {
    /// Key used by expenses and payments to reference this member
    pub id: MemberId,
    /// Authenticated account behind the member, absent for pending invites
    pub account_id: Option<String>,
    pub name: String,
    pub email: Option<String>,
}

impl Member {
    pub fn account(user_id: impl Into<String>, name: impl Into<String>, email: Option<String>) -> Self {
        let user_id = user_id.into();
        Member {
            id: user_id.clone(),
            account_id: Some(user_id),
            name: name.into(),
            email,
        }
    }

    /// An invited member with no account yet. Without a row id the member is
    /// keyed by a placeholder derived from the email, or the name.
    pub fn invited(row_id: Option<String>, name: impl Into<String>, email: Option<String>) -> Self {
        let name = name.into();
        let id = row_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Member::placeholder_id(&name, email.as_deref()));
        Member {
            id,
            account_id: None,
            name,
            email,
        }
    }

    pub fn placeholder_id(name: &str, email: Option<&str>) -> MemberId {
        let basis = email.filter(|e| !e.trim().is_empty()).unwrap_or(name);
        format!("{}{}", INVITE_PREFIX, basis.trim().to_lowercase())
    }

    pub fn is_invited(&self) -> bool {
        self.account_id.is_none()
    }

    pub fn belongs_to(&self, user_id: &str) -> bool {
        self.account_id.as_deref() == Some(user_id) || self.id == user_id
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub category: GroupCategory,
    pub members: Vec<Member>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: GroupCategory) -> Self {
        Group {
            id: id.into(),
            name: name.into(),
            category,
            members: Vec::new(),
        }
    }

    /// Appends a member unless one with the same id is already listed.
    pub fn add_member(&mut self, member: Member) -> bool {
        if self.is_member(&member.id) {
            return false;
        }
        self.members.push(member);
        true
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.add_member(member);
        self
    }

    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == member_id)
    }

    pub fn is_member(&self, member_id: &str) -> bool {
        self.member(member_id).is_some()
    }

    /// Roster position of the member a record refers to. Records may use the
    /// member key or, after an invite was claimed, the account id.
    pub fn position_of(&self, reference: &str) -> Option<usize> {
        self.members
            .iter()
            .position(|m| m.id == reference)
            .or_else(|| {
                self.members
                    .iter()
                    .position(|m| m.account_id.as_deref() == Some(reference))
            })
    }

    pub fn resolve(&self, reference: &str) -> Option<&Member> {
        self.position_of(reference).map(|i| &self.members[i])
    }

    /// The roster entry for an authenticated user.
    pub fn member_for_user(&self, user_id: &str) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| m.account_id.as_deref() == Some(user_id))
            .or_else(|| self.member(user_id))
    }

    pub fn member_ids(&self) -> Vec<MemberId> {
        self.members.iter().map(|m| m.id.clone()).collect()
    }

    /// Links a pending invite to `user_id`, matching by email first and then
    /// by name. Returns false when the user is already on the roster or no
    /// invite matches.
    pub fn claim_placeholder(&mut self, user_id: &str, email: Option<&str>, name: Option<&str>) -> bool {
        if self.member_for_user(user_id).is_some() {
            return false;
        }
        let by_email = email.and_then(|email| {
            self.members.iter().position(|m| {
                m.is_invited()
                    && m.email
                        .as_deref()
                        .is_some_and(|e| e.trim().eq_ignore_ascii_case(email.trim()))
            })
        });
        let by_name = || {
            name.and_then(|name| {
                self.members
                    .iter()
                    .position(|m| m.is_invited() && m.name.trim().eq_ignore_ascii_case(name.trim()))
            })
        };
        match by_email.or_else(by_name) {
            Some(index) => {
                self.members[index].account_id = Some(user_id.to_string());
                true
            }
            None => false,
        }
    }
}
