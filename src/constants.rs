use rust_decimal::Decimal;

// Action names recorded through the logging service
pub const OVERVIEW_QUERIED: &str = "OVERVIEW_QUERIED";
pub const GROUP_SUMMARY_QUERIED: &str = "GROUP_SUMMARY_QUERIED";
pub const ACTIVITY_QUERIED: &str = "ACTIVITY_QUERIED";
pub const INTEGRITY_WARNING: &str = "INTEGRITY_WARNING";

/// Legacy split key holding the viewer's own share.
pub const SELF_SPLIT_KEY: &str = "self";

/// Prefix of placeholder ids given to invited members without an account.
pub const INVITE_PREFIX: &str = "invite:";

pub const DEFAULT_MEMBER_NAME: &str = "Usuário";

pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Tolerance for comparing split sums against the expense amount (0.01).
pub const SPLIT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

pub const DEFAULT_FEED_LIMIT: usize = 30;
pub const MAX_FEED_LIMIT: usize = 100;

/// Entries kept by the in-memory app log before the oldest are dropped.
pub const DEFAULT_LOG_CAPACITY: usize = 10_000;
