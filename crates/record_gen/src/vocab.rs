//! Reference vocabularies shared by the entity schemas.
//!
//! Every categorical field is sampled uniformly from one of these pools.

/// A device profile attached to a user session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Device {
    pub kind: &'static str,
    pub os: &'static str,
}

/// Site pages a session can visit
pub const PAGES: &[&str] = &[
    "/home",
    "/about",
    "/contact",
    "/products",
    "/cart",
    "/checkout",
    "/payment",
    "/profile",
];

/// Device type/OS pairs
pub const DEVICES: &[Device] = &[
    Device {
        kind: "mobile",
        os: "Android",
    },
    Device {
        kind: "mobile",
        os: "IOS",
    },
    Device {
        kind: "PC",
        os: "Windows",
    },
    Device {
        kind: "PC",
        os: "Linux",
    },
    Device {
        kind: "PC",
        os: "MacOS",
    },
];

/// User actions recorded during a session
pub const ACTIONS: &[&str] = &[
    "click",
    "scroll",
    "add_to_cart",
    "login",
    "logout",
    "search",
    "purchase",
];

/// Price currencies
pub const CURRENCIES: &[&str] = &["USD", "EUR", "RUB"];

/// Event log categories
pub const EVENT_TYPES: &[&str] = &["error", "system_alert", "maintenance", "warning"];

/// Support ticket statuses
pub const TICKET_STATUSES: &[&str] = &["opened", "closed", "in_progress", "resolved", "rejected"];

/// Support ticket issue categories
pub const ISSUE_TYPES: &[&str] = &[
    "login_issue",
    "payment_issue",
    "technical_issue",
    "account_issue",
    "other",
];

/// Moderation queue statuses
pub const MODERATION_STATUSES: &[&str] = &["under_consideration", "approved", "rejected"];

/// Inclusive bounds of the user id pool
pub const USER_IDS: (i64, i64) = (0, 999);

/// Inclusive bounds of the product id pool
pub const PRODUCT_IDS: (i64, i64) = (0, 499);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(PAGES.len(), 8);
        assert_eq!(DEVICES.len(), 5);
        assert_eq!(ACTIONS.len(), 7);
        assert_eq!(CURRENCIES.len(), 3);
        assert_eq!(EVENT_TYPES.len(), 4);
        assert_eq!(TICKET_STATUSES.len(), 5);
        assert_eq!(ISSUE_TYPES.len(), 5);
        assert_eq!(MODERATION_STATUSES.len(), 3);
    }

    #[test]
    fn test_actions_and_pages_are_distinct_pools() {
        assert!(ACTIONS.iter().all(|a| !PAGES.contains(a)));
    }
}
