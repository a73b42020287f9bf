//! Deterministic fake users seeded at startup.

use crate::models::NewUser;

/// Number of rows seeded, and the bound used when picking a random user.
pub const FAKE_USER_COUNT: u64 = 10_000;

/// Name of the first seeded row; its presence means the table is seeded.
pub const SEED_MARKER_NAME: &str = "fake-0";

#[must_use]
pub fn fake_user_name(index: u64) -> String {
    format!("fake-{index}")
}

#[must_use]
pub fn fake_user_emails(index: u64) -> Vec<String> {
    vec![
        format!("fake-master-{index}@email.com"),
        format!("fake-slave-{index}@email.com"),
    ]
}

#[must_use]
pub fn fake_user(index: u64) -> NewUser {
    NewUser {
        name: fake_user_name(index),
        emails: fake_user_emails(index),
    }
}

/// Builds `fake-0 .. fake-(count-1)` in order.
#[must_use]
pub fn fake_users(count: u64) -> Vec<NewUser> {
    (0..count).map(fake_user).collect()
}

/// Recovers the index from a seeded name, if it has the seeded shape.
#[must_use]
pub fn parse_fake_user_index(name: &str) -> Option<u64> {
    let digits = name.strip_prefix("fake-")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
