//! Formatting helpers shared across crates.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Format a timestamp relative to `now`.
///
/// Buckets elapsed whole seconds into `just now` (under a minute),
/// `{n}m ago`, `{n}h ago`, `{n}d ago` (floor division, never rounded),
/// and an absolute date once the event is a week old.
#[must_use]
pub fn format_time_ago(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_in_seconds = (now - date).num_seconds();

    if diff_in_seconds < 60 {
        return "just now".to_string();
    }
    if diff_in_seconds < 3600 {
        return format!("{}m ago", diff_in_seconds / 60);
    }
    if diff_in_seconds < 86_400 {
        return format!("{}h ago", diff_in_seconds / 3600);
    }
    if diff_in_seconds < 604_800 {
        return format!("{}d ago", diff_in_seconds / 86_400);
    }

    date.format("%Y-%m-%d").to_string()
}

/// Derive a username from a display name or email address.
///
/// The base is the lowercased display name with whitespace stripped,
/// falling back to the email local part, then to `user`. A random
/// numeric suffix in `[0, 9999)` is appended. Uniqueness is advisory;
/// the profile layer owns collision handling.
#[must_use]
pub fn generate_username(display_name: Option<&str>, email: Option<&str>) -> String {
    let base = display_name
        .map(|name| {
            name.to_lowercase()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
        })
        .filter(|name| !name.is_empty())
        .or_else(|| {
            email
                .and_then(|e| e.split('@').next())
                .map(str::to_lowercase)
                .filter(|local| !local.is_empty())
        })
        .unwrap_or_else(|| "user".to_string());

    let random = rand::thread_rng().gen_range(0..9999);
    format!("{base}{random}")
}
