//! Input validation helpers shared by the auth handlers.
//!
//! The `validator` derive covers declarative shape checks on DTOs; these
//! functions hold the rules that need real logic, and give the test suite
//! a pure surface to exercise.

/// Minimal email shape check: one `@`, non-empty local part, domain with a
/// dot and a TLD, no whitespace.
pub fn validate_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.splitn(2, '@');
    let local = match parts.next() {
        Some(l) if !l.is_empty() => l,
        _ => return false,
    };
    let domain = match parts.next() {
        Some(d) if !d.is_empty() => d,
        _ => return false,
    };

    if local.contains('@') || domain.contains('@') {
        return false;
    }

    // Domain needs at least one label and a TLD.
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

/// Usernames: 3-50 chars, ASCII alphanumeric plus `_` and `-`, must start
/// with a letter or digit.
pub fn validate_username(username: &str) -> bool {
    let len = username.chars().count();
    if !(3..=50).contains(&len) {
        return false;
    }
    let mut chars = username.chars();
    let first = chars.next().unwrap_or(' ');
    if !first.is_ascii_alphanumeric() {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Passwords: at least 8 characters with at least one letter and one digit.
pub fn validate_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Sort columns allowed in the catalog query. Anything else falls back to
/// `created_at` instead of being interpolated into SQL.
pub fn sort_column(requested: Option<&str>) -> &'static str {
    match requested {
        Some("views") => "views",
        Some("duration") => "duration_seconds",
        Some("title") => "title",
        Some("created_at") | None => "created_at",
        Some(_) => "created_at",
    }
}

/// Sort direction; defaults to descending.
pub fn sort_direction(requested: Option<&str>) -> &'static str {
    match requested {
        Some(s) if s.eq_ignore_ascii_case("asc") => "ASC",
        _ => "DESC",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_column_whitelist() {
        assert_eq!(sort_column(Some("views")), "views");
        assert_eq!(sort_column(Some("duration")), "duration_seconds");
        assert_eq!(sort_column(Some("title")), "title");
        assert_eq!(sort_column(None), "created_at");
        // injection attempts fall back to the default column
        assert_eq!(sort_column(Some("views; DROP TABLE videos")), "created_at");
    }

    #[test]
    fn sort_direction_defaults_desc() {
        assert_eq!(sort_direction(Some("asc")), "ASC");
        assert_eq!(sort_direction(Some("ASC")), "ASC");
        assert_eq!(sort_direction(Some("desc")), "DESC");
        assert_eq!(sort_direction(Some("sideways")), "DESC");
        assert_eq!(sort_direction(None), "DESC");
    }
}
