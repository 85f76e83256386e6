//! Username derivation from email addresses.

/// Derive the base username from an email address: the local-part,
/// or "user" if the local-part is empty.
///
/// The caller resolves collisions by appending an incrementing numeric
/// suffix (`jane`, `jane1`, `jane2`, ...).
pub fn username_base(email: &str) -> String {
    let local = email.split('@').next().unwrap_or("");
    if local.is_empty() {
        "user".to_string()
    } else {
        local.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_part() {
        assert_eq!(username_base("jane@example.com"), "jane");
        assert_eq!(username_base("jane.doe+tag@example.com"), "jane.doe+tag");
    }

    #[test]
    fn test_no_at_sign() {
        assert_eq!(username_base("jane"), "jane");
    }

    #[test]
    fn test_empty_local_part() {
        assert_eq!(username_base("@example.com"), "user");
        assert_eq!(username_base(""), "user");
    }
}
