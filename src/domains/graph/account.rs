//! Ad account id handling.

use super::{GraphError, GraphResult};

/// Prefix Graph API paths expect in front of a numeric ad account id.
pub const ACCOUNT_ID_PREFIX: &str = "act_";

/// Normalize an ad account id for use in an endpoint path.
///
/// `123456` becomes `act_123456`; `act_123456` is returned unchanged.
pub fn normalize_account_id(raw: &str) -> GraphResult<String> {
    let id = raw.trim();
    let bare = id.strip_prefix(ACCOUNT_ID_PREFIX).unwrap_or(id);

    if bare.is_empty() {
        return Err(GraphError::invalid_query("account_id must not be empty"));
    }
    if bare.contains(['/', '?', '#', '&']) {
        return Err(GraphError::invalid_query(format!(
            "account_id contains invalid characters: {raw}"
        )));
    }

    Ok(format!("{ACCOUNT_ID_PREFIX}{bare}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_added_once() {
        assert_eq!(normalize_account_id("123456789").unwrap(), "act_123456789");
    }

    #[test]
    fn test_prefixed_id_unchanged() {
        assert_eq!(normalize_account_id("act_123456789").unwrap(), "act_123456789");
        let once = normalize_account_id("123").unwrap();
        assert_eq!(normalize_account_id(&once).unwrap(), once);
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(normalize_account_id("  act_42 ").unwrap(), "act_42");
    }

    #[test]
    fn test_empty_rejected() {
        assert!(normalize_account_id("").is_err());
        assert!(normalize_account_id("   ").is_err());
        assert!(normalize_account_id("act_").is_err());
    }

    #[test]
    fn test_path_characters_rejected() {
        assert!(normalize_account_id("123/campaigns").is_err());
        assert!(normalize_account_id("123?fields=x").is_err());
    }
}
