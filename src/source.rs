use std::path::Path;

use anyhow::Context;

use crate::models::UserRecord;

/// Reads a JSON array of participant snapshots.
pub fn parse_users(json: &str) -> anyhow::Result<Vec<UserRecord>> {
    serde_json::from_str(json).context("failed to parse participant snapshot")
}

pub fn load_users(path: &Path) -> anyhow::Result<Vec<UserRecord>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let users = parse_users(&json)?;
    tracing::info!(users = users.len(), path = %path.display(), "loaded participants");
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawDay, RawValue};
    use crate::normalize::normalize;

    #[test]
    fn parses_store_snapshot_with_optional_fields() {
        let users = parse_users(
            r#"[
                {
                    "identity_id": "u1",
                    "display_name": "Avery Lee",
                    "avatar": "https://img/avery.png",
                    "logs": [{"day": "2024-01-05", "value": "10"}, {"day": "someday"}],
                    "contact": {"email": "avery@example.com"}
                },
                {"identity_id": "u2", "display_name": "Jules"}
            ]"#,
        )
        .unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].logs.len(), 2);
        assert_eq!(users[0].logs[1].day, Some(RawDay::Text("someday".to_string())));
        assert_eq!(users[0].logs[0].value, Some(RawValue::Text("10".to_string())));
        assert_eq!(users[0].contact.email.as_deref(), Some("avery@example.com"));
        assert!(users[1].logs.is_empty());
        assert!(users[1].avatar.is_none());
    }

    #[test]
    fn odd_log_shapes_only_drop_that_entry() {
        let users = parse_users(
            r#"[
                {
                    "identity_id": "a",
                    "display_name": "Avery",
                    "logs": [
                        {"day": "2024-01-05", "value": "10"},
                        {"day": "2024-01-06", "value": true},
                        {"day": 20240107, "value": "3"},
                        {"day": "2024-01-08", "value": {"kg": 2}}
                    ]
                },
                {"identity_id": "b", "display_name": "Blake", "logs": [{"day": "2024-01-05", "value": 4}]}
            ]"#,
        )
        .unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].logs.len(), 4);
        let kept = normalize(&users[0].logs);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].value, 10.0);
        assert_eq!(normalize(&users[1].logs).len(), 1);
    }

    #[test]
    fn rejects_non_array_input() {
        assert!(parse_users(r#"{"identity_id": "u1"}"#).is_err());
    }
}
