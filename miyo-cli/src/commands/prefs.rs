//! User preference commands

use anyhow::{Context, Result};
use miyo_core::{StorageManager, UserPreferences};
use serde_json::Value;

/// Parse a `key=value` assignment
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("'{}' is not a KEY=VALUE assignment", s)),
    }
}

/// Parse a raw value for a preference
///
/// Keys that currently hold a string keep the raw text. Other values that
/// parse as JSON (numbers, booleans, ...) are stored as such; anything else
/// is stored as a string.
fn parse_value(raw: &str, current: Option<&Value>) -> Value {
    if let Some(Value::String(_)) = current {
        return Value::String(raw.to_string());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Show, update or reset user preferences
pub async fn prefs(storage: &StorageManager, set: &[(String, String)], reset: bool) -> Result<()> {
    let prefs = if reset {
        let defaults = UserPreferences::default();
        storage.save_preferences(&defaults).await?;
        defaults
    } else if !set.is_empty() {
        let current = storage
            .read_preferences_or_default()
            .await
            .context("Failed to read preferences")?;

        let mut value = serde_json::to_value(&current)?;
        if let Value::Object(map) = &mut value {
            for (key, raw) in set {
                let parsed = parse_value(raw, map.get(key));
                map.insert(key.clone(), parsed);
            }
        }
        let updated: UserPreferences = serde_json::from_value(value)
            .context("Preference value has the wrong type")?;
        let updated = updated.normalized();

        storage.save_preferences(&updated).await?;
        updated
    } else {
        storage
            .read_preferences_or_default()
            .await
            .context("Failed to read preferences")?
    };

    println!("{}", serde_json::to_string_pretty(&prefs)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("themeId=dark"),
            Ok(("themeId".to_string(), "dark".to_string()))
        );
        assert_eq!(
            parse_assignment("fontFamily=a=b"),
            Ok(("fontFamily".to_string(), "a=b".to_string()))
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("18", None), Value::from(18));
        assert_eq!(parse_value("true", None), Value::Bool(true));
        assert_eq!(parse_value("dark", None), Value::String("dark".to_string()));
    }

    #[test]
    fn test_parse_value_keeps_strings_for_string_keys() {
        let current = Value::String("en".to_string());
        assert_eq!(
            parse_value("123", Some(&current)),
            Value::String("123".to_string())
        );
        assert_eq!(
            parse_value("null", Some(&current)),
            Value::String("null".to_string())
        );
        assert_eq!(parse_value("20", Some(&Value::from(16))), Value::from(20));
    }
}
