use std::collections::BTreeMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use super::{ScopeSpec, SourceTheme, ThemeVariant, TokenColorRule};

// ─── Lenient construction from parsed JSON ─────────────────────────────
//
// Theme files in the wild are loosely typed. Nothing here returns an error
// for a well-formed JSON document: a value of the wrong shape is replaced
// by the field's default.

/// Builds a [`SourceTheme`] from any JSON value.
/// Non-object values produce an empty theme.
pub fn source_from_value(value: Value) -> SourceTheme {
    from_object::<RawSourceTheme>(value).into()
}

/// Field-level view of a theme object. Only reached with a `Value::Object`,
/// which has already collapsed repeated keys.
#[derive(Default, Deserialize)]
struct RawSourceTheme {
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_variant")]
    variant: Option<ThemeVariant>,
    #[serde(default, deserialize_with = "lenient_colors")]
    colors: BTreeMap<String, String>,
    #[serde(rename = "tokenColors", default, deserialize_with = "lenient_rules")]
    token_colors: Vec<TokenColorRule>,
}

impl From<RawSourceTheme> for SourceTheme {
    fn from(raw: RawSourceTheme) -> Self {
        Self {
            name: raw.name,
            variant: raw.variant,
            colors: raw.colors,
            token_colors: raw.token_colors,
        }
    }
}

impl<'de> Deserialize<'de> for SourceTheme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(source_from_value)
    }
}

/// Deserializes `value` as an object-shaped `T`, falling back to `T::default()`.
fn from_object<T: DeserializeOwned + Default>(value: Value) -> T {
    if !value.is_object() {
        debug!(kind = kind_of(&value), "expected object, using defaults");
        return T::default();
    }
    T::deserialize(value).unwrap_or_else(|err| {
        debug!(%err, "malformed object, using defaults");
        T::default()
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_else(|err| {
        debug!(%err, "ignoring malformed theme field");
        T::default()
    }))
}

pub(crate) fn lenient_object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Value::deserialize(deserializer).map(from_object)
}

pub(crate) fn lenient_variant<'de, D>(deserializer: D) -> Result<Option<ThemeVariant>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let variant = value.as_str().and_then(ThemeVariant::from_tag);
    if variant.is_none() && !value.is_null() {
        debug!(%value, "unrecognized theme type");
    }
    Ok(variant)
}

pub(crate) fn lenient_scope<'de, D>(deserializer: D) -> Result<Option<ScopeSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    let scope = match Value::deserialize(deserializer)? {
        Value::String(joined) => Some(ScopeSpec::Joined(joined)),
        Value::Array(items) => Some(ScopeSpec::List(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        )),
        _ => None,
    };
    Ok(scope)
}

pub(crate) fn lenient_colors<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(color) => Some((key, color)),
            _ => {
                debug!(%key, "dropping non-string color value");
                None
            }
        })
        .collect())
}

pub(crate) fn lenient_rules<'de, D>(deserializer: D) -> Result<Vec<TokenColorRule>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items.into_iter().map(from_object).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::TokenSettings;
    use serde_json::json;

    #[test]
    fn test_non_object_gives_empty_theme() {
        for value in [json!(null), json!(42), json!("dark"), json!([1, 2])] {
            assert_eq!(source_from_value(value), SourceTheme::default());
        }
    }

    #[test]
    fn test_full_theme() {
        let source = source_from_value(json!({
            "name": "Night Owl",
            "type": "dark",
            "colors": { "editor.background": "#011627" },
            "tokenColors": [
                {
                    "scope": ["comment", "punctuation.definition.comment"],
                    "settings": { "foreground": "#637777", "fontStyle": "italic" }
                },
                {
                    "scope": "string, constant.other.symbol",
                    "settings": { "foreground": "#ecc48d" }
                }
            ]
        }));

        assert_eq!(source.name.as_deref(), Some("Night Owl"));
        assert_eq!(source.variant, Some(ThemeVariant::Dark));
        assert_eq!(source.colors["editor.background"], "#011627");
        assert_eq!(source.token_colors.len(), 2);
        assert_eq!(
            source.token_colors[0].settings,
            TokenSettings {
                foreground: Some("#637777".to_string()),
                background: None,
                font_style: Some("italic".to_string()),
            }
        );
        assert_eq!(
            source.token_colors[1].scope,
            Some(ScopeSpec::Joined("string, constant.other.symbol".to_string()))
        );
    }

    #[test]
    fn test_wrong_field_types_are_absent() {
        let source = source_from_value(json!({
            "name": 7,
            "type": "sepia",
            "colors": ["#fff"],
            "tokenColors": { "scope": "comment" }
        }));
        assert_eq!(source, SourceTheme::default());
    }

    #[test]
    fn test_malformed_entries_keep_position() {
        let source = source_from_value(json!({
            "tokenColors": [
                "not a rule",
                { "scope": 12, "settings": { "foreground": "#fff" } },
                { "scope": ["a", 3, "b"], "settings": "bold" },
                { "scope": "c", "settings": { "foreground": false, "background": "#000" } }
            ]
        }));

        let rules = &source.token_colors;
        assert_eq!(rules.len(), 4);
        assert_eq!(rules[0], TokenColorRule::default());
        assert_eq!(rules[1].scope, None);
        assert_eq!(rules[1].settings.foreground.as_deref(), Some("#fff"));
        assert_eq!(rules[2].scopes(), vec!["a", "b"]);
        assert_eq!(rules[2].settings, TokenSettings::default());
        assert_eq!(rules[3].settings.foreground, None);
        assert_eq!(rules[3].settings.background.as_deref(), Some("#000"));
    }

    #[test]
    fn test_non_string_colors_dropped() {
        let source = source_from_value(json!({
            "colors": { "editor.foreground": "#d6deeb", "editor.lineHighlight": null, "x": 1 }
        }));
        assert_eq!(source.colors.len(), 1);
        assert_eq!(source.colors["editor.foreground"], "#d6deeb");
    }

    #[test]
    fn test_from_str_matches_from_value() {
        let text = r#"{"type":"hc","tokenColors":[{"scope":"x","settings":{}}],"$schema":"vscode://schemas/color-theme"}"#;
        let parsed: SourceTheme = serde_json::from_str(text).unwrap();
        let value: Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed, source_from_value(value));
        assert_eq!(parsed.variant, Some(ThemeVariant::HighContrast));
    }

    #[test]
    fn test_repeated_keys_keep_last_value() {
        let text = r#"{"type":"dark","type":"light","tokenColors":[{"scope":"a","settings":{}}],"tokenColors":[{"scope":"b, c","settings":{}}]}"#;
        let parsed: SourceTheme = serde_json::from_str(text).unwrap();
        let value: Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed, source_from_value(value));
        assert_eq!(parsed.variant, Some(ThemeVariant::Light));
        assert_eq!(parsed.token_colors.len(), 1);
        assert_eq!(parsed.token_colors[0].scopes(), vec!["b", "c"]);
    }

    #[test]
    fn test_from_str_non_object() {
        let parsed: SourceTheme = serde_json::from_str("[\"dark\"]").unwrap();
        assert_eq!(parsed, SourceTheme::default());
    }

    #[test]
    fn test_null_fields() {
        let source = source_from_value(json!({
            "type": null,
            "colors": null,
            "tokenColors": null
        }));
        assert_eq!(source, SourceTheme::default());
    }
}
