pub mod loader;
pub mod transform;

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

pub use loader::source_from_value;
pub use transform::{strip_hash, transform};

// ─── Source side (VS Code color theme) ─────────────────────────────────

/// Theme family tag carried in the source `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeVariant {
    Light,
    Dark,
    HighContrast,
    HighContrastLight,
}

impl ThemeVariant {
    /// Parses one of the four recognized tags. Anything else is `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "hc" => Some(Self::HighContrast),
            "hc-light" => Some(Self::HighContrastLight),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::HighContrast => "hc",
            Self::HighContrastLight => "hc-light",
        }
    }
}

/// Scope selector of a token color entry.
///
/// VS Code accepts either a single string, possibly holding several
/// comma-separated scopes, or an array of scope strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeSpec {
    Joined(String),
    List(Vec<String>),
}

impl ScopeSpec {
    /// Individual scopes in declaration order.
    ///
    /// Array scopes are returned as-is. Joined scopes are split on commas,
    /// trimmed, and empty pieces are dropped.
    pub fn scopes(&self) -> Vec<&str> {
        match self {
            ScopeSpec::List(items) => items.iter().map(String::as_str).collect(),
            ScopeSpec::Joined(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenSettings {
    #[serde(default, deserialize_with = "loader::lenient")]
    pub foreground: Option<String>,
    #[serde(default, deserialize_with = "loader::lenient")]
    pub background: Option<String>,
    #[serde(rename = "fontStyle", default, deserialize_with = "loader::lenient")]
    pub font_style: Option<String>,
}

/// One `tokenColors` entry: a scope selector plus the style applied to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenColorRule {
    #[serde(default, deserialize_with = "loader::lenient_scope")]
    pub scope: Option<ScopeSpec>,
    #[serde(default, deserialize_with = "loader::lenient_object")]
    pub settings: TokenSettings,
}

impl TokenColorRule {
    /// An entry without a scope selects nothing.
    pub fn scopes(&self) -> Vec<&str> {
        self.scope.as_ref().map(ScopeSpec::scopes).unwrap_or_default()
    }
}

/// Parsed VS Code color theme. Every field is optional.
///
/// Deserializing never fails on well-formed JSON. The document is read into
/// a [`serde_json::Value`] first and handed to [`source_from_value`], so
/// non-object documents give an empty theme, repeated keys keep the last
/// value, and fields of the wrong shape are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTheme {
    pub name: Option<String>,
    pub variant: Option<ThemeVariant>,
    pub colors: BTreeMap<String, String>,
    pub token_colors: Vec<TokenColorRule>,
}

// ─── Target side (Monaco theme data) ───────────────────────────────────

/// Monaco built-in theme a definition inherits from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Base {
    #[serde(rename = "vs")]
    Vs,
    #[default]
    #[serde(rename = "vs-dark")]
    VsDark,
    #[serde(rename = "hc-black")]
    HcBlack,
    #[serde(rename = "hc-light")]
    HcLight,
}

impl Base {
    /// Unknown or missing variants fall back to `vs-dark`.
    pub fn from_variant(variant: Option<ThemeVariant>) -> Self {
        match variant {
            Some(ThemeVariant::Light) => Base::Vs,
            Some(ThemeVariant::Dark) => Base::VsDark,
            Some(ThemeVariant::HighContrast) => Base::HcBlack,
            Some(ThemeVariant::HighContrastLight) => Base::HcLight,
            None => Base::default(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Base::Vs => "vs",
            Base::VsDark => "vs-dark",
            Base::HcBlack => "hc-black",
            Base::HcLight => "hc-light",
        }
    }
}

/// Single scope to style mapping as Monaco expects it.
/// Colors carry no leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenedRule {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(rename = "fontStyle", default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
}

/// Data argument of Monaco's `editor.defineTheme(name, data)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetTheme {
    pub base: Base,
    pub inherit: bool,
    pub rules: Vec<FlattenedRule>,
    pub colors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Display name, only used in diagnostics.
    pub name: Option<String>,
}

impl TransformOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()) }
    }
}
