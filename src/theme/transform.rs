use tracing::debug;

use super::{
    Base, FlattenedRule, SourceTheme, TargetTheme, ThemeVariant, TokenColorRule, TransformOptions,
};

/// Converts a VS Code color theme into Monaco theme data.
///
/// Never fails and never touches `source`. Each `tokenColors` entry expands
/// into one rule per scope, in entry order and then scope order.
pub fn transform(source: &SourceTheme, options: &TransformOptions) -> TargetTheme {
    let rules: Vec<FlattenedRule> = source.token_colors.iter().flat_map(flatten_rule).collect();

    debug!(
        name = options.name.as_deref().or(source.name.as_deref()).unwrap_or("<unnamed>"),
        variant = source.variant.map(ThemeVariant::tag).unwrap_or("<none>"),
        entries = source.token_colors.len(),
        rules = rules.len(),
        "converted theme"
    );

    TargetTheme {
        base: Base::from_variant(source.variant),
        inherit: true,
        rules,
        colors: source.colors.clone(),
    }
}

fn flatten_rule(entry: &TokenColorRule) -> impl Iterator<Item = FlattenedRule> + '_ {
    let settings = &entry.settings;
    entry.scopes().into_iter().map(move |scope| FlattenedRule {
        token: scope.to_string(),
        foreground: settings.foreground.as_deref().map(|c| strip_hash(c).to_string()),
        background: settings.background.as_deref().map(|c| strip_hash(c).to_string()),
        font_style: settings.font_style.clone(),
    })
}

/// Removes a single leading `#`, if any.
pub fn strip_hash(color: &str) -> &str {
    color.strip_prefix('#').unwrap_or(color)
}
