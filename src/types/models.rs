//! Model selector table

/// Tier labels and the concrete model ids they map to
pub const MODEL_TABLE: &[(&str, &str)] = &[
    ("opus", "claude-opus-4-1-20250805"),
    ("sonnet", "claude-sonnet-4-5-20250929"),
    ("haiku", "claude-3-5-haiku-20241022"),
];

/// Resolve a model selector to the id passed to `--model`
///
/// Labels match case-insensitively. Anything else passes through verbatim so
/// newer model ids work without a table update.
#[must_use]
pub fn resolve_model(selector: &str) -> String {
    let trimmed = selector.trim();
    MODEL_TABLE
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(trimmed))
        .map_or_else(|| trimmed.to_string(), |(_, id)| (*id).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_resolve() {
        assert_eq!(resolve_model("opus"), "claude-opus-4-1-20250805");
        assert_eq!(resolve_model("Sonnet"), "claude-sonnet-4-5-20250929");
        assert_eq!(resolve_model(" haiku "), "claude-3-5-haiku-20241022");
    }

    #[test]
    fn unknown_selector_passes_through() {
        assert_eq!(resolve_model("claude-next-preview"), "claude-next-preview");
    }
}
