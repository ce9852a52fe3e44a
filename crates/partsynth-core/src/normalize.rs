/// Strip whitespace, hyphens and parentheses from an attribute label so
/// taxonomy labels and catalog keys compare equal.
pub fn normalize_attribute(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !ch.is_whitespace() && !matches!(ch, '-' | '(' | ')'))
        .collect()
}

/// Derive a component name from a catalog file stem (`Active_Filters` -> `Active Filters`).
pub fn component_name_from_stem(stem: &str) -> String {
    stem.replace('_', " ")
}

/// Comparison key for component names.
///
/// The class-info table may spell `A/B Switches` where the catalog file is
/// `A_B_Switches.json`, so slashes and underscores fold into single spaces.
pub fn component_key(name: &str) -> String {
    name.replace(['/', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
