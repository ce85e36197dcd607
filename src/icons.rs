// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const FALLBACK_KEY: &str = "other";

// Keys are lowercase; lookups fold case.
static ICONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("food", "🍔"),
        ("groceries", "🛒"),
        ("dining", "🍽"),
        ("rent", "🏠"),
        ("housing", "🏠"),
        ("utilities", "💡"),
        ("transport", "🚗"),
        ("transportation", "🚗"),
        ("fuel", "⛽"),
        ("health", "💊"),
        ("insurance", "🛡"),
        ("entertainment", "🎬"),
        ("shopping", "🛍"),
        ("travel", "✈"),
        ("education", "🎓"),
        ("subscriptions", "🔁"),
        ("gifts", "🎁"),
        ("salary", "💼"),
        ("freelance", "🧾"),
        ("investments", "📈"),
        ("interest", "🏦"),
        ("uncategorized", "❔"),
        (FALLBACK_KEY, "📦"),
    ])
});

/// Icon for a category name, falling back to the "Other" icon.
pub fn icon_for(category: &str) -> &'static str {
    let key = category.trim().to_lowercase();
    ICONS
        .get(key.as_str())
        .or_else(|| ICONS.get(FALLBACK_KEY))
        .copied()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_folds_case_and_falls_back() {
        assert_eq!(icon_for("Groceries"), icon_for("groceries"));
        assert_eq!(icon_for("  RENT "), "🏠");
        assert_eq!(icon_for("Llama grooming"), icon_for("Other"));
        assert_eq!(icon_for("Uncategorized"), "❔");
    }
}
