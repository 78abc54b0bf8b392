/// Selection label meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All Categories";

/// Canonical form of a category label.
///
/// Surrounding whitespace is trimmed, inner whitespace runs collapse to a
/// single space and every word is title-cased. Stores apply this once when
/// a record is loaded; filters apply it to the caller's selection, so
/// matching is plain string equality.
pub fn canonicalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            for ch in chars {
                out.extend(ch.to_lowercase());
            }
        }
    }
    out
}

/// True when a caller's selection means "every category".
pub fn is_all_categories(selection: &str) -> bool {
    canonicalize(selection) == ALL_CATEGORIES
}
