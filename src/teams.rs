/// Resolve an upstream full team name (e.g. "Boston Red Sox") to one of the
/// league's short team codes, or `None` if it matches no roster team.
///
/// Matching is longest-code-first so a code that is itself a suffix of a
/// longer code ("Sox" vs "Red Sox") cannot shadow the correct match:
/// 1. suffix match against the trimmed, lower-cased full name;
/// 2. whole-word containment, the code appearing as a space-delimited token
///    sequence inside the full name.
pub fn resolve_team<'a>(full_name: &str, allowed: &'a [String]) -> Option<&'a str> {
    let normalized = full_name.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    let mut by_length: Vec<&'a String> = allowed.iter().collect();
    by_length.sort_by_key(|code| std::cmp::Reverse(code.len()));

    for code in &by_length {
        if normalized.ends_with(&code.to_lowercase()) {
            return Some(code.as_str());
        }
    }

    let padded = format!(" {} ", normalized);
    for code in &by_length {
        let needle = format!(" {} ", code.to_lowercase());
        if padded.contains(&needle) {
            return Some(code.as_str());
        }
    }

    None
}
