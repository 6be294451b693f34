use crate::model::AppEntry;

/// Case-folded, whitespace-separated query tokens.
pub fn tokens(query: &str) -> Vec<String> {
    query.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// True when the case-folded name contains every token. No tokens matches all.
pub fn matches(name: &str, tokens: &[String]) -> bool {
    let haystack = name.to_lowercase();
    tokens.iter().all(|t| haystack.contains(t.as_str()))
}

/// Indices of the entries matching `query`, in their original order.
pub fn filter(entries: &[AppEntry], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..entries.len()).collect();
    }

    let tokens = tokens(query);
    entries
        .iter()
        .enumerate()
        .filter(|(_, e)| matches(&e.name, &tokens))
        .map(|(i, _)| i)
        .collect()
}
