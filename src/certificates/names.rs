/// Title-cases a participant name: trims, collapses whitespace runs and
/// uppercases the first character of every word.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Splits a participants file into normalized display names, dropping blank lines.
pub fn parse_participants(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(normalize_name)
        .filter(|name| !name.is_empty())
        .collect()
}
