//! Identifier derivation.
//!
//! [`to_slug`] derives the URL- and filesystem-safe identifier of a schema
//! element from its display name: kebab-case word splitting followed by
//! slugification. The function is pure, so identical names anywhere in a
//! schema always map to identical slugs.

/// Derive a slug from a display name.
#[must_use]
pub fn to_slug(name: &str) -> String {
    slugify(&kebab_case(name))
}

/// Turn a slug or identifier into a spaced, capitalized label
/// (`"queries"` -> `"Queries"`, `"search-result"` -> `"Search Result"`).
#[must_use]
pub fn start_case(name: &str) -> String {
    split_words(name)
        .into_iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase words joined with hyphens, splitting on case and digit
/// boundaries as well as separators (`StripeCustomer` -> `stripe-customer`,
/// `user2Name` -> `user-2-name`).
fn kebab_case(name: &str) -> String {
    split_words(name)
        .into_iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Keep only lowercase alphanumerics and hyphens; collapse runs and trim.
fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_hyphen = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            out.push('-');
            last_hyphen = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            flush(&mut words, &mut current);
            continue;
        }
        if let Some(prev) = current.chars().last() {
            let acronym_end = prev.is_uppercase()
                && c.is_uppercase()
                && chars.get(i + 1).is_some_and(|next| next.is_lowercase());
            let case_boundary = prev.is_lowercase() && c.is_uppercase();
            let digit_boundary = prev.is_ascii_digit() != c.is_ascii_digit();
            if case_boundary || digit_boundary || acronym_end {
                flush(&mut words, &mut current);
            }
        }
        current.push(c);
    }
    flush(&mut words, &mut current);
    words
}

fn flush(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}
