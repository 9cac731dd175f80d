//! Collision-free names for duplicated profiles and users.
//!
//! All comparisons are case-insensitive.

use std::collections::HashSet;

use crate::defaults::{user_template, DEFAULT_COPY_SUFFIX, DEFAULT_PROFILE_NAME};

const COUNTER_PLACEHOLDER: &str = "{}";

/// Unique profile name using the `" (copy)"` suffix format.
///
/// `Foo` → `Foo (copy)` → `Foo (copy 2)` → `Foo (copy 3)` …
pub fn make_unique_name<'a, I>(base: &str, taken: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    make_unique_name_with(base, taken, DEFAULT_COPY_SUFFIX)
}

/// Unique profile name with a caller-chosen suffix format.
///
/// A `{}` placeholder in `suffix` receives the counter (empty on the first
/// attempt). Otherwise the counter goes before a trailing `)`, or after the
/// suffix text. Blank bases fall back to the default profile name.
pub fn make_unique_name_with<'a, I>(base: &str, taken: I, suffix: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let base = non_blank_or(base, DEFAULT_PROFILE_NAME);
    let taken = lowercase_set(taken);
    if !taken.contains(&base.to_lowercase()) {
        return base.to_string();
    }

    (1..)
        .map(|index| format_copy_name(base, suffix, index))
        .find(|candidate| !taken.contains(&candidate.to_lowercase()))
        .unwrap_or_default()
}

/// Unique username: `bob` → `bob-copy` → `bob-copy-2` → `bob-copy-3` …
pub fn make_unique_username<'a, I>(base: &str, taken: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let base = non_blank_or(base, user_template::USERNAME);
    let taken = lowercase_set(taken);
    if !taken.contains(&base.to_lowercase()) {
        return base.to_string();
    }

    let first = format!("{base}-copy");
    if !taken.contains(&first.to_lowercase()) {
        return first;
    }

    (2..)
        .map(|counter| format!("{base}-copy-{counter}"))
        .find(|candidate| !taken.contains(&candidate.to_lowercase()))
        .unwrap_or_default()
}

fn format_copy_name(base: &str, suffix: &str, index: u32) -> String {
    if index <= 1 {
        return format!("{base}{}", suffix.replace(COUNTER_PLACEHOLDER, ""));
    }
    if suffix.contains(COUNTER_PLACEHOLDER) {
        return format!("{base}{}", suffix.replace(COUNTER_PLACEHOLDER, &index.to_string()));
    }
    match suffix.strip_suffix(')') {
        Some(head) => format!("{base}{head} {index})"),
        None => format!("{base}{suffix} {index}"),
    }
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    match value.trim() {
        "" => fallback,
        trimmed => trimmed,
    }
}

fn lowercase_set<'a, I>(names: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().map(str::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::{make_unique_name, make_unique_name_with, make_unique_username};

    #[test]
    fn free_name_is_returned_trimmed() {
        assert_eq!(make_unique_name("  Office ", ["Home"]), "Office");
    }

    #[test]
    fn copy_suffix_then_counter() {
        assert_eq!(make_unique_name("Foo", ["Foo"]), "Foo (copy)");
        assert_eq!(make_unique_name("Foo", ["Foo", "Foo (copy)"]), "Foo (copy 2)");
        assert_eq!(
            make_unique_name("Foo", ["foo", "FOO (COPY)", "foo (copy 2)"]),
            "Foo (copy 3)"
        );
    }

    #[test]
    fn blank_base_uses_default_name() {
        assert_eq!(make_unique_name("   ", std::iter::empty()), "Default");
        assert_eq!(make_unique_name("", ["Default"]), "Default (copy)");
    }

    #[test]
    fn placeholder_and_plain_suffix_formats() {
        assert_eq!(make_unique_name_with("A", ["A"], "-{}"), "A-");
        assert_eq!(make_unique_name_with("A", ["A", "A-"], "-{}"), "A-2");
        assert_eq!(make_unique_name_with("A", ["A", "A copy"], " copy"), "A copy 2");
    }

    #[test]
    fn usernames_get_hyphenated_copies() {
        assert_eq!(make_unique_username("bob", ["bob"]), "bob-copy");
        assert_eq!(make_unique_username("bob", ["bob", "bob-copy"]), "bob-copy-2");
        assert_eq!(
            make_unique_username("Bob", ["bob", "BOB-COPY", "bob-copy-2"]),
            "Bob-copy-3"
        );
        assert_eq!(make_unique_username("carol", ["bob"]), "carol");
    }
}
