//! Member-name humanization for display labels.
//!
//! Rule providers fall back to these labels when a member has no explicit
//! display name.

use std::sync::LazyLock;

use regex::Regex;

static WORD_BOUNDARIES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new("([a-z])([A-Z])").expect("static pattern"),
        Regex::new("([0-9])([a-zA-Z])").expect("static pattern"),
        Regex::new("([a-zA-Z])([0-9])").expect("static pattern"),
    ]
});

/// Break a camel-case member name into space separated words.
///
/// Convention: a space is inserted between a lowercase letter and a following
/// uppercase letter, and between letters and digits in either order.
/// Underscores become spaces. Acronym runs (`HTMLBody`) are left alone.
///
/// # Examples
///
/// ```
/// use fieldrules_core::naming::humanize_member_name;
///
/// assert_eq!(humanize_member_name("FirstName"), "First Name");
/// assert_eq!(humanize_member_name("Address2Line"), "Address 2 Line");
/// assert_eq!(humanize_member_name("postal_code"), "postal code");
/// ```
pub fn humanize_member_name(name: &str) -> String {
    let spaced = WORD_BOUNDARIES
        .iter()
        .fold(name.to_string(), |current, pattern| {
            pattern.replace_all(&current, "$1 $2").into_owned()
        });

    spaced.replace('_', " ")
}
