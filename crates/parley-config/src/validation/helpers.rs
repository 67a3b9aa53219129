//! Checks that push a message onto the running error list.

use std::fmt::Display;
use std::ops::RangeInclusive;

/// `value` must lie in `range`. NaN never does.
pub(crate) fn check_range<T>(errors: &mut Vec<String>, name: &str, value: T, range: RangeInclusive<T>)
where
    T: PartialOrd + Display,
{
    if !range.contains(&value) {
        errors.push(format!(
            "{name} = {value} is out of range [{}, {}]",
            range.start(),
            range.end()
        ));
    }
}

pub(crate) fn check_non_empty(errors: &mut Vec<String>, name: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{name} must not be empty"));
    }
}

/// Non-empty and free of whitespace.
pub(crate) fn check_single_word(errors: &mut Vec<String>, name: &str, value: &str) {
    if value.is_empty() {
        errors.push(format!("{name} must not be empty"));
    } else if value.chars().any(char::is_whitespace) {
        errors.push(format!("{name} = {value:?} must not contain whitespace"));
    }
}
