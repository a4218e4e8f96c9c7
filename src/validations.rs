//! Ready-made validators: plain functions from an input to a [`Validation`].
//!
//! A `Warning` keeps the value available (it parsed, but is not acceptable
//! as is); a `Failure` means there is no value to carry on with.
use std::collections::HashSet;
use std::hash::Hash;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::validation::Validation;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)+$").expect("email pattern compiles")
});

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("colour pattern compiles"));

pub fn nestring(s: String) -> Validation<String, String> {
    if s.is_empty() {
        Validation::Warning(vec!["Must be non-empty".to_string()], s)
    } else {
        Validation::Success(s)
    }
}

pub fn unique_array<A: Eq + Hash>(xs: Vec<A>) -> Validation<String, Vec<A>> {
    let distinct = xs.iter().collect::<HashSet<_>>().len();
    if distinct == xs.len() {
        Validation::Success(xs)
    } else {
        Validation::Warning(vec!["No duplicates allowed".to_string()], xs)
    }
}

/// Unwraps an optional input; nothing to carry on with when absent.
pub fn required<A>(x: Option<A>) -> Validation<String, A> {
    match x {
        Some(a) => Validation::Success(a),
        None => Validation::Failure(vec!["Required".to_string()]),
    }
}

/// Inclusive bounds.
pub fn in_range(min: f64, max: f64) -> impl Fn(f64) -> Validation<String, f64> + Clone {
    move |x| {
        if (min..=max).contains(&x) {
            Validation::Success(x)
        } else {
            Validation::Warning(vec![format!("Must be between {min} and {max}")], x)
        }
    }
}

pub fn matches(pattern: Regex, message: impl Into<String>) -> impl Fn(String) -> Validation<String, String> + Clone {
    let message = message.into();
    move |s| {
        if pattern.is_match(&s) {
            Validation::Success(s)
        } else {
            Validation::Warning(vec![message.clone()], s)
        }
    }
}

/// Empty is accepted; pair with [`nestring`] to require a value.
pub fn email_address(s: String) -> Validation<String, String> {
    if s.is_empty() || EMAIL.is_match(&s) {
        Validation::Success(s)
    } else {
        Validation::Warning(vec!["Invalid email address".to_string()], s)
    }
}

pub fn hex_color(s: String) -> Validation<String, String> {
    if HEX_COLOR.is_match(&s) {
        Validation::Success(s)
    } else {
        Validation::Warning(vec!["Invalid colour".to_string()], s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nestring_warns_on_empty() {
        assert_eq!(nestring("a".into()), Validation::Success("a".to_string()));
        assert_eq!(
            nestring(String::new()),
            Validation::Warning(vec!["Must be non-empty".to_string()], String::new())
        );
    }

    #[test]
    fn unique_array_keeps_the_value() {
        assert_eq!(unique_array(vec![1, 2, 3]), Validation::Success(vec![1, 2, 3]));
        assert_eq!(unique_array(Vec::<i32>::new()), Validation::Success(vec![]));
        assert_eq!(
            unique_array(vec!["a", "b", "a"]),
            Validation::Warning(vec!["No duplicates allowed".to_string()], vec!["a", "b", "a"])
        );
    }

    #[test]
    fn required_fails_without_value() {
        assert_eq!(required(Some(3)), Validation::Success(3));
        assert!(required::<i32>(None).is_failure());
    }

    #[test]
    fn in_range_is_inclusive() {
        let check = in_range(100.0, 1000.0);
        assert!(check(100.0).is_success());
        assert!(check(1000.0).is_success());
        assert_eq!(check(0.0).errors(), ["Must be between 100 and 1000".to_string()]);
    }

    #[test]
    fn matches_uses_given_message() {
        let digits = matches(Regex::new(r"^\d+$").unwrap(), "Digits only");
        assert!(digits("911".into()).is_success());
        assert_eq!(digits("nine".into()).errors(), ["Digits only".to_string()]);
    }

    #[test]
    fn email_and_colour_formats() {
        assert!(email_address("john@doe.com".into()).is_success());
        assert!(email_address(String::new()).is_success());
        assert!(email_address("john@".into()).is_warning());
        assert!(hex_color("#d64343".into()).is_success());
        assert!(hex_color("#fff".into()).is_success());
        assert!(hex_color("red".into()).is_warning());
    }
}
