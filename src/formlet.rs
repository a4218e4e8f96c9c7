//! Ready-made single-field forms.
//!
//! A [`Formlet`] is a field constructor with its attributes and validator
//! already chosen; [`Formlet::form`] names it and gives it a starting value.
//!
//! ```ignore
//! let name = formlet::netext().form("name", "Ada".to_string());
//! let email = formlet::email().form("email", String::new());
//! let user = formlet::lift!(|n, e| (n, e), name, email);
//! ```
use chrono::NaiveDateTime;
use serde_json::Value;
use std::hash::Hash;
use std::rc::Rc;

use crate::field::{Attributes, ChoiceMeta, Field, FileRef, InputMeta, Validator};
use crate::form::Form;
use crate::validation::Validation;
use crate::validations::{nestring, unique_array};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Optional date or time input.
pub type Moment = Option<NaiveDateTime>;

/// Optional list of picked files.
pub type Files = Option<Vec<FileRef>>;

#[derive(Clone)]
pub struct Formlet<I, A> {
    make: fn(InputMeta<I, A>) -> Field<A>,
    attributes: Attributes,
    validate: Validator<I, A>,
}

/// Initial selection of a choice.
pub enum Selection<A> {
    Key(String),
    /// First entry whose value equals this one.
    Value(A),
    /// First entry whose value satisfies the predicate.
    Find(Box<dyn Fn(&A) -> bool>),
}

// ————————————————————————————————————————————————————————————————————————————
// HIGHER ORDER
// ————————————————————————————————————————————————————————————————————————————

impl<I: Clone + 'static, A: Clone + 'static> Formlet<I, A> {
    pub fn new(make: fn(InputMeta<I, A>) -> Field<A>, validate: impl Fn(I) -> Validation<String, A> + 'static) -> Self {
        Self {
            make,
            attributes: Attributes::new(),
            validate: Rc::new(validate),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Merge `attributes` over the current ones.
    pub fn with_attrs(mut self, attributes: Attributes) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Replace the validator.
    pub fn with_validation(mut self, validate: impl Fn(I) -> Validation<String, A> + 'static) -> Self {
        self.validate = Rc::new(validate);
        self
    }

    pub fn form(&self, name: impl Into<String>, init: I) -> Form<A> {
        let meta = InputMeta {
            name: name.into(),
            init,
            validate: self.validate.clone(),
            attributes: self.attributes.clone(),
            touched: false,
        };
        Form::field((self.make)(meta))
    }
}

impl<I: Clone + Default + 'static, A: Clone + 'static> Formlet<I, A> {
    /// Starts from the input type's empty value.
    pub fn form_default(&self, name: impl Into<String>) -> Form<A> {
        self.form(name, I::default())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// BASE
// ————————————————————————————————————————————————————————————————————————————

pub fn boolean() -> Formlet<bool, bool> {
    Formlet::new(Field::Boolean, Validation::Success)
}

pub fn number() -> Formlet<f64, f64> {
    Formlet::new(Field::Number, Validation::Success)
}

pub fn text() -> Formlet<String, String> {
    Formlet::new(Field::Text, Validation::Success)
}

pub fn textarea() -> Formlet<String, String> {
    Formlet::new(Field::TextArea, Validation::Success)
}

pub fn date() -> Formlet<Moment, Moment> {
    Formlet::new(Field::Time, Validation::Success)
}

pub fn file() -> Formlet<Files, Files> {
    Formlet::new(Field::File, Validation::Success)
}

// ————————————————————————————————————————————————————————————————————————————
// VARIANTS
// ————————————————————————————————————————————————————————————————————————————

pub fn range() -> Formlet<f64, f64> {
    number().with_attr("type", "range")
}

pub fn netext() -> Formlet<String, String> {
    text().with_validation(nestring)
}

pub fn netextarea() -> Formlet<String, String> {
    textarea().with_validation(nestring)
}

pub fn color() -> Formlet<String, String> {
    text().with_attr("type", "color")
}

pub fn email() -> Formlet<String, String> {
    text().with_attr("type", "email")
}

pub fn password() -> Formlet<String, String> {
    text().with_attr("type", "password")
}

pub fn search() -> Formlet<String, String> {
    text().with_attr("type", "search")
}

pub fn tel() -> Formlet<String, String> {
    text().with_attr("type", "tel")
}

pub fn url() -> Formlet<String, String> {
    text().with_attr("type", "url")
}

pub fn datetime() -> Formlet<Moment, Moment> {
    date().with_attr("type", "datetime-local")
}

pub fn month() -> Formlet<Moment, Moment> {
    date().with_attr("type", "month")
}

pub fn week() -> Formlet<Moment, Moment> {
    date().with_attr("type", "week")
}

pub fn time() -> Formlet<Moment, Moment> {
    date().with_attr("type", "time")
}

// ————————————————————————————————————————————————————————————————————————————
// COLLECTIONS
// ————————————————————————————————————————————————————————————————————————————

/// `items` start the list; `template` is copied for each added item.
pub fn list<A: Clone + 'static>(template: Form<A>, items: Vec<Form<A>>) -> Form<Vec<A>> {
    list_with(template, items, |xs| xs)
}

/// [`list`] whose item values are reduced by `g`.
pub fn list_with<A, B>(template: Form<A>, items: Vec<Form<A>>, g: impl Fn(Vec<A>) -> B + 'static) -> Form<B>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    Form::list(template, items, g)
}

/// A list that warns about repeated values.
pub fn unique_list<A: Clone + Eq + Hash + 'static>(template: Form<A>, items: Vec<Form<A>>) -> Form<Vec<A>> {
    list(template, items).validated(unique_array)
}

/// A choice yielding the picked value.
pub fn choice<A: Clone + PartialEq + 'static>(
    name: impl Into<String>,
    choices: Vec<(String, A)>,
    selection: Option<Selection<A>>,
) -> Form<A> {
    choice_with_key(name, choices, selection).map(|(_, a)| a)
}

/// A choice yielding the picked key along with its value. A selection
/// that matches no entry leaves the choice unset.
pub fn choice_with_key<A: Clone + PartialEq + 'static>(
    name: impl Into<String>,
    choices: Vec<(String, A)>,
    selection: Option<Selection<A>>,
) -> Form<(String, A)> {
    let key = selection.and_then(|selection| match selection {
        Selection::Key(key) => Some(key),
        Selection::Value(value) => choices.iter().find(|(_, a)| *a == value).map(|(k, _)| k.clone()),
        Selection::Find(pred) => choices.iter().find(|(_, a)| pred(a)).map(|(k, _)| k.clone()),
    });
    let keyed = choices.into_iter().map(|(k, a)| (k.clone(), (k, a))).collect();
    Form::field(Field::Choice(ChoiceMeta::new(name, keyed, key)))
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
