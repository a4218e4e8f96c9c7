//! Typed forms with applicative and selective composition.
//!
//! A [`Form`] describes a tree of input fields and how their values combine
//! into one typed value. Reading a form folds the current state of its
//! leaves into a [`Validation`]: `Success`, `Warning` (value plus messages)
//! or `Failure` (messages only). Errors from independent parts accumulate
//! left to right; a selective node only pulls in its function side when
//! the selector says so.
//!
//! Plain functions are lifted over any number of forms with [`lift!`] and
//! [`lift_a!`].
//!
//! Rendering is left to a [`Renderer`](outline::Renderer) over the
//! toolkit-neutral [`Outline`](outline::Outline); live editing goes through
//! a [`Session`].
pub mod either;
pub mod field;
pub mod form;
pub mod formlet;
pub mod input;
pub mod maybe;
pub mod outline;
pub mod registration;
pub mod script;
pub mod session;
pub mod validation;
pub mod validations;

pub use either::Either;
pub use field::{read_field, Field, FieldKind};
pub use form::lift::{lift2, lift3, lift4, lift_a2, lift_a3, lift_record, sequence};
pub use form::{branch, if_else, read_form, when, Edit, EditError, Form, Func, Path};
pub use formlet::{Formlet, Selection};
pub use input::Input;
pub use maybe::Maybe;
pub use session::Session;
pub use validation::{Status, Validation};
