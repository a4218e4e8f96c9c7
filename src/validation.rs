//! Three-case validation results with ordered error accumulation.
//!
//! - `Success(a)`: valid value, no errors.
//! - `Warning(es, a)`: the value is usable but flagged.
//! - `Failure(es)`: no value, only errors.
//!
//! Errors always accumulate left to right: combining `x` with `y` lists the
//! errors of `x` before those of `y`.
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;

use crate::either::Either;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Validation<E, A> {
    Success(A),
    Warning(Vec<E>, A),
    Failure(Vec<E>),
}

/// The case of a [`Validation`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warning,
    Failure,
}

use Validation::{Failure, Success, Warning};

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl<E, A> Validation<E, A> {
    pub fn status(&self) -> Status {
        match self {
            Success(_) => Status::Success,
            Warning(..) => Status::Warning,
            Failure(_) => Status::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Success(_))
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Warning(..))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Failure(_))
    }

    /// Errors carried by this result (empty for `Success`).
    pub fn errors(&self) -> &[E] {
        match self {
            Success(_) => &[],
            Warning(es, _) | Failure(es) => es,
        }
    }

    pub fn into_errors(self) -> Vec<E> {
        self.errors_or(Vec::new())
    }

    /// Errors carried by this result, or `default` for a `Success`.
    pub fn errors_or(self, default: Vec<E>) -> Vec<E> {
        match self {
            Success(_) => default,
            Warning(es, _) | Failure(es) => es,
        }
    }

    pub fn value(&self) -> Option<&A> {
        match self {
            Success(a) | Warning(_, a) => Some(a),
            Failure(_) => None,
        }
    }

    pub fn into_value(self) -> Option<A> {
        match self {
            Success(a) | Warning(_, a) => Some(a),
            Failure(_) => None,
        }
    }

    /// The value of a `Success` or `Warning`, `default` for a `Failure`.
    pub fn unwrap_or(self, default: A) -> A {
        self.into_value().unwrap_or(default)
    }

    /// Strict view: anything but a `Success` is an error.
    pub fn into_result(self) -> Result<A, Vec<E>> {
        match self {
            Success(a) => Ok(a),
            Warning(es, _) | Failure(es) => Err(es),
        }
    }

    pub fn map<B>(self, g: impl FnOnce(A) -> B) -> Validation<E, B> {
        match self {
            Success(a) => Success(g(a)),
            Warning(es, a) => Warning(es, g(a)),
            Failure(es) => Failure(es),
        }
    }

    /// Monadic bind. Warnings of `self` are dropped; callers that need them
    /// merge explicitly with [`Validation::with_failures`] or [`Validation::ap`].
    pub fn chain<B>(self, g: impl FnOnce(A) -> Validation<E, B>) -> Validation<E, B> {
        match self {
            Success(a) | Warning(_, a) => g(a),
            Failure(es) => Failure(es),
        }
    }

    /// Prepend `es1` to the errors already carried, downgrading a `Success`
    /// to a `Warning`. An empty prefix leaves `self` unchanged.
    pub fn with_failures(self, mut es1: Vec<E>) -> Self {
        if es1.is_empty() {
            return self;
        }
        match self {
            Success(a) => Warning(es1, a),
            Warning(es2, a) => {
                es1.extend(es2);
                Warning(es1, a)
            }
            Failure(es2) => {
                es1.extend(es2);
                Failure(es1)
            }
        }
    }

    /// Applicative combination. Both sides are always inspected and the
    /// errors of `fg` precede those of `fa`.
    pub fn ap<B, F>(fg: Validation<E, F>, fa: Validation<E, B>) -> Self
    where
        F: FnOnce(B) -> A,
    {
        match fg {
            Success(g) => fa.map(g),
            Warning(es1, g) => fa.with_failures(es1).map(g),
            Failure(mut es1) => {
                if let Warning(es2, _) | Failure(es2) = fa {
                    es1.extend(es2);
                }
                Failure(es1)
            }
        }
    }

    /// Selective combination. `fg` only contributes when `fs` holds a
    /// `Left`, applied through [`Validation::ap`] so its errors come before
    /// those of `fs`. On `Right` its errors are ignored, and a failing `fs`
    /// short-circuits without looking at `fg`.
    pub fn select<B, F>(fs: Validation<E, Either<B, A>>, fg: Validation<E, F>) -> Self
    where
        F: FnOnce(B) -> A,
    {
        match fs {
            Failure(es) => Failure(es),
            Warning(es, Either::Left(b)) => Validation::ap(fg, Warning(es, b)),
            Warning(es, Either::Right(a)) => Warning(es, a),
            Success(Either::Left(b)) => Validation::ap(fg, Success(b)),
            Success(Either::Right(a)) => Success(a),
        }
    }
}

/// Left fold of [`Validation::ap`] from `Success([])`: values in order,
/// errors accumulated in order.
pub fn sequence<E, A>(vs: impl IntoIterator<Item = Validation<E, A>>) -> Validation<E, Vec<A>> {
    vs.into_iter().fold(Success(Vec::new()), |acc, v| {
        Validation::ap(
            acc.map(|mut xs: Vec<A>| {
                move |x| {
                    xs.push(x);
                    xs
                }
            }),
            v,
        )
    })
}

impl<E, A> FromIterator<Validation<E, A>> for Validation<E, Vec<A>> {
    fn from_iter<I: IntoIterator<Item = Validation<E, A>>>(iter: I) -> Self {
        sequence(iter)
    }
}

/// Serialized as `{"status": .., "errors": [..], "value": ..}`, with a
/// `null` value for failures.
impl<E: Serialize, A: Serialize> Serialize for Validation<E, A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("Validation", 3)?;
        st.serialize_field("status", &self.status())?;
        st.serialize_field("errors", self.errors())?;
        st.serialize_field("value", &self.value())?;
        st.end()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
