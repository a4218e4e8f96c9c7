//! Two-case disjoint union.
//!
//! In forms, `Left` means "a function still has to be applied" (the first
//! branch was taken) and `Right` means "the value is already final".

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<L, R> Either<L, R> {
    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    pub fn left(self) -> Option<L> {
        match self {
            Either::Left(l) => Some(l),
            Either::Right(_) => None,
        }
    }

    pub fn right(self) -> Option<R> {
        match self {
            Either::Left(_) => None,
            Either::Right(r) => Some(r),
        }
    }

    /// Map the `Right` side.
    pub fn map<S>(self, g: impl FnOnce(R) -> S) -> Either<L, S> {
        match self {
            Either::Left(l) => Either::Left(l),
            Either::Right(r) => Either::Right(g(r)),
        }
    }

    pub fn map_left<K>(self, g: impl FnOnce(L) -> K) -> Either<K, R> {
        match self {
            Either::Left(l) => Either::Left(g(l)),
            Either::Right(r) => Either::Right(r),
        }
    }

    /// Eliminate both cases into one type.
    pub fn either<T>(self, on_left: impl FnOnce(L) -> T, on_right: impl FnOnce(R) -> T) -> T {
        match self {
            Either::Left(l) => on_left(l),
            Either::Right(r) => on_right(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_only_touches_right() {
        let l: Either<i32, i32> = Either::Left(1);
        let r: Either<i32, i32> = Either::Right(1);
        assert_eq!(l.map(|x| x + 1), Either::Left(1));
        assert_eq!(r.map(|x| x + 1), Either::Right(2));
        assert_eq!(l.map_left(|x| x * 10), Either::Left(10));
    }

    #[test]
    fn eliminators() {
        let l: Either<&str, u8> = Either::Left("a");
        assert!(l.is_left() && !l.is_right());
        assert_eq!(l.left(), Some("a"));
        assert_eq!(l.right(), None);
        assert_eq!(Either::<u8, u8>::Right(4).either(|x| x, |x| x * 2), 8);
    }
}
