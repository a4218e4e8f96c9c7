//! Optional values.
//!
//! `Maybe<A>` is `Option<A>`: `Just(a)` is `Some(a)` and `Nothing` is
//! `None`. Only the helpers `Option` lacks live here.

pub type Maybe<A> = Option<A>;

/// Keep the present values, in order.
pub fn cat_maybes<A>(ms: impl IntoIterator<Item = Maybe<A>>) -> Vec<A> {
    ms.into_iter().flatten().collect()
}

/// Fold a present value into `init`, or return `init` untouched.
pub fn fold<A, B>(m: Maybe<A>, init: B, g: impl FnOnce(A, B) -> B) -> B {
    match m {
        Some(a) => g(a, init),
        None => init,
    }
}
