//! Lifting plain functions and collections of forms into forms.
//!
//! Everything here is built from `Map` and `Apply`; none of it adds
//! evaluation semantics. The fixed-arity functions cover the common cases;
//! [`lift!`](crate::lift) and [`lift_a!`](crate::lift_a) take any number of
//! forms.
use std::hash::Hash;
use std::rc::Rc;

use indexmap::IndexMap;

use super::{Form, Func};

/// Left fold of `Apply` collecting values in order. No forms gives
/// `pure(vec![])`.
pub fn sequence<A: Clone + 'static>(forms: impl IntoIterator<Item = Form<A>>) -> Form<Vec<A>> {
    forms.into_iter().fold(Form::pure(Vec::new()), |acc, form| {
        let push = acc.map(|xs: Vec<A>| -> Func<A, Vec<A>> {
            Rc::new(move |x: A| {
                let mut xs = xs.clone();
                xs.push(x);
                xs
            })
        });
        Form::apply(push, form)
    })
}

/// Curried application of a two-argument function.
pub fn lift_a2<A, B, C>(g: impl Fn(A) -> Func<B, C> + 'static, f1: Form<A>, f2: Form<B>) -> Form<C>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    Form::apply(f1.map(g), f2)
}

/// Curried application of a three-argument function.
pub fn lift_a3<A, B, C, D>(
    g: impl Fn(A) -> Func<B, Func<C, D>> + 'static,
    f1: Form<A>,
    f2: Form<B>,
    f3: Form<C>,
) -> Form<D>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: Clone + 'static,
{
    Form::apply(Form::apply(f1.map(g), f2), f3)
}

pub fn lift2<A, B, R>(g: impl Fn(A, B) -> R + 'static, f1: Form<A>, f2: Form<B>) -> Form<R>
where
    A: Clone + 'static,
    B: Clone + 'static,
    R: Clone + 'static,
{
    f1.zip(f2).map(move |(a, b)| g(a, b))
}

pub fn lift3<A, B, C, R>(g: impl Fn(A, B, C) -> R + 'static, f1: Form<A>, f2: Form<B>, f3: Form<C>) -> Form<R>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    R: Clone + 'static,
{
    f1.zip(f2).zip(f3).map(move |((a, b), c)| g(a, b, c))
}

pub fn lift4<A, B, C, D, R>(
    g: impl Fn(A, B, C, D) -> R + 'static,
    f1: Form<A>,
    f2: Form<B>,
    f3: Form<C>,
    f4: Form<D>,
) -> Form<R>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: Clone + 'static,
    R: Clone + 'static,
{
    f1.zip(f2).zip(f3).zip(f4).map(move |(((a, b), c), d)| g(a, b, c, d))
}

/// Uncurried lift of up to twelve forms. The forms are zipped right-nested
/// and `g` receives their values as separate arguments.
///
/// ```
/// use formlet::{lift, Form};
///
/// let sum = lift!(|a: i32, b: i32, c: i32| a + b + c, Form::pure(1), Form::pure(2), Form::pure(3));
/// assert_eq!(sum.read().into_value(), Some(6));
/// ```
#[macro_export]
macro_rules! lift {
    (@zip $form:expr) => { $form };
    (@zip $form:expr, $($rest:expr),+) => { $form.zip($crate::lift!(@zip $($rest),+)) };
    (@pat $id:ident) => { $id };
    (@pat $id:ident $($rest:ident)+) => { ($id, $crate::lift!(@pat $($rest)+)) };
    (@pair $g:expr; [$($ids:ident)*]; [$([$id:ident $form:expr])+];) => {{
        let g = $g;
        $crate::lift!(@zip $($form),+).map(move |$crate::lift!(@pat $($id)+)| g($($id),+))
    }};
    (@pair $g:expr; [$id:ident $($ids:ident)*]; [$($done:tt)*]; $form:expr $(, $rest:expr)*) => {
        $crate::lift!(@pair $g; [$($ids)*]; [$($done)* [$id $form]]; $($rest),*)
    };
    ($g:expr, $($form:expr),+ $(,)?) => {
        $crate::lift!(@pair $g; [__f0 __f1 __f2 __f3 __f4 __f5 __f6 __f7 __f8 __f9 __f10 __f11]; []; $($form),+)
    };
}

/// Curried lift of any number of forms: `g` is mapped over the first form
/// and every further form is folded in with `Apply`.
#[macro_export]
macro_rules! lift_a {
    (@apply $acc:expr;) => { $acc };
    (@apply $acc:expr; $form:expr $(, $rest:expr)*) => {
        $crate::lift_a!(@apply $crate::form::Form::apply($acc, $form); $($rest),*)
    };
    ($g:expr, $first:expr $(, $rest:expr)* $(,)?) => {
        $crate::lift_a!(@apply $first.map($g); $($rest),*)
    };
}

/// Forms keyed by name into a form of a map. Key order decides the order
/// of the sub-forms in the tree, not the resulting value.
pub fn lift_record<K, V>(fields: impl IntoIterator<Item = (K, Form<V>)>) -> Form<IndexMap<K, V>>
where
    K: Clone + Eq + Hash + 'static,
    V: Clone + 'static,
{
    let entries = fields.into_iter().map(|(k, form)| form.map(move |v| (k.clone(), v)));
    sequence(entries).map(|kvs| kvs.into_iter().collect())
}
