//! Composite schemas.
//!
//! A [`Form`] is a tree of [`Field`]s glued together by functorial
//! (`Map`), applicative (`Apply`) and selective (`Select`) combination,
//! dynamically sized lists, named groups and post-hoc validators.
//! [`read_form`] folds the tree bottom-up into a [`Validation`].
//!
//! The variants whose children have a different value type than the node
//! itself (`Map`, `Apply`, `Select`, `List`) hide that type behind a boxed
//! [`Node`]. The shape of a tree never changes except for the number of
//! items in a list.
pub mod edit;
pub mod lift;
mod nodes;

use std::fmt;
use std::rc::Rc;

use crate::either::Either;
use crate::field::Field;
use crate::outline::{Leaf, Outline};
use crate::validation::Validation;

pub use edit::{Edit, EditError, ItemId, Path};
pub use nodes::ListItem;
use nodes::{ApplyNode, ListNode, MapNode, SelectNode};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Function values flowing through a form.
pub type Func<B, A> = Rc<dyn Fn(B) -> A>;

/// Post-hoc validator of a `Validated` node.
pub type Check<A> = Rc<dyn Fn(A) -> Validation<String, A>>;

pub enum Form<A> {
    Field(Field<A>),
    Map(Box<dyn Node<A>>),
    Apply(Box<dyn Node<A>>),
    Select(Box<dyn Node<A>>),
    List(Box<dyn Node<A>>),
    Group(String, Box<Form<A>>),
    Validated(Check<A>, Box<Form<A>>),
}

/// A composite node whose children are typed differently from the node.
pub trait Node<A> {
    fn read(&self) -> Validation<String, A>;

    fn outline(&self, at: &Path) -> Outline;

    /// Apply `edit` to the node at `path`, this node sitting at `depth`.
    fn edit(&mut self, path: &Path, depth: usize, edit: Edit) -> Result<(), EditError>;

    fn clone_node(&self) -> Box<dyn Node<A>>;
}

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTORS
// ————————————————————————————————————————————————————————————————————————————

impl<A: Clone + 'static> Form<A> {
    pub fn field(field: Field<A>) -> Self {
        Form::Field(field)
    }

    /// A constant with no input.
    pub fn pure(a: A) -> Self {
        Form::Field(Field::Pure(a))
    }

    pub fn map<B: Clone + 'static>(self, g: impl Fn(A) -> B + 'static) -> Form<B> {
        Form::Map(Box::new(MapNode {
            func: Rc::new(g),
            inner: self,
        }))
    }

    /// Both sides are always evaluated; errors of `func` come first.
    pub fn apply<B: Clone + 'static>(func: Form<Func<B, A>>, arg: Form<B>) -> Self {
        Form::Apply(Box::new(ApplyNode { func, arg }))
    }

    /// `func` is only applied when `cond` yields `Left`. Both sub-forms stay
    /// part of the tree either way.
    pub fn select<B: Clone + 'static>(cond: Form<Either<B, A>>, func: Form<Func<B, A>>) -> Self {
        Form::Select(Box::new(SelectNode { cond, func }))
    }

    /// A sequence of `items`, each shaped like `template`, reduced by `g`.
    pub fn list<B: Clone + 'static>(
        template: Form<B>,
        items: Vec<Form<B>>,
        g: impl Fn(Vec<B>) -> A + 'static,
    ) -> Self {
        Form::List(Box::new(ListNode::new(template, items, Rc::new(g))))
    }

    pub fn group(self, name: impl Into<String>) -> Self {
        Form::Group(name.into(), Box::new(self))
    }

    pub fn validated(self, check: impl Fn(A) -> Validation<String, A> + 'static) -> Self {
        Form::Validated(Rc::new(check), Box::new(self))
    }

    pub fn zip<B: Clone + 'static>(self, other: Form<B>) -> Form<(A, B)> {
        Form::apply(
            self.map(|a: A| -> Func<B, (A, B)> { Rc::new(move |b: B| (a.clone(), b)) }),
            other,
        )
    }
}

// ————————————————————————————————————————————————————————————————————————————
// EVALUATION
// ————————————————————————————————————————————————————————————————————————————

impl<A: Clone + 'static> Form<A> {
    pub fn read(&self) -> Validation<String, A> {
        match self {
            Form::Field(f) => f.read(),
            Form::Map(n) | Form::Apply(n) | Form::Select(n) | Form::List(n) => n.read(),
            Form::Group(_, f) => f.read(),
            Form::Validated(check, f) => match f.read() {
                Validation::Failure(es) => Validation::Failure(es),
                Validation::Warning(es, a) => check(a).with_failures(es),
                Validation::Success(a) => check(a),
            },
        }
    }

    /// Render-independent view of the tree.
    pub fn outline(&self) -> Outline {
        self.outline_at(&Path::root())
    }

    pub(crate) fn outline_at(&self, at: &Path) -> Outline {
        match self {
            Form::Field(f) => Outline::Field(Leaf::from_field(f, at.clone())),
            Form::Map(n) | Form::Apply(n) | Form::Select(n) | Form::List(n) => n.outline(at),
            Form::Group(name, f) => Outline::Group {
                name: name.clone(),
                inner: Box::new(f.outline_at(&at.child(0))),
            },
            Form::Validated(check, f) => {
                let inner = f.outline_at(&at.child(0));
                // only the extra validator's own messages are shown here
                let shown = match f.read() {
                    Validation::Failure(_) => Vec::new(),
                    Validation::Success(a) | Validation::Warning(_, a) => check(a).into_errors(),
                };
                if shown.is_empty() {
                    inner
                } else {
                    Outline::Errors {
                        errors: shown,
                        inner: Box::new(inner),
                    }
                }
            }
        }
    }

    pub fn edit(&mut self, path: &Path, edit: Edit) -> Result<(), EditError> {
        self.edit_at(path, 0, edit)
    }

    pub(crate) fn edit_at(&mut self, path: &Path, depth: usize, edit: Edit) -> Result<(), EditError> {
        match self {
            Form::Field(f) => match (path.step(depth), edit) {
                (None, Edit::Set(input)) => f.set(input),
                (_, edit) => Err(EditError::stray(path, depth, &edit)),
            },
            Form::Map(n) | Form::Apply(n) | Form::Select(n) | Form::List(n) => n.edit(path, depth, edit),
            Form::Group(_, f) | Form::Validated(_, f) => match path.step(depth) {
                Some(0) => f.edit_at(path, depth + 1, edit),
                _ => Err(EditError::stray(path, depth, &edit)),
            },
        }
    }
}

/// Evaluate a form against the current state of its leaves.
pub fn read_form<A: Clone + 'static>(form: &Form<A>) -> Validation<String, A> {
    form.read()
}

impl<A: Clone + 'static> Clone for Form<A> {
    fn clone(&self) -> Self {
        match self {
            Form::Field(f) => Form::Field(f.clone()),
            Form::Map(n) => Form::Map(n.clone_node()),
            Form::Apply(n) => Form::Apply(n.clone_node()),
            Form::Select(n) => Form::Select(n.clone_node()),
            Form::List(n) => Form::List(n.clone_node()),
            Form::Group(name, f) => Form::Group(name.clone(), f.clone()),
            Form::Validated(check, f) => Form::Validated(check.clone(), f.clone()),
        }
    }
}

impl<A: Clone + 'static> fmt::Debug for Form<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Form").field(&self.outline()).finish()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DERIVED COMBINATORS
// ————————————————————————————————————————————————————————————————————————————

/// `left` applies on `Left(a)`, `right` on `Right(b)`; only one function
/// is applied per evaluation.
pub fn branch<A, B, C>(cond: Form<Either<A, B>>, left: Form<Func<A, C>>, right: Form<Func<B, C>>) -> Form<C>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    let cond = cond.map(|e: Either<A, B>| -> Either<A, Either<B, C>> { e.map(Either::Left) });
    let left = left.map(|g: Func<A, C>| -> Func<A, Either<B, C>> { Rc::new(move |a: A| Either::Right(g(a))) });
    Form::select(Form::select(cond, left), right)
}

/// Both branches stay in the tree; only the chosen one contributes.
pub fn if_else<A: Clone + 'static>(cond: Form<bool>, then: Form<A>, otherwise: Form<A>) -> Form<A> {
    fn constant<A: Clone + 'static>(form: Form<A>) -> Form<Func<(), A>> {
        form.map(|x: A| -> Func<(), A> { Rc::new(move |()| x.clone()) })
    }
    branch(
        cond.map(|b| if b { Either::Left(()) } else { Either::Right(()) }),
        constant(then),
        constant(otherwise),
    )
}

/// `Some` of `form`'s value when `selects` is true; `None` otherwise, in
/// which case `form`'s errors are suppressed.
pub fn when<A: Clone + 'static>(selects: Form<bool>, form: Form<A>) -> Form<Option<A>> {
    Form::select(
        selects.map(|on| if on { Either::Left(()) } else { Either::Right(None) }),
        form.map(|a: A| -> Func<(), Option<A>> { Rc::new(move |()| Some(a.clone())) }),
    )
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::InputMeta;
    use crate::input::Input;
    use crate::validations::nestring;

    fn text(name: &str, init: &str) -> Form<String> {
        Form::field(Field::Text(InputMeta::new(name, init.to_string(), nestring)))
    }

    fn flag(name: &str, init: bool) -> Form<bool> {
        Form::field(Field::Boolean(InputMeta::new(name, init, Validation::Success)))
    }

    fn num(v: i32) -> Form<i32> {
        Form::pure(v)
    }

    fn warn(msg: &str, v: i32) -> Form<i32> {
        let msg = msg.to_string();
        Form::field(Field::Number(InputMeta::new("n", f64::from(v), move |x: f64| {
            Validation::Warning(vec![msg.clone()], x as i32)
        })))
    }

    fn fail(msg: &str) -> Form<i32> {
        let msg = msg.to_string();
        Form::field(Field::Number(InputMeta::new("n", 0.0, move |_: f64| {
            Validation::Failure(vec![msg.clone()])
        })))
    }

    fn s(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn pure_is_success() {
        assert_eq!(read_form(&Form::pure("a")), Validation::Success("a"));
    }

    #[test]
    fn map_transforms_value() {
        assert_eq!(num(2).map(|x| x * 5).read(), Validation::Success(10));
        assert_eq!(warn("w", 2).map(|x| x + 1).read(), Validation::Warning(s(&["w"]), 3));
    }

    #[test]
    fn apply_accumulates_both_sides_in_order() {
        let f = warn("x", 1).zip(warn("y", 2));
        assert_eq!(f.read(), Validation::Warning(s(&["x", "y"]), (1, 2)));

        let f = fail("a").zip(fail("b"));
        assert_eq!(f.read(), Validation::Failure(s(&["a", "b"])));

        let f = fail("a").zip(num(1));
        assert_eq!(f.read(), Validation::Failure(s(&["a"])));
    }

    #[test]
    fn select_right_hides_function_errors() {
        let cond: Form<Either<i32, i32>> = Form::pure(Either::Right(5));
        let func = fail("never").map(|_| -> Func<i32, i32> { Rc::new(|b: i32| b) });
        assert_eq!(Form::select(cond, func).read(), Validation::Success(5));
    }

    #[test]
    fn select_left_applies_function() {
        let cond: Form<Either<i32, i32>> = Form::pure(Either::Left(5));
        let func = warn("g", 3).map(|k| -> Func<i32, i32> { Rc::new(move |b: i32| b * k) });
        assert_eq!(Form::select(cond, func).read(), Validation::Warning(s(&["g"]), 15));
    }

    #[test]
    fn select_on_warning_left_puts_function_errors_first() {
        let cond: Form<Either<i32, i32>> = Form::field(Field::Number(InputMeta::new("c", 2.0, |x: f64| {
            Validation::Warning(vec!["s".to_string()], Either::Left(x as i32))
        })));
        let func = warn("g", 10).map(|k| -> Func<i32, i32> { Rc::new(move |b: i32| b * k) });
        assert_eq!(Form::select(cond.clone(), func).read(), Validation::Warning(s(&["g", "s"]), 20));

        let failing = fail("g").map(|k| -> Func<i32, i32> { Rc::new(move |b: i32| b * k) });
        assert_eq!(Form::select(cond, failing).read(), Validation::Failure(s(&["g", "s"])));
    }

    #[test]
    fn list_reads_items_in_order_and_follows_removal() {
        let mut f = Form::list(num(0), vec![num(1), num(2), num(3)], |xs| xs);
        assert_eq!(f.read(), Validation::Success(vec![1, 2, 3]));

        f.edit(&Path::root(), Edit::Remove(1)).unwrap();
        assert_eq!(f.read(), Validation::Success(vec![1, 3]));

        f.edit(&Path::root(), Edit::Push).unwrap();
        assert_eq!(f.read(), Validation::Success(vec![1, 3, 0]));

        let err = f.edit(&Path::root(), Edit::Remove(7)).unwrap_err();
        assert!(matches!(err, EditError::OutOfRange { index: 7, len: 3, .. }));
    }

    #[test]
    fn list_reduces_with_its_function() {
        let f = Form::list(num(0), vec![warn("a", 1), num(2), warn("b", 3)], |xs| xs.iter().sum::<i32>());
        assert_eq!(f.read(), Validation::Warning(s(&["a", "b"]), 6));
    }

    #[test]
    fn group_is_transparent() {
        for f in [num(1), warn("w", 2), fail("f")] {
            assert_eq!(f.clone().group("x").read(), f.read());
        }
    }

    #[test]
    fn validated_adds_its_errors_after_base() {
        let f = Form::pure(String::new()).validated(nestring);
        assert_eq!(f.read(), Validation::Warning(s(&["Must be non-empty"]), String::new()));

        let check = |x: i32| if x > 10 { Validation::Success(x) } else { Validation::Warning(vec!["small".into()], x) };
        assert_eq!(warn("base", 2).validated(check).read(), Validation::Warning(s(&["base", "small"]), 2));
        assert_eq!(num(20).validated(check).read(), Validation::Success(20));
    }

    #[test]
    fn validated_skips_check_on_failure() {
        let f = fail("base").validated(|_| Validation::Failure(vec!["extra".into()]));
        assert_eq!(f.read(), Validation::Failure(s(&["base"])));
    }

    #[test]
    fn validated_failure_on_warning_base_keeps_base_errors_first() {
        let f = warn("base", 2).validated(|_| Validation::Failure(vec!["extra".into()]));
        assert_eq!(f.read(), Validation::Failure(s(&["base", "extra"])));
    }

    #[test]
    fn when_suppresses_errors_when_off() {
        let f = when(flag("on", false), text("email", ""));
        assert_eq!(f.read(), Validation::Success(None));

        let f = when(flag("on", true), text("email", ""));
        assert_eq!(f.read(), Validation::Warning(s(&["Must be non-empty"]), Some(String::new())));
    }

    #[test]
    fn if_else_takes_one_branch() {
        let f = |on| if_else(flag("on", on), warn("then", 1), warn("else", 2));
        assert_eq!(f(true).read(), Validation::Warning(s(&["then"]), 1));
        assert_eq!(f(false).read(), Validation::Warning(s(&["else"]), 2));
    }

    #[test]
    fn branch_applies_matching_side() {
        let build = |e: Either<i32, String>| {
            branch(
                Form::pure(e),
                Form::pure(Rc::new(|a: i32| a.to_string()) as Func<i32, String>),
                Form::pure(Rc::new(|b: String| b.to_uppercase()) as Func<String, String>),
            )
        };
        assert_eq!(build(Either::Left(7)).read(), Validation::Success("7".to_string()));
        assert_eq!(build(Either::Right("ok".into())).read(), Validation::Success("OK".to_string()));
    }

    #[test]
    fn edits_reach_leaves_through_combinators() {
        let mut f = when(flag("on", false), text("email", "")).group("email");
        // group -> select -> (cond map -> flag)
        f.edit(&Path::from(vec![0, 0, 0]), Edit::Set(Input::Bool(true))).unwrap();
        assert_eq!(f.read(), Validation::Warning(s(&["Must be non-empty"]), Some(String::new())));

        // group -> select -> (func map -> text)
        f.edit(&Path::from(vec![0, 1, 0]), Edit::Set(Input::Text("a@b.c".into()))).unwrap();
        assert_eq!(f.read(), Validation::Success(Some("a@b.c".to_string())));

        let err = f.edit(&Path::from(vec![0, 2]), Edit::Push).unwrap_err();
        assert!(matches!(err, EditError::NoSuchNode(_)));
        let err = f.edit(&Path::from(vec![0, 0]), Edit::Push).unwrap_err();
        assert!(matches!(err, EditError::Rejected { .. }));
    }

    #[test]
    fn clones_are_independent() {
        let original = text("name", "");
        let mut copy = original.clone();
        copy.edit(&Path::root(), Edit::Set(Input::Text("x".into()))).unwrap();
        assert!(original.read().is_warning());
        assert!(copy.read().is_success());
    }
}
