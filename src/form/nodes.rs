use std::rc::Rc;

use super::{Edit, EditError, Form, Func, ItemId, Node, Path};
use crate::either::Either;
use crate::outline::Outline;
use crate::validation::{self, Validation};

pub(super) struct MapNode<B, A> {
    pub(super) func: Func<B, A>,
    pub(super) inner: Form<B>,
}

pub(super) struct ApplyNode<B, A> {
    pub(super) func: Form<Func<B, A>>,
    pub(super) arg: Form<B>,
}

pub(super) struct SelectNode<B, A> {
    pub(super) cond: Form<Either<B, A>>,
    pub(super) func: Form<Func<B, A>>,
}

pub(super) struct ListNode<B, A> {
    template: Form<B>,
    items: Vec<ListItem<B>>,
    next_id: u64,
    reduce: Rc<dyn Fn(Vec<B>) -> A>,
}

/// One element of a list, with an identity that survives reordering.
pub struct ListItem<B> {
    pub id: ItemId,
    pub form: Form<B>,
}

impl<B: Clone + 'static, A: Clone + 'static> Node<A> for MapNode<B, A> {
    fn read(&self) -> Validation<String, A> {
        self.inner.read().map(|b| (self.func)(b))
    }

    fn outline(&self, at: &Path) -> Outline {
        self.inner.outline_at(&at.child(0))
    }

    fn edit(&mut self, path: &Path, depth: usize, edit: Edit) -> Result<(), EditError> {
        match path.step(depth) {
            Some(0) => self.inner.edit_at(path, depth + 1, edit),
            _ => Err(EditError::stray(path, depth, &edit)),
        }
    }

    fn clone_node(&self) -> Box<dyn Node<A>> {
        Box::new(MapNode {
            func: self.func.clone(),
            inner: self.inner.clone(),
        })
    }
}

impl<B: Clone + 'static, A: Clone + 'static> Node<A> for ApplyNode<B, A> {
    fn read(&self) -> Validation<String, A> {
        Validation::ap(self.func.read().map(|g| move |b| g(b)), self.arg.read())
    }

    fn outline(&self, at: &Path) -> Outline {
        Outline::Combine(
            Box::new(self.func.outline_at(&at.child(0))),
            Box::new(self.arg.outline_at(&at.child(1))),
        )
    }

    fn edit(&mut self, path: &Path, depth: usize, edit: Edit) -> Result<(), EditError> {
        match path.step(depth) {
            Some(0) => self.func.edit_at(path, depth + 1, edit),
            Some(1) => self.arg.edit_at(path, depth + 1, edit),
            _ => Err(EditError::stray(path, depth, &edit)),
        }
    }

    fn clone_node(&self) -> Box<dyn Node<A>> {
        Box::new(ApplyNode {
            func: self.func.clone(),
            arg: self.arg.clone(),
        })
    }
}

impl<B: Clone + 'static, A: Clone + 'static> Node<A> for SelectNode<B, A> {
    fn read(&self) -> Validation<String, A> {
        Validation::select(self.cond.read(), self.func.read().map(|g| move |b| g(b)))
    }

    /// The function side is disabled whenever it does not contribute.
    fn outline(&self, at: &Path) -> Outline {
        let hidden = match self.cond.read() {
            Validation::Success(e) | Validation::Warning(_, e) => e.is_right(),
            Validation::Failure(_) => true,
        };
        Outline::Combine(
            Box::new(self.cond.outline_at(&at.child(0))),
            Box::new(Outline::Disable {
                hidden,
                inner: Box::new(self.func.outline_at(&at.child(1))),
            }),
        )
    }

    fn edit(&mut self, path: &Path, depth: usize, edit: Edit) -> Result<(), EditError> {
        match path.step(depth) {
            Some(0) => self.cond.edit_at(path, depth + 1, edit),
            Some(1) => self.func.edit_at(path, depth + 1, edit),
            _ => Err(EditError::stray(path, depth, &edit)),
        }
    }

    fn clone_node(&self) -> Box<dyn Node<A>> {
        Box::new(SelectNode {
            cond: self.cond.clone(),
            func: self.func.clone(),
        })
    }
}

impl<B: Clone + 'static, A> ListNode<B, A> {
    pub(super) fn new(template: Form<B>, forms: Vec<Form<B>>, reduce: Rc<dyn Fn(Vec<B>) -> A>) -> Self {
        let items: Vec<ListItem<B>> = forms
            .into_iter()
            .zip(0u64..)
            .map(|(form, id)| ListItem { id: ItemId(id), form })
            .collect();
        Self {
            template,
            next_id: items.len() as u64,
            items,
            reduce,
        }
    }
}

impl<B: Clone + 'static, A: Clone + 'static> Node<A> for ListNode<B, A> {
    fn read(&self) -> Validation<String, A> {
        validation::sequence(self.items.iter().map(|item| item.form.read())).map(|bs| (self.reduce)(bs))
    }

    fn outline(&self, at: &Path) -> Outline {
        Outline::List {
            path: at.clone(),
            items: self
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| (item.id, item.form.outline_at(&at.child(i))))
                .collect(),
        }
    }

    fn edit(&mut self, path: &Path, depth: usize, edit: Edit) -> Result<(), EditError> {
        if let Some(index) = path.step(depth) {
            return match self.items.get_mut(index) {
                Some(item) => item.form.edit_at(path, depth + 1, edit),
                None => Err(EditError::NoSuchNode(path.clone())),
            };
        }
        match edit {
            Edit::Push => {
                let id = ItemId(self.next_id);
                self.next_id += 1;
                self.items.push(ListItem {
                    id,
                    form: self.template.clone(),
                });
                Ok(())
            }
            Edit::Remove(index) if index < self.items.len() => {
                self.items.remove(index);
                Ok(())
            }
            Edit::Remove(index) => Err(EditError::OutOfRange {
                path: path.clone(),
                index,
                len: self.items.len(),
            }),
            Edit::Set(_) => Err(EditError::stray(path, depth, &edit)),
        }
    }

    fn clone_node(&self) -> Box<dyn Node<A>> {
        Box::new(ListNode {
            template: self.template.clone(),
            items: self
                .items
                .iter()
                .map(|item| ListItem {
                    id: item.id,
                    form: item.form.clone(),
                })
                .collect(),
            next_id: self.next_id,
            reduce: self.reduce.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_items_keep_their_ids() {
        let mut f: Form<Vec<i32>> = Form::list(Form::pure(0), vec![Form::pure(1), Form::pure(2)], |xs| xs);
        f.edit(&Path::root(), Edit::Remove(0)).unwrap();
        f.edit(&Path::root(), Edit::Push).unwrap();
        match f.outline() {
            Outline::List { items, .. } => {
                let ids: Vec<ItemId> = items.iter().map(|(id, _)| *id).collect();
                assert_eq!(ids, vec![ItemId(1), ItemId(2)]);
            }
            other => panic!("expected a list outline, got {other:?}"),
        }
    }

    #[test]
    fn select_outline_hides_unused_function() {
        let cond: Form<Either<i32, i32>> = Form::pure(Either::Right(1));
        let func: Form<Func<i32, i32>> = Form::pure(Rc::new(|b: i32| b) as Func<i32, i32>);
        match Form::select(cond, func).outline() {
            Outline::Combine(_, rhs) => assert!(matches!(*rhs, Outline::Disable { hidden: true, .. })),
            other => panic!("expected a combine outline, got {other:?}"),
        }
    }
}
