//! A live form: the tree, its latest value, and whoever listens for changes.
//!
//! Every accepted edit re-reads the whole tree, so [`Session::value`] is
//! always what [`read_form`](crate::form::read_form) gives on the current
//! tree. Rejected edits leave both untouched and notify nobody.
use log::{debug, trace};
use serde_json::Value;

use crate::form::{Edit, EditError, Form, Path};
use crate::input::Input;
use crate::outline::{Leaf, Outline};
use crate::validation::Validation;

pub type Listener<A> = Box<dyn FnMut(&Validation<String, A>)>;

pub struct Session<A> {
    form: Form<A>,
    value: Validation<String, A>,
    listeners: Vec<Listener<A>>,
}

impl<A: Clone + 'static> Session<A> {
    pub fn new(form: Form<A>) -> Self {
        let value = form.read();
        Self {
            form,
            value,
            listeners: Vec::new(),
        }
    }

    pub fn value(&self) -> &Validation<String, A> {
        &self.value
    }

    pub fn form(&self) -> &Form<A> {
        &self.form
    }

    pub fn into_form(self) -> Form<A> {
        self.form
    }

    pub fn outline(&self) -> Outline {
        self.form.outline()
    }

    /// Called with the new value after every accepted edit.
    pub fn subscribe(&mut self, listener: impl FnMut(&Validation<String, A>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn edit(&mut self, path: &Path, edit: Edit) -> Result<(), EditError> {
        let kind = edit.describe();
        self.form.edit(path, edit)?;
        self.value = self.form.read();
        debug!("{kind} at {path}: {:?}", self.value.status());
        self.notify();
        Ok(())
    }

    pub fn set(&mut self, path: &Path, input: Input) -> Result<(), EditError> {
        self.edit(path, Edit::Set(input))
    }

    // ———— by name ————

    pub fn locate_field(&self, name: &str) -> Result<Leaf, EditError> {
        self.outline()
            .find_field(name)
            .cloned()
            .ok_or_else(|| EditError::UnknownField(name.to_string()))
    }

    pub fn locate_list(&self, name: &str) -> Result<Path, EditError> {
        self.outline()
            .find_list(name)
            .cloned()
            .ok_or_else(|| EditError::UnknownList(name.to_string()))
    }

    pub fn set_named(&mut self, name: &str, input: Input) -> Result<(), EditError> {
        let leaf = self.locate_field(name)?;
        self.set(&leaf.path, input)
    }

    /// Decode `value` according to the named field's kind, then set it.
    pub fn set_json(&mut self, name: &str, value: &Value) -> Result<(), EditError> {
        let leaf = self.locate_field(name)?;
        let input = Input::from_json(leaf.kind, name, value)?;
        self.set(&leaf.path, input)
    }

    pub fn push(&mut self, list: &str) -> Result<(), EditError> {
        let path = self.locate_list(list)?;
        self.edit(&path, Edit::Push)
    }

    pub fn remove(&mut self, list: &str, index: usize) -> Result<(), EditError> {
        let path = self.locate_list(list)?;
        self.edit(&path, Edit::Remove(index))
    }

    fn notify(&mut self) {
        trace!("notifying {} listener(s)", self.listeners.len());
        for listener in &mut self.listeners {
            listener(&self.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::when;
    use crate::formlet;
    use crate::validation::Status;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn newsletter() -> Form<Option<String>> {
        when(formlet::boolean().form("subscribe", false), formlet::netext().form("email", String::new())).group("email")
    }

    #[test]
    fn edits_propagate_to_value_and_listeners() {
        let mut session = Session::new(newsletter());
        let seen = Rc::new(RefCell::new(Vec::<Status>::new()));
        let sink = seen.clone();
        session.subscribe(move |v| sink.borrow_mut().push(v.status()));

        assert_eq!(session.value(), &Validation::Success(None));
        session.set_json("email.subscribe", &json!(true)).unwrap();
        assert_eq!(
            session.value(),
            &Validation::Warning(vec!["Must be non-empty".to_string()], Some(String::new()))
        );
        session.set_json("email.email", &json!("a@b.c")).unwrap();
        assert_eq!(session.value(), &Validation::Success(Some("a@b.c".to_string())));
        assert_eq!(*seen.borrow(), vec![Status::Warning, Status::Success]);
        assert_eq!(session.value(), &session.form().read());
    }

    #[test]
    fn rejected_edits_change_nothing() {
        let mut session = Session::new(newsletter());
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        session.subscribe(move |_| *counter.borrow_mut() += 1);

        assert!(matches!(session.set_json("email.nope", &json!(1)), Err(EditError::UnknownField(_))));
        assert!(matches!(
            session.set_json("email.subscribe", &json!("yes")),
            Err(EditError::InvalidValue { .. })
        ));
        assert!(matches!(session.push("email"), Err(EditError::UnknownList(_))));
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(session.value(), &Validation::Success(None));
    }

    #[test]
    fn lists_grow_and_shrink_by_name() {
        let form = formlet::unique_list(formlet::text().form_default("item"), vec![]).group("texts");
        let mut session = Session::new(form);
        session.push("texts").unwrap();
        session.push("texts").unwrap();
        session.set_json("texts.0.item", &json!("x")).unwrap();
        session.set_json("texts.1.item", &json!("x")).unwrap();
        assert!(session.value().is_warning());

        session.remove("texts", 0).unwrap();
        assert_eq!(session.value(), &Validation::Success(vec!["x".to_string()]));
        assert!(matches!(session.remove("texts", 5), Err(EditError::OutOfRange { index: 5, len: 1, .. })));
    }
}
