//! Leaf schema nodes: one atomic input, its current value and its validator.
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::form::EditError;
use crate::input::Input;
use crate::validation::Validation;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Toolkit attributes, forwarded verbatim to renderers.
pub type Attributes = IndexMap<String, serde_json::Value>;

pub type Validator<I, A> = Rc<dyn Fn(I) -> Validation<String, A>>;

/// One entry of a file input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub size: u64,
    #[serde(default)]
    pub mime: Option<String>,
}

#[derive(Clone)]
pub struct InputMeta<I, A> {
    pub name: String,
    pub init: I,
    pub validate: Validator<I, A>,
    pub attributes: Attributes,
    /// Set once the input has been edited.
    pub touched: bool,
}

#[derive(Clone)]
pub struct ChoiceMeta<A> {
    pub name: String,
    /// Selected key; `None` falls back to the first entry.
    pub choice: Option<String>,
    pub choices: Vec<(String, A)>,
    pub attributes: Attributes,
    pub touched: bool,
}

/// A field whose input is produced by a caller-supplied view.
#[derive(Clone)]
pub struct CustomMeta<A> {
    pub input: InputMeta<A, A>,
    /// Identifies the view a renderer should use.
    pub view: String,
}

#[derive(Clone)]
pub enum Field<A> {
    Boolean(InputMeta<bool, A>),
    Number(InputMeta<f64, A>),
    Text(InputMeta<String, A>),
    TextArea(InputMeta<String, A>),
    Time(InputMeta<Option<NaiveDateTime>, A>),
    File(InputMeta<Option<Vec<FileRef>>, A>),
    Choice(ChoiceMeta<A>),
    Pure(A),
    Custom(CustomMeta<A>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Boolean,
    Number,
    Text,
    TextArea,
    Time,
    File,
    Choice,
    Pure,
    Custom,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl FieldKind {
    /// Default input type a renderer should use, unless a `type` attribute
    /// overrides it.
    pub fn input_type(self) -> &'static str {
        match self {
            FieldKind::Boolean => "checkbox",
            FieldKind::Number => "number",
            FieldKind::Text => "text",
            FieldKind::TextArea => "textarea",
            FieldKind::Time => "date",
            FieldKind::File => "file",
            FieldKind::Choice => "select",
            FieldKind::Pure => "hidden",
            FieldKind::Custom => "custom",
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Boolean => "boolean",
            FieldKind::Number => "number",
            FieldKind::Text => "text",
            FieldKind::TextArea => "textarea",
            FieldKind::Time => "time",
            FieldKind::File => "file",
            FieldKind::Choice => "choice",
            FieldKind::Pure => "pure",
            FieldKind::Custom => "custom",
        };
        f.write_str(name)
    }
}

impl<I, A> InputMeta<I, A> {
    pub fn new(
        name: impl Into<String>,
        init: I,
        validate: impl Fn(I) -> Validation<String, A> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            init,
            validate: Rc::new(validate),
            attributes: Attributes::new(),
            touched: false,
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    fn update(&mut self, value: I) {
        self.init = value;
        self.touched = true;
    }
}

impl<I: Clone, A> InputMeta<I, A> {
    pub fn read(&self) -> Validation<String, A> {
        (self.validate)(self.init.clone())
    }
}

impl<A> ChoiceMeta<A> {
    pub fn new(name: impl Into<String>, choices: Vec<(String, A)>, choice: Option<String>) -> Self {
        Self {
            name: name.into(),
            choice,
            choices,
            attributes: Attributes::new(),
            touched: false,
        }
    }
}

impl<A: Clone> ChoiceMeta<A> {
    /// First entry with a matching key wins; no key means the first entry.
    pub fn read(&self) -> Validation<String, A> {
        match &self.choice {
            Some(key) => match self.choices.iter().find(|(k, _)| k == key) {
                Some((_, a)) => Validation::Success(a.clone()),
                None => Validation::Failure(vec!["Invalid choice".to_string()]),
            },
            None => match self.choices.first() {
                Some((_, a)) => Validation::Success(a.clone()),
                None => Validation::Failure(vec!["No choices available".to_string()]),
            },
        }
    }
}

impl<A> Field<A> {
    /// Field name; constant fields have none.
    pub fn name(&self) -> &str {
        match self {
            Field::Boolean(m) => &m.name,
            Field::Number(m) => &m.name,
            Field::Text(m) | Field::TextArea(m) => &m.name,
            Field::Time(m) => &m.name,
            Field::File(m) => &m.name,
            Field::Choice(c) => &c.name,
            Field::Pure(_) => "",
            Field::Custom(c) => &c.input.name,
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Boolean(_) => FieldKind::Boolean,
            Field::Number(_) => FieldKind::Number,
            Field::Text(_) => FieldKind::Text,
            Field::TextArea(_) => FieldKind::TextArea,
            Field::Time(_) => FieldKind::Time,
            Field::File(_) => FieldKind::File,
            Field::Choice(_) => FieldKind::Choice,
            Field::Pure(_) => FieldKind::Pure,
            Field::Custom(_) => FieldKind::Custom,
        }
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            Field::Boolean(m) => Some(&m.attributes),
            Field::Number(m) => Some(&m.attributes),
            Field::Text(m) | Field::TextArea(m) => Some(&m.attributes),
            Field::Time(m) => Some(&m.attributes),
            Field::File(m) => Some(&m.attributes),
            Field::Choice(c) => Some(&c.attributes),
            Field::Pure(_) => None,
            Field::Custom(c) => Some(&c.input.attributes),
        }
    }

    pub fn touched(&self) -> bool {
        match self {
            Field::Boolean(m) => m.touched,
            Field::Number(m) => m.touched,
            Field::Text(m) | Field::TextArea(m) => m.touched,
            Field::Time(m) => m.touched,
            Field::File(m) => m.touched,
            Field::Choice(c) => c.touched,
            Field::Pure(_) => false,
            Field::Custom(c) => c.input.touched,
        }
    }

    /// Human-readable rendering of the current input.
    pub fn current(&self) -> String {
        match self {
            Field::Boolean(m) => m.init.to_string(),
            Field::Number(m) => m.init.to_string(),
            Field::Text(m) | Field::TextArea(m) => format!("{:?}", m.init),
            Field::Time(m) => match &m.init {
                Some(t) => t.format("%Y-%m-%d %H:%M").to_string(),
                None => "-".to_string(),
            },
            Field::File(m) => match &m.init {
                Some(files) => files.iter().map(|f| f.name.as_str()).collect::<Vec<_>>().join(", "),
                None => "-".to_string(),
            },
            Field::Choice(c) => match (&c.choice, c.choices.first()) {
                (Some(key), _) => key.clone(),
                (None, Some((key, _))) => key.clone(),
                (None, None) => "-".to_string(),
            },
            Field::Pure(_) => String::new(),
            Field::Custom(c) => format!("<{}>", c.view),
        }
    }
}

impl<A: Clone + 'static> Field<A> {
    pub fn read(&self) -> Validation<String, A> {
        match self {
            Field::Boolean(m) => m.read(),
            Field::Number(m) => m.read(),
            Field::Text(m) | Field::TextArea(m) => m.read(),
            Field::Time(m) => m.read(),
            Field::File(m) => m.read(),
            Field::Custom(c) => c.input.read(),
            Field::Pure(a) => Validation::Success(a.clone()),
            Field::Choice(c) => c.read(),
        }
    }

    /// Replace the current input and mark the field touched.
    pub fn set(&mut self, input: Input) -> Result<(), EditError> {
        let field = self.name().to_string();
        let expected = self.kind();
        match (self, input) {
            (Field::Boolean(m), Input::Bool(b)) => m.update(b),
            (Field::Number(m), Input::Number(n)) => m.update(n),
            (Field::Text(m) | Field::TextArea(m), Input::Text(s)) => m.update(s),
            (Field::Time(m), Input::Time(t)) => m.update(t),
            (Field::File(m), Input::File(files)) => m.update(files),
            (Field::Choice(c), Input::Choice(key)) => {
                c.choice = key;
                c.touched = true;
            }
            (Field::Custom(c), Input::Custom(value)) => match value.downcast::<A>() {
                Ok(a) => c.input.update(*a),
                Err(_) => {
                    return Err(EditError::Mismatch {
                        field,
                        expected,
                        found: "custom value of another type",
                    });
                }
            },
            (Field::Pure(_), _) => return Err(EditError::ReadOnly),
            (_, input) => {
                return Err(EditError::Mismatch {
                    field,
                    expected,
                    found: input.describe(),
                });
            }
        }
        Ok(())
    }
}

impl<A> fmt::Debug for Field<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("kind", &self.kind())
            .field("name", &self.name())
            .field("current", &self.current())
            .finish()
    }
}

/// Evaluate a leaf against its current input.
pub fn read_field<A: Clone + 'static>(field: &Field<A>) -> Validation<String, A> {
    field.read()
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
