//! Render-independent view of a form.
//!
//! [`Form::outline`](crate::form::Form::outline) snapshots the tree into an
//! [`Outline`]; a [`Renderer`] folds that snapshot into whatever a UI
//! toolkit needs. [`TextRenderer`] is the plain-text one used by the CLI.
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use crate::field::{Attributes, Field, FieldKind};
use crate::form::{ItemId, Path};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Everything a renderer needs to draw one input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaf {
    pub path: Path,
    pub name: String,
    pub kind: FieldKind,
    /// Messages to display; empty until the leaf has been touched.
    pub errors: Vec<String>,
    pub touched: bool,
    pub attributes: Attributes,
    /// Choice keys, in order. Empty for other kinds.
    pub options: Vec<String>,
    pub selected: Option<String>,
    pub current: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outline {
    Field(Leaf),
    Combine(Box<Outline>, Box<Outline>),
    /// The function side of a selective node.
    Disable { hidden: bool, inner: Box<Outline> },
    Group { name: String, inner: Box<Outline> },
    /// Messages of a post-hoc validator around the sub-tree it checks.
    Errors { errors: Vec<String>, inner: Box<Outline> },
    List { path: Path, items: Vec<(ItemId, Outline)> },
}

/// The capability set a UI toolkit implements once.
pub trait Renderer {
    type Output;

    fn combine(&self, left: Self::Output, right: Self::Output) -> Self::Output;
    fn field(&self, leaf: &Leaf) -> Self::Output;
    fn errors(&self, errors: &[String], inner: Option<Self::Output>) -> Self::Output;
    fn group(&self, name: &str, inner: Self::Output) -> Self::Output;
    fn disable(&self, hidden: bool, inner: Self::Output) -> Self::Output;
    fn list(&self, path: &Path, items: Vec<(ItemId, Self::Output)>) -> Self::Output;
}

// ————————————————————————————————————————————————————————————————————————————
// LEAVES
// ————————————————————————————————————————————————————————————————————————————

impl Leaf {
    pub fn from_field<A: Clone + 'static>(field: &Field<A>, path: Path) -> Self {
        let touched = field.touched();
        let kind = field.kind();
        let errors = match kind {
            FieldKind::Choice | FieldKind::Pure => Vec::new(),
            _ if touched => field.read().into_errors(),
            _ => Vec::new(),
        };
        let (options, selected) = match field {
            Field::Choice(c) => (c.choices.iter().map(|(k, _)| k.clone()).collect(), c.choice.clone()),
            _ => (Vec::new(), None),
        };
        Self {
            path,
            name: field.name().to_string(),
            kind,
            errors,
            touched,
            attributes: field.attributes().cloned().unwrap_or_default(),
            options,
            selected,
            current: field.current(),
        }
    }

    /// The `type` attribute when present, otherwise the kind's default.
    pub fn input_type(&self) -> &str {
        self.attributes
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_else(|| self.kind.input_type())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// LOOKUP
// ————————————————————————————————————————————————————————————————————————————

impl Outline {
    /// Every named leaf with its qualified name, in tree order.
    pub fn fields(&self) -> Vec<(String, &Leaf)> {
        let mut out = Vec::new();
        self.walk(&mut Vec::new(), &mut |name, node| {
            if let Outline::Field(leaf) = node {
                if leaf.kind != FieldKind::Pure {
                    out.push((name, leaf));
                }
            }
        });
        out
    }

    /// Every list with its qualified name, in tree order.
    pub fn lists(&self) -> Vec<(String, &Path)> {
        let mut out = Vec::new();
        self.walk(&mut Vec::new(), &mut |name, node| {
            if let Outline::List { path, .. } = node {
                out.push((name, path));
            }
        });
        out
    }

    pub fn find_field(&self, name: &str) -> Option<&Leaf> {
        self.fields().into_iter().find(|(n, _)| n == name).map(|(_, leaf)| leaf)
    }

    pub fn find_list(&self, name: &str) -> Option<&Path> {
        self.lists().into_iter().find(|(n, _)| n == name).map(|(_, path)| path)
    }

    /// Pre-order traversal handing out each leaf or list with its
    /// qualified name: enclosing group names, list indices, and for leaves
    /// the field name, joined by `.`.
    fn walk<'a>(&'a self, prefix: &mut Vec<String>, visit: &mut dyn FnMut(String, &'a Outline)) {
        match self {
            Outline::Field(leaf) => {
                prefix.push(leaf.name.clone());
                visit(qualify(prefix), self);
                prefix.pop();
            }
            Outline::Combine(left, right) => {
                left.walk(prefix, visit);
                right.walk(prefix, visit);
            }
            Outline::Disable { inner, .. } | Outline::Errors { inner, .. } => inner.walk(prefix, visit),
            Outline::Group { name, inner } => {
                prefix.push(name.clone());
                inner.walk(prefix, visit);
                prefix.pop();
            }
            Outline::List { items, .. } => {
                visit(qualify(prefix), self);
                for (index, (_, item)) in items.iter().enumerate() {
                    prefix.push(index.to_string());
                    item.walk(prefix, visit);
                    prefix.pop();
                }
            }
        }
    }
}

fn qualify(parts: &[String]) -> String {
    parts.iter().filter(|p| !p.is_empty()).cloned().collect::<Vec<_>>().join(".")
}

// ————————————————————————————————————————————————————————————————————————————
// RENDERING
// ————————————————————————————————————————————————————————————————————————————

pub fn render<R: Renderer>(outline: &Outline, renderer: &R) -> R::Output {
    match outline {
        Outline::Field(leaf) => renderer.field(leaf),
        Outline::Combine(left, right) => renderer.combine(render(left, renderer), render(right, renderer)),
        Outline::Disable { hidden, inner } => renderer.disable(*hidden, render(inner, renderer)),
        Outline::Group { name, inner } => renderer.group(name, render(inner, renderer)),
        Outline::Errors { errors, inner } => renderer.errors(errors, Some(render(inner, renderer))),
        Outline::List { path, items } => renderer.list(
            path,
            items.iter().map(|(id, item)| (*id, render(item, renderer))).collect(),
        ),
    }
}

/// Indented plain text, one line per input.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer {
    pub color: bool,
}

impl TextRenderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint_error(&self, message: &str) -> String {
        let line = format!("! {message}");
        if self.color { line.red().to_string() } else { line }
    }

    fn paint_heading(&self, heading: String) -> String {
        if self.color { heading.bold().to_string() } else { heading }
    }
}

fn indent(lines: Vec<String>) -> Vec<String> {
    lines.into_iter().map(|line| format!("  {line}")).collect()
}

impl Renderer for TextRenderer {
    type Output = Vec<String>;

    fn combine(&self, mut left: Vec<String>, right: Vec<String>) -> Vec<String> {
        left.extend(right);
        left
    }

    fn field(&self, leaf: &Leaf) -> Vec<String> {
        if leaf.kind == FieldKind::Pure {
            return Vec::new();
        }
        let mut head = format!("{} [{}] = {}", leaf.name, leaf.input_type(), leaf.current);
        if !leaf.options.is_empty() {
            head.push_str(&format!(" of {{{}}}", leaf.options.join(", ")));
        }
        let mut lines = vec![head];
        lines.extend(leaf.errors.iter().map(|e| format!("  {}", self.paint_error(e))));
        lines
    }

    fn errors(&self, errors: &[String], inner: Option<Vec<String>>) -> Vec<String> {
        let mut lines = inner.unwrap_or_default();
        lines.extend(errors.iter().map(|e| self.paint_error(e)));
        lines
    }

    fn group(&self, name: &str, inner: Vec<String>) -> Vec<String> {
        let mut lines = vec![self.paint_heading(format!("{name}:"))];
        lines.extend(indent(inner));
        lines
    }

    fn disable(&self, hidden: bool, inner: Vec<String>) -> Vec<String> {
        if hidden { Vec::new() } else { inner }
    }

    fn list(&self, _path: &Path, items: Vec<(ItemId, Vec<String>)>) -> Vec<String> {
        let mut lines = vec![self.paint_heading(format!("[{} item(s)]", items.len()))];
        for (index, (_, item)) in items.into_iter().enumerate() {
            let mut item = item.into_iter();
            if let Some(first) = item.next() {
                lines.push(format!("{index}. {first}"));
            }
            lines.extend(indent(item.collect()));
        }
        lines
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
