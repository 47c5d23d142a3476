#![forbid(unsafe_code)]

//! Declarative UI loading.
//!
//! A [`UiDescriptor`] describes a widget tree with literal properties and
//! property bindings. [`UiLoader`] builds the whole tree first, then applies
//! bindings in document order by calling [`View::bind`] on the nearest view:
//! the widget itself if it is a [`Form`], an enclosing form, or the host view
//! passed to [`UiLoader::load_into`].
//!
//! ```toml
//! [root]
//! class = "Form"
//!
//! [[root.children]]
//! class = "LineEdit"
//! name = "author"
//! properties = { placeholder = "Your name" }
//! bindings = [{ property = "text", path = "author" }]
//! ```
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Malformed TOML / JSON | `LoadError::Toml` / `LoadError::Json` |
//! | Unknown `class` | `LoadError::UnknownClass` |
//! | Literal property rejected by the widget | `LoadError::InvalidProperty` |
//! | Children under a non-container | `LoadError::NotAContainer` |
//! | No view for a binding | Logged at `error` and skipped; `MissingView` when strict |
//! | Binding configuration error | `LoadError::Bind` |

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use bindery_core::{BindError, Value, Widget};
use bindery_runtime::{BindFlags, View};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::{CheckBox, Container, Form, Label, LineEdit, ListView, Panel, SpinBox, TextEdit};

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// A whole UI document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UiDescriptor {
    pub root: WidgetDescriptor,
}

impl UiDescriptor {
    pub fn from_toml_str(source: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(source)?)
    }
}

/// One widget and its subtree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidgetDescriptor {
    pub class: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, LiteralValue>,
    #[serde(default)]
    pub bindings: Vec<BindingDescriptor>,
    #[serde(default)]
    pub children: Vec<WidgetDescriptor>,
}

/// A binding from a context property (`path`) to a widget `property`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingDescriptor {
    pub property: String,
    pub path: String,
    #[serde(default)]
    pub mode: BindMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BindMode {
    Read,
    Write,
    #[default]
    ReadWrite,
}

impl From<BindMode> for BindFlags {
    fn from(mode: BindMode) -> Self {
        match mode {
            BindMode::Read => BindFlags::READ,
            BindMode::Write => BindFlags::WRITE,
            BindMode::ReadWrite => BindFlags::READ_WRITE,
        }
    }
}

/// A literal property value in a descriptor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<LiteralValue> for Value {
    fn from(literal: LiteralValue) -> Self {
        match literal {
            LiteralValue::Bool(b) => Value::Bool(b),
            LiteralValue::Int(i) => Value::Int(i),
            LiteralValue::Float(x) => Value::Float(x),
            LiteralValue::Text(s) => Value::Text(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors and results
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid TOML UI description: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON UI description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown widget class `{0}`")]
    UnknownClass(String),

    #[error("cannot set `{property}` on {class}: {source}")]
    InvalidProperty {
        class: String,
        property: String,
        #[source]
        source: BindError,
    },

    #[error("{class} cannot hold child widgets")]
    NotAContainer { class: String },

    #[error("no view found for binding `{path}` -> {class}.{property}")]
    MissingView {
        class: String,
        property: String,
        path: String,
    },

    #[error(transparent)]
    Bind(#[from] BindError),
}

/// Loader behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderOptions {
    /// Fail instead of skipping bindings that have no view.
    pub strict: bool,
}

/// A binding skipped because no view encloses its widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBinding {
    pub class: &'static str,
    pub widget_name: Option<String>,
    pub binding: BindingDescriptor,
}

/// The built tree.
pub struct LoadedUi {
    pub root: Rc<dyn Widget>,
    named: HashMap<String, Rc<dyn Widget>>,
    pub skipped: Vec<SkippedBinding>,
}

impl fmt::Debug for LoadedUi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedUi")
            .field("root", &self.root.class_name())
            .field("named", &self.named.keys().collect::<Vec<_>>())
            .field("skipped", &self.skipped)
            .finish()
    }
}

impl LoadedUi {
    /// A widget by its descriptor `name`.
    #[must_use]
    pub fn widget(&self, name: &str) -> Option<Rc<dyn Widget>> {
        self.named.get(name).cloned()
    }

    /// A widget by name, downcast to its concrete type.
    #[must_use]
    pub fn get<T: Widget>(&self, name: &str) -> Option<Rc<T>> {
        self.widget(name).and_then(|w| crate::downcast::<T>(&w))
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

type Factory = Rc<dyn Fn() -> Rc<dyn Widget>>;

struct Node {
    widget: Rc<dyn Widget>,
    parent: Option<usize>,
    name: Option<String>,
    bindings: Vec<BindingDescriptor>,
}

/// Builds widget trees from descriptors.
pub struct UiLoader {
    options: LoaderOptions,
    factories: HashMap<String, Factory>,
}

impl Default for UiLoader {
    fn default() -> Self {
        Self::new(LoaderOptions::default())
    }
}

impl fmt::Debug for UiLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiLoader")
            .field("options", &self.options)
            .field("custom_classes", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl UiLoader {
    #[must_use]
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            factories: HashMap::new(),
        }
    }

    /// Register a constructor for a custom widget class.
    pub fn register(
        &mut self,
        class: impl Into<String>,
        factory: impl Fn() -> Rc<dyn Widget> + 'static,
    ) -> &mut Self {
        self.factories.insert(class.into(), Rc::new(factory));
        self
    }

    /// Build a tree whose bindings may only use forms inside it.
    pub fn build(&self, ui: &UiDescriptor) -> Result<LoadedUi, LoadError> {
        self.load(ui, None)
    }

    /// Build a tree, falling back to `host` for bindings outside any form.
    pub fn load_into(&self, ui: &UiDescriptor, host: &View) -> Result<LoadedUi, LoadError> {
        self.load(ui, Some(host))
    }

    fn load(&self, ui: &UiDescriptor, host: Option<&View>) -> Result<LoadedUi, LoadError> {
        let mut nodes = Vec::new();
        self.build_node(&ui.root, None, &mut nodes)?;

        let mut skipped = Vec::new();
        for index in 0..nodes.len() {
            for binding in &nodes[index].bindings {
                let widget = Rc::clone(&nodes[index].widget);
                let form = nearest_form(&nodes, index);
                let view = match (&form, host) {
                    (Some(form), _) => Some(form.view()),
                    (None, Some(host)) => Some(host),
                    (None, None) => None,
                };
                let Some(view) = view else {
                    if self.options.strict {
                        return Err(LoadError::MissingView {
                            class: widget.class_name().to_owned(),
                            property: binding.property.clone(),
                            path: binding.path.clone(),
                        });
                    }
                    error!(
                        class = widget.class_name(),
                        property = %binding.property,
                        path = %binding.path,
                        "no view found for binding; skipped"
                    );
                    skipped.push(SkippedBinding {
                        class: widget.class_name(),
                        widget_name: nodes[index].name.clone(),
                        binding: binding.clone(),
                    });
                    continue;
                };
                view.bind(
                    binding.path.as_str(),
                    widget,
                    binding.property.as_str(),
                    binding.mode.into(),
                )?;
            }
        }

        let named = nodes
            .iter()
            .filter_map(|n| n.name.clone().map(|name| (name, Rc::clone(&n.widget))))
            .collect();
        let root = Rc::clone(&nodes[0].widget);
        debug!(widgets = nodes.len(), skipped = skipped.len(), "ui loaded");
        Ok(LoadedUi {
            root,
            named,
            skipped,
        })
    }

    fn build_node(
        &self,
        desc: &WidgetDescriptor,
        parent: Option<usize>,
        nodes: &mut Vec<Node>,
    ) -> Result<(), LoadError> {
        let widget = self.create(&desc.class)?;
        for (property, literal) in &desc.properties {
            widget
                .write_property(property, literal.clone().into())
                .map_err(|source| LoadError::InvalidProperty {
                    class: desc.class.clone(),
                    property: property.clone(),
                    source,
                })?;
        }

        let container = as_container(&widget);
        if !desc.children.is_empty() && container.is_none() {
            return Err(LoadError::NotAContainer {
                class: desc.class.clone(),
            });
        }

        let index = nodes.len();
        nodes.push(Node {
            widget,
            parent,
            name: desc.name.clone(),
            bindings: desc.bindings.clone(),
        });

        for child in &desc.children {
            let child_index = nodes.len();
            self.build_node(child, Some(index), nodes)?;
            if let Some(container) = &container {
                container.add_child(Rc::clone(&nodes[child_index].widget));
            }
        }
        Ok(())
    }

    fn create(&self, class: &str) -> Result<Rc<dyn Widget>, LoadError> {
        if let Some(factory) = self.factories.get(class) {
            return Ok(factory());
        }
        let widget: Rc<dyn Widget> = match class {
            "LineEdit" => LineEdit::new(),
            "TextEdit" => TextEdit::new(),
            "Label" => Label::new(),
            "CheckBox" => CheckBox::new(),
            "SpinBox" => SpinBox::new(),
            "ListView" => ListView::new(),
            "Form" => Form::new(),
            "Panel" => Panel::new(),
            other => return Err(LoadError::UnknownClass(other.to_owned())),
        };
        Ok(widget)
    }
}

fn as_container(widget: &Rc<dyn Widget>) -> Option<Rc<dyn Container>> {
    if let Some(form) = crate::downcast::<Form>(widget) {
        return Some(form as Rc<dyn Container>);
    }
    crate::downcast::<Panel>(widget).map(|panel| panel as Rc<dyn Container>)
}

fn nearest_form(nodes: &[Node], start: usize) -> Option<Rc<Form>> {
    let mut cursor = Some(start);
    while let Some(index) = cursor {
        if let Some(form) = crate::downcast::<Form>(&nodes[index].widget) {
            return Some(form);
        }
        cursor = nodes[index].parent;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_mode_names() {
        let b: BindingDescriptor =
            serde_json::from_str(r#"{"property":"text","path":"name","mode":"READ"}"#).unwrap();
        assert_eq!(b.mode, BindMode::Read);
        let b: BindingDescriptor =
            serde_json::from_str(r#"{"property":"text","path":"name"}"#).unwrap();
        assert_eq!(BindFlags::from(b.mode), BindFlags::READ_WRITE);
        assert!(
            serde_json::from_str::<BindingDescriptor>(
                r#"{"property":"text","path":"name","mode":"BOTH"}"#
            )
            .is_err()
        );
    }

    #[test]
    fn literals_are_untagged() {
        let props: BTreeMap<String, LiteralValue> =
            serde_json::from_str(r#"{"a":true,"b":3,"c":1.5,"d":"x"}"#).unwrap();
        assert_eq!(Value::from(props["a"].clone()), Value::Bool(true));
        assert_eq!(Value::from(props["b"].clone()), Value::Int(3));
        assert_eq!(Value::from(props["c"].clone()), Value::Float(1.5));
        assert_eq!(Value::from(props["d"].clone()), Value::from("x"));
    }

    #[test]
    fn options_default_to_lenient() {
        let options: LoaderOptions = toml::from_str("").unwrap();
        assert!(!options.strict);
        let options: LoaderOptions = toml::from_str("strict = true").unwrap();
        assert!(options.strict);
    }
}
