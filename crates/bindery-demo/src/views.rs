#![forbid(unsafe_code)]

//! Views for the example, assembled from reference widgets.

use std::rc::{Rc, Weak};

use bindery::core::{BindResult, ListenerId, Value, Widget};
use bindery::runtime::{BindFlags, View};
use bindery::widgets::{
    Container, Form, Label, LineEdit, ListView, LoadError, LoadedUi, TextEdit, UiDescriptor,
    UiLoader,
};
use tracing::debug;

use crate::viewmodels::GroupViewModel;

fn caption(text: &str) -> Rc<Label> {
    let label = Label::new();
    label.set_text(text);
    label
}

/// Edits one person's name and family name.
pub struct PersonView {
    form: Rc<Form>,
    name: Rc<LineEdit>,
    family_name: Rc<LineEdit>,
}

impl PersonView {
    pub fn new() -> BindResult<Self> {
        let form = Form::new();
        let name = LineEdit::new();
        let family_name = LineEdit::new();

        form.add_child(caption("Name:"));
        form.add_child(name.clone());
        form.add_child(caption("Family Name:"));
        form.add_child(family_name.clone());

        form.view()
            .bind("name", name.clone(), "text", BindFlags::READ_WRITE)?;
        form.view()
            .bind("family_name", family_name.clone(), "text", BindFlags::READ_WRITE)?;

        Ok(Self {
            form,
            name,
            family_name,
        })
    }

    /// The hosting form; bind to its `context` to drive this view.
    #[must_use]
    pub fn form(&self) -> Rc<Form> {
        Rc::clone(&self.form)
    }

    #[must_use]
    pub fn name_edit(&self) -> &LineEdit {
        &self.name
    }

    #[must_use]
    pub fn family_name_edit(&self) -> &LineEdit {
        &self.family_name
    }

    pub fn set_context(&self, context: impl Into<Value>) -> BindResult<()> {
        self.form.set_context(context)
    }
}

/// People list with a details pane for the selected person.
///
/// Context: a [`GroupViewModel`]. Selecting a row calls
/// [`GroupViewModel::set_current`]; the details pane follows `current`.
pub struct GroupView {
    form: Rc<Form>,
    title: Rc<Label>,
    list: Rc<ListView>,
    details: PersonView,
    selection: Option<ListenerId>,
}

impl GroupView {
    pub fn new() -> BindResult<Self> {
        let form = Form::new();
        let title = Label::new();
        let list = ListView::new();
        let details = PersonView::new()?;

        form.add_child(title.clone());
        form.add_child(list.clone());
        form.add_child(details.form());

        let view = form.view();
        view.bind("name", title.clone(), "text", BindFlags::READ)?;
        view.bind("people", list.clone(), "model", BindFlags::READ)?;
        view.bind("current", details.form(), "context", BindFlags::READ)?;

        let selection = Self::follow_selection(&form, &list);
        Ok(Self {
            form,
            title,
            list,
            details,
            selection,
        })
    }

    fn follow_selection(form: &Rc<Form>, list: &Rc<ListView>) -> Option<ListenerId> {
        let form: Weak<Form> = Rc::downgrade(form);
        let weak_list: Weak<ListView> = Rc::downgrade(list);
        list.signal("currentRowChanged").map(|event| {
            event.connect(move |_| {
                let (Some(form), Some(list)) = (form.upgrade(), weak_list.upgrade()) else {
                    return Ok(());
                };
                let Some(group) = form
                    .context()
                    .as_object()
                    .and_then(|o| o.downcast::<GroupViewModel>())
                else {
                    return Ok(());
                };
                let row = list
                    .current_row()
                    .and_then(|r| i64::try_from(r).ok())
                    .unwrap_or(-1);
                debug!(row, "selection moved");
                group.set_current(row)
            })
        })
    }

    pub fn set_context(&self, context: impl Into<Value>) -> BindResult<()> {
        self.form.set_context(context)
    }

    /// Simulate the user clicking `row` (`-1` clears).
    pub fn select(&self, row: i64) -> BindResult<()> {
        self.list.select(row)
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.title.text()
    }

    #[must_use]
    pub fn list(&self) -> &ListView {
        &self.list
    }

    #[must_use]
    pub fn details(&self) -> &PersonView {
        &self.details
    }

    #[must_use]
    pub fn form(&self) -> Rc<Form> {
        Rc::clone(&self.form)
    }
}

impl Drop for GroupView {
    fn drop(&mut self) {
        if let Some(id) = self.selection
            && let Some(event) = self.list.signal("currentRowChanged")
        {
            event.disconnect(id);
        }
    }
}

/// Declarative description of the comment form.
pub const COMMENT_FORM: &str = include_str!("../ui/comment_form.toml");

/// A host view with the comment form loaded into it.
pub struct CommentForm {
    host: View,
    ui: LoadedUi,
}

impl CommentForm {
    pub fn load() -> Result<Self, LoadError> {
        let descriptor = UiDescriptor::from_toml_str(COMMENT_FORM)?;
        let host = View::new();
        let ui = UiLoader::default().load_into(&descriptor, &host)?;
        Ok(Self { host, ui })
    }

    pub fn set_context(&self, context: impl Into<Value>) -> BindResult<()> {
        self.host.set_context(context)
    }

    #[must_use]
    pub fn host(&self) -> &View {
        &self.host
    }

    #[must_use]
    pub fn name_label(&self) -> Option<Rc<Label>> {
        self.ui.get::<Label>("name")
    }

    #[must_use]
    pub fn comment_edit(&self) -> Option<Rc<TextEdit>> {
        self.ui.get::<TextEdit>("comment")
    }
}
