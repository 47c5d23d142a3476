#![forbid(unsafe_code)]

//! Headless walk-through of the person/group example.
//!
//! Set `RUST_LOG=bindery_runtime=trace` to watch every propagation.

use std::error::Error;
use std::process::ExitCode;
use std::rc::Rc;
use std::thread;

use bindery::core::ObjectRef;
use bindery_demo::models::{Group, Person};
use bindery_demo::viewmodels::{CommentModel, GroupViewModel};
use bindery_demo::views::{CommentForm, GroupView};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

fn group_walkthrough() -> Result<(), Box<dyn Error>> {
    let vm = GroupViewModel::new(
        "Group Name",
        Group::new([
            Person::new("A", "B"),
            Person::new("C", "D"),
            Person::new("E", "F"),
        ]),
    );
    let view = GroupView::new()?;
    view.set_context(ObjectRef::new(Rc::clone(&vm)))?;
    info!(title = %view.title(), rows = ?view.list().rows(), "group view ready");

    view.select(1)?;
    let details = view.details();
    info!(
        name = %details.name_edit().text(),
        family_name = %details.family_name_edit().text(),
        "details follow the selection"
    );

    details.name_edit().edit("Carl")?;
    info!(rows = ?view.list().rows(), "edit reached the model and the list");

    vm.add_new_person()?;
    details.family_name_edit().edit("New")?;
    info!(
        rows = ?view.list().rows(),
        people = vm.group().borrow().len(),
        "person appended"
    );
    Ok(())
}

fn comment_walkthrough() -> Result<(), Box<dyn Error>> {
    let model = CommentModel::new("Example value");
    let form = CommentForm::load()?;
    form.set_context(ObjectRef::new(Rc::clone(&model)))?;

    let feed = model.feed();
    let worker = thread::spawn(move || feed.replace("Typed on another thread"));
    if worker.join().is_err() {
        return Err("comment worker panicked".into());
    }
    let delivered = model.pump()?;

    let comment = form
        .comment_edit()
        .map(|edit| edit.plain_text())
        .unwrap_or_default();
    info!(delivered, %comment, "queued change delivered");
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    for (name, step) in [
        ("group", group_walkthrough as fn() -> Result<(), Box<dyn Error>>),
        ("comment", comment_walkthrough),
    ] {
        if let Err(err) = step() {
            error!(step = name, error = %err, "walk-through failed");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
