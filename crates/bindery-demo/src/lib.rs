#![forbid(unsafe_code)]

//! Person/group example for bindery.
//!
//! - [`models`]: plain `Person` and `Group` data.
//! - [`viewmodels`]: `PersonViewModel`, `GroupViewModel`, and a
//!   `CommentModel` fed from another thread.
//! - [`views`]: `PersonView`, `GroupView`, and a comment form loaded from
//!   `ui/comment_form.toml`.

pub mod models;
pub mod viewmodels;
pub mod views;
