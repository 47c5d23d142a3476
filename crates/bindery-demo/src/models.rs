#![forbid(unsafe_code)]

//! Plain data for the example: no notification, no UI knowledge.

use bindery::runtime::{Shared, shared};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub family_name: String,
}

impl Person {
    pub fn new(name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            family_name: family_name.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Group {
    pub people: Shared<Vec<Shared<Person>>>,
    pub leader: Option<Shared<Person>>,
}

impl Group {
    pub fn new(people: impl IntoIterator<Item = Person>) -> Self {
        Self {
            people: shared(people.into_iter().map(shared).collect()),
            leader: None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.people.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.borrow().is_empty()
    }
}
