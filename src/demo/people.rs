//! In-memory people store.
//!
//! Records live for the process lifetime. Identifiers come from a counter
//! that is never rewound, so a deleted id is never handed out again.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// A stored person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Fields of a person to be created.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Partial update. Missing or empty fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

struct Inner {
    people: Vec<Person>,
    next_id: u64,
}

/// Key-generating in-memory record store.
pub struct PeopleStore {
    inner: Mutex<Inner>,
}

impl PeopleStore {
    /// An empty store whose first id is 1.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                people: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Store seeded with the demo records (ids 1–3).
    pub fn seeded() -> Self {
        let store = Self::new();
        for (name, email, role) in [
            ("Ole Nordmann", "ole@example.com", "Utvikler"),
            ("Kari Hansen", "kari@example.com", "Designer"),
            ("Per Jensen", "per@example.com", "Produkteier"),
        ] {
            store.insert(NewPerson {
                name: name.into(),
                email: email.into(),
                role: role.into(),
            });
        }
        store
    }

    /// All records in insertion order.
    pub fn list(&self) -> Vec<Person> {
        self.lock().people.clone()
    }

    pub fn get(&self, id: u64) -> Option<Person> {
        self.lock().people.iter().find(|p| p.id == id).cloned()
    }

    /// Insert a record, assigning the next id.
    pub fn insert(&self, new: NewPerson) -> Person {
        let mut inner = self.lock();
        let person = Person {
            id: inner.next_id,
            name: new.name,
            email: new.email,
            role: new.role,
        };
        inner.next_id += 1;
        inner.people.push(person.clone());
        person
    }

    /// Apply a partial update. `None` if no record has `id`.
    pub fn update(&self, id: u64, patch: PersonPatch) -> Option<Person> {
        let mut inner = self.lock();
        let person = inner.people.iter_mut().find(|p| p.id == id)?;

        apply(&mut person.name, patch.name);
        apply(&mut person.email, patch.email);
        apply(&mut person.role, patch.role);
        Some(person.clone())
    }

    /// Remove a record. `None` if no record has `id`.
    pub fn delete(&self, id: u64) -> Option<Person> {
        let mut inner = self.lock();
        let index = inner.people.iter().position(|p| p.id == id)?;
        Some(inner.people.remove(index))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("people store mutex poisoned")
    }
}

impl Default for PeopleStore {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(field: &mut String, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        *field = value;
    }
}
