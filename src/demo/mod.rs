//! HTMX demo API: quotes and an in-memory people list.
//!
//! Every endpoint answers with an HTML fragment meant to be swapped into
//! the page by HTMX.

pub mod handlers;
pub mod people;
pub mod quotes;
pub mod templates;

use axum::{
    routing::{get, put},
    Router,
};

use self::handlers::*;

pub use handlers::DemoState;
pub use people::{NewPerson, PeopleStore, Person, PersonPatch};

pub fn setup_demo_router(state: DemoState) -> Router {
    Router::new()
        .route("/api/quote", get(get_quote))
        .route("/api/people", get(list_people).post(create_person))
        .route("/api/people/new", get(new_person_form))
        .route("/api/people/{id}", put(update_person).delete(delete_person))
        .route("/api/people/{id}/edit", get(edit_person_form))
        .route("/api/close-popover/{kind}", get(close_popover))
        .with_state(state)
}
