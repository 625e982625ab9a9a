//! Demo API handlers returning HTML fragments.

use std::sync::Arc;

use axum::{
    extract::{FromRequest, Path, Request, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::demo::people::{NewPerson, PeopleStore, PersonPatch};
use crate::demo::quotes::random_quote;
use crate::demo::templates::{Fragment, Popover};
use crate::observability::metrics;

/// State shared by the demo handlers.
#[derive(Clone)]
pub struct DemoState {
    pub people: Arc<PeopleStore>,
}

impl DemoState {
    pub fn seeded() -> Self {
        Self {
            people: Arc::new(PeopleStore::seeded()),
        }
    }
}

/// Body extractor accepting either JSON or a URL-encoded form.
pub struct FormOrJson<T>(pub T);

impl<S, T> FromRequest<S> for FormOrJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(value))
        }
    }
}

fn parse_id(raw: &str) -> Option<u64> {
    raw.parse().ok()
}

fn fragment(status: StatusCode, fragment: Fragment<'_>) -> Response {
    (status, Html(fragment.render().into_string())).into_response()
}

pub async fn get_quote() -> Response {
    metrics::record_request("quote", 200);
    fragment(StatusCode::OK, Fragment::Quote(random_quote()))
}

pub async fn list_people(State(state): State<DemoState>) -> Response {
    let people = state.people.list();
    metrics::record_request("people", 200);
    fragment(StatusCode::OK, Fragment::PeopleRows(&people))
}

pub async fn new_person_form() -> Response {
    fragment(StatusCode::OK, Fragment::AddForm)
}

pub async fn edit_person_form(
    State(state): State<DemoState>,
    Path(id): Path<String>,
) -> Response {
    match parse_id(&id).and_then(|id| state.people.get(id)) {
        Some(person) => fragment(StatusCode::OK, Fragment::EditForm(&person)),
        None => {
            tracing::debug!(id = %id, "Edit requested for unknown person");
            fragment(StatusCode::NOT_FOUND, Fragment::EditNotFound)
        }
    }
}

pub async fn close_popover(Path(kind): Path<String>) -> Response {
    fragment(StatusCode::OK, Fragment::EmptyPopover(Popover::from_kind(&kind)))
}

pub async fn create_person(
    State(state): State<DemoState>,
    FormOrJson(new): FormOrJson<NewPerson>,
) -> Response {
    let person = state.people.insert(new);
    tracing::info!(id = person.id, name = %person.name, "Person added");
    metrics::record_request("people", 200);
    fragment(StatusCode::OK, Fragment::Created(&person))
}

pub async fn update_person(
    State(state): State<DemoState>,
    Path(id): Path<String>,
    FormOrJson(patch): FormOrJson<PersonPatch>,
) -> Response {
    match parse_id(&id).and_then(|id| state.people.update(id, patch)) {
        Some(person) => {
            tracing::info!(id = person.id, "Person updated");
            metrics::record_request("people", 200);
            fragment(StatusCode::OK, Fragment::Updated(&person))
        }
        None => {
            metrics::record_request("people", 404);
            fragment(StatusCode::NOT_FOUND, Fragment::RowNotFound)
        }
    }
}

pub async fn delete_person(
    State(state): State<DemoState>,
    Path(id): Path<String>,
) -> Response {
    let removed = parse_id(&id).and_then(|id| state.people.delete(id));
    let name = removed.as_ref().map_or("Person", |p| p.name.as_str());
    tracing::info!(id = %id, found = removed.is_some(), "Person deleted");
    metrics::record_request("people", 200);
    fragment(StatusCode::OK, Fragment::Deleted(name))
}
