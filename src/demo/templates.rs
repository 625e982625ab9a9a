//! HTML fragment rendering for the HTMX demo.
//!
//! Every fragment is a pure function of its data. `maud` escapes all
//! interpolated values.

use maud::{html, Markup};

use crate::demo::people::Person;
use crate::demo::quotes::Quote;

/// Which popover a fragment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popover {
    Add,
    Edit,
}

impl Popover {
    /// Parse the `{kind}` path segment. Anything but `edit` is the add popover.
    pub fn from_kind(kind: &str) -> Self {
        if kind == "edit" {
            Popover::Edit
        } else {
            Popover::Add
        }
    }

    pub fn element_id(self) -> &'static str {
        match self {
            Popover::Add => "add-popover",
            Popover::Edit => "edit-popover",
        }
    }

    fn kind(self) -> &'static str {
        match self {
            Popover::Add => "add",
            Popover::Edit => "edit",
        }
    }
}

/// A renderable fragment and the data it needs.
#[derive(Debug, Clone, Copy)]
pub enum Fragment<'a> {
    Quote(&'a Quote),
    PeopleRows(&'a [Person]),
    AddForm,
    EditForm(&'a Person),
    Created(&'a Person),
    Updated(&'a Person),
    Deleted(&'a str),
    EmptyPopover(Popover),
    EditNotFound,
    RowNotFound,
}

impl Fragment<'_> {
    pub fn render(&self) -> Markup {
        match *self {
            Fragment::Quote(quote) => render_quote(quote),
            Fragment::PeopleRows(people) => html! {
                @for person in people {
                    (render_row(person))
                }
            },
            Fragment::AddForm => render_add_form(),
            Fragment::EditForm(person) => render_edit_form(person),
            Fragment::Created(person) => html! {
                (render_row(person))
                (render_toast(&person.name, "ble lagt til!"))
                (render_oob_clear(Popover::Add))
            },
            Fragment::Updated(person) => html! {
                (render_row(person))
                (render_toast(&person.name, "ble oppdatert!"))
                (render_oob_clear(Popover::Edit))
            },
            Fragment::Deleted(name) => html! {
                template {}
                (render_toast(name, "ble slettet!"))
            },
            Fragment::EmptyPopover(popover) => html! {
                div id=(popover.element_id()) {}
            },
            Fragment::EditNotFound => html! {
                p { "Person ikke funnet" }
            },
            Fragment::RowNotFound => html! {
                tr { td colspan="4" { "Person ikke funnet" } }
            },
        }
    }
}

fn render_quote(quote: &Quote) -> Markup {
    html! {
        div {
            p style="font-size: 1.3rem; font-style: italic; margin-bottom: 0.5rem;" {
                "\"" (quote.text) "\""
            }
            p style="color: #6b7280; text-align: right;" {
                "— " (quote.author)
            }
        }
    }
}

fn render_row(person: &Person) -> Markup {
    let id = person.id;
    html! {
        tr id={ "person-" (id) } {
            td { (person.name) }
            td { (person.email) }
            td { (person.role) }
            td class="actions" {
                button
                    class="btn-edit"
                    hx-get={ "/api/people/" (id) "/edit" }
                    hx-target="#edit-popover"
                    hx-swap="innerHTML"
                {
                    "Rediger"
                }
                button
                    class="btn-delete"
                    hx-delete={ "/api/people/" (id) }
                    hx-target={ "#person-" (id) }
                    hx-swap="outerHTML swap:0.3s"
                {
                    "Slett"
                }
            }
        }
    }
}

fn render_toast(name: &str, message: &str) -> Markup {
    html! {
        div hx-swap-oob="beforeend:#toast-container" {
            div class="toast success" {
                strong { (name) } " " (message)
            }
        }
    }
}

fn render_oob_clear(popover: Popover) -> Markup {
    html! {
        div id=(popover.element_id()) hx-swap-oob="outerHTML" {}
    }
}

fn form_field(label: &str, input_type: &str, name: &str, value: Option<&str>) -> Markup {
    html! {
        div class="form-group" {
            label { (label) ":" }
            input type=(input_type) name=(name) value=[value] required;
        }
    }
}

fn form_actions(submit: &str, popover: Popover) -> Markup {
    html! {
        div class="form-actions" {
            button type="submit" class="btn-save" { (submit) }
            button
                type="button"
                class="btn-cancel"
                hx-get={ "/api/close-popover/" (popover.kind()) }
                hx-target={ "#" (popover.element_id()) }
                hx-swap="outerHTML"
            {
                "Avbryt"
            }
        }
    }
}

fn render_add_form() -> Markup {
    html! {
        div class="popover-content" {
            h3 { "Legg til person" }
            form hx-post="/api/people" hx-target="#people-list" hx-swap="beforeend" {
                (form_field("Navn", "text", "name", None))
                (form_field("E-post", "email", "email", None))
                (form_field("Rolle", "text", "role", None))
                (form_actions("Legg til", Popover::Add))
            }
        }
    }
}

fn render_edit_form(person: &Person) -> Markup {
    let id = person.id;
    html! {
        div class="popover-content" {
            h3 { "Rediger " (person.name) }
            form hx-put={ "/api/people/" (id) } hx-target={ "#person-" (id) } hx-swap="outerHTML" {
                (form_field("Navn", "text", "name", Some(&person.name)))
                (form_field("E-post", "email", "email", Some(&person.email)))
                (form_field("Rolle", "text", "role", Some(&person.role)))
                (form_actions("Lagre", Popover::Edit))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Person {
        Person {
            id: 7,
            name: "Ada <Lovelace>".into(),
            email: "ada@example.com".into(),
            role: "Analyst".into(),
        }
    }

    fn render(fragment: Fragment<'_>) -> String {
        fragment.render().into_string()
    }

    #[test]
    fn interpolated_values_are_escaped() {
        let mut hostile = person();
        hostile.name = r#"<script>"x" & y</script>"#.into();
        let html = render(Fragment::PeopleRows(&[hostile]));
        assert!(html.contains("<td>&lt;script&gt;&quot;x&quot; &amp; y&lt;/script&gt;</td>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn row_contains_id_and_escaped_fields() {
        let html = render(Fragment::PeopleRows(&[person()]));
        assert!(html.starts_with(r#"<tr id="person-7">"#));
        assert!(html.contains("<td>Ada &lt;Lovelace&gt;</td>"));
        assert!(html.contains(r#"hx-get="/api/people/7/edit""#));
        assert!(html.contains(r##"hx-target="#person-7""##));
    }

    #[test]
    fn created_fragment_has_toast_and_clears_add_popover() {
        let html = render(Fragment::Created(&person()));
        assert!(html.contains("<strong>Ada &lt;Lovelace&gt;</strong> ble lagt til!"));
        assert!(html.ends_with(r#"<div id="add-popover" hx-swap-oob="outerHTML"></div>"#));
    }

    #[test]
    fn updated_fragment_clears_edit_popover() {
        let html = render(Fragment::Updated(&person()));
        assert!(html.contains("ble oppdatert!"));
        assert!(html.ends_with(r#"<div id="edit-popover" hx-swap-oob="outerHTML"></div>"#));
    }

    #[test]
    fn edit_form_prefills_values() {
        let html = render(Fragment::EditForm(&person()));
        assert!(html.contains("<h3>Rediger Ada &lt;Lovelace&gt;</h3>"));
        assert!(html.contains(r#"hx-put="/api/people/7""#));
        assert!(html.contains(r#"name="email" value="ada@example.com" required"#));
        assert!(html.contains(r##"hx-target="#edit-popover""##));
    }

    #[test]
    fn add_form_has_empty_fields() {
        let html = render(Fragment::AddForm);
        assert!(html.contains(r#"hx-post="/api/people""#));
        assert!(html.contains(r#"<input type="text" name="name" required>"#));
        assert!(html.contains("/api/close-popover/add"));
    }

    #[test]
    fn popover_kind_mapping() {
        assert_eq!(
            render(Fragment::EmptyPopover(Popover::from_kind("edit"))),
            r#"<div id="edit-popover"></div>"#
        );
        assert_eq!(
            render(Fragment::EmptyPopover(Popover::from_kind("other"))),
            r#"<div id="add-popover"></div>"#
        );
    }

    #[test]
    fn deleted_fragment() {
        let html = render(Fragment::Deleted("Per"));
        assert!(html.starts_with("<template></template>"));
        assert!(html.contains("<strong>Per</strong> ble slettet!"));
    }

    #[test]
    fn not_found_fragments() {
        assert_eq!(render(Fragment::EditNotFound), "<p>Person ikke funnet</p>");
        assert_eq!(
            render(Fragment::RowNotFound),
            r#"<tr><td colspan="4">Person ikke funnet</td></tr>"#
        );
    }

    #[test]
    fn quote_fragment() {
        let quote = Quote { text: "a < b", author: "me" };
        let html = render(Fragment::Quote(&quote));
        assert!(html.contains("&quot;a &lt; b&quot;"));
        assert!(html.contains("— me"));
    }
}
