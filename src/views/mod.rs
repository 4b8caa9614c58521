//! HTML rendering with `maud`.
//!
//! Full pages wrap a body in [`layout::page`]; htmx requests get the bare
//! fragment that replaces `#item-list`.

pub mod data_entry;
pub mod layout;
pub mod listing;

use axum::response::Html;
use maud::Markup;
use std::borrow::Cow;

use crate::middleware::{Htmx, Selection};
pub use listing::{Item, Section};

/// Percent-encode a name for use as one URL path segment.
pub fn encode(name: &str) -> Cow<'_, str> {
    urlencoding::encode(name)
}

pub fn data_list_href(table: &str) -> String {
    format!("/data-list/{}", encode(table))
}

pub fn data_entry_href(table: &str) -> String {
    format!("/data-entry/{}", encode(table))
}

pub fn html(markup: Markup) -> Html<String> {
    Html(markup.into_string())
}

/// A section's list as a full page, or as the fragment htmx asked for.
pub fn section_listing(
    htmx: Htmx,
    section: Section,
    selection: &Selection,
    items: &[Item],
) -> Html<String> {
    if htmx.wants_fragment() {
        html(listing::items_fragment(section, items))
    } else {
        html(layout::page(
            section.title(),
            selection,
            listing::listing(section, items),
        ))
    }
}

pub fn items_fragment(section: Section, items: &[Item]) -> Html<String> {
    html(listing::items_fragment(section, items))
}

pub fn edit_form(section: Section, item: &Item) -> Html<String> {
    html(listing::edit_form(section, item))
}
