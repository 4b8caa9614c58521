use maud::{Markup, html};

use crate::db::{ColumnInfo, DatabaseEntry, Row, TableEntry};

/// Which registry a listing belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Databases,
    Tables,
    Columns,
    Rows,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::Databases => "Databases",
            Section::Tables => "Tables",
            Section::Columns => "Columns",
            Section::Rows => "Rows",
        }
    }

    fn base(self) -> &'static str {
        match self {
            Section::Databases => "/databases",
            Section::Tables => "/tables",
            Section::Columns => "/columns",
            Section::Rows => "/rows",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Section::Databases => "new database name",
            Section::Tables => "new table name",
            Section::Columns => "new column name",
            Section::Rows => "name",
        }
    }

    fn select_href(self, key: &str) -> Option<String> {
        match self {
            Section::Databases | Section::Tables => {
                Some(format!("{}/select/{}", self.base(), super::encode(key)))
            }
            Section::Columns | Section::Rows => None,
        }
    }
}

/// One line of a listing: `key` addresses it in URLs, `label` is shown and
/// edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub key: String,
    pub label: String,
    pub detail: Option<String>,
}

impl From<&DatabaseEntry> for Item {
    fn from(entry: &DatabaseEntry) -> Self {
        Self {
            key: entry.name.clone(),
            label: entry.name.clone(),
            detail: None,
        }
    }
}

impl From<&TableEntry> for Item {
    fn from(entry: &TableEntry) -> Self {
        Self {
            key: entry.name.clone(),
            label: entry.name.clone(),
            detail: None,
        }
    }
}

impl From<&ColumnInfo> for Item {
    fn from(col: &ColumnInfo) -> Self {
        let mut detail = if col.decl_type.is_empty() {
            "untyped".to_string()
        } else {
            col.decl_type.clone()
        };
        if col.is_primary_key() {
            detail.push_str(", primary key");
        }
        Self {
            key: col.cid.to_string(),
            label: col.name.clone(),
            detail: Some(detail),
        }
    }
}

impl From<&Row> for Item {
    fn from(row: &Row) -> Self {
        Self {
            key: row.id.to_string(),
            label: row.name.clone().unwrap_or_default(),
            detail: Some(format!("#{}", row.id)),
        }
    }
}

/// Page body: the add form followed by the list itself.
pub fn listing(section: Section, items: &[Item]) -> Markup {
    html! {
        form hx-post=(format!("{}/add", section.base())) hx-target="#item-list" hx-swap="innerHTML" {
            input type="text" name="name" placeholder=(section.placeholder()) required;
            " "
            button type="submit" { "Add" }
        }
        ul id="item-list" {
            (items_fragment(section, items))
        }
    }
}

/// The contents of `#item-list`, returned on its own to htmx.
pub fn items_fragment(section: Section, items: &[Item]) -> Markup {
    html! {
        @if items.is_empty() {
            li.empty { "Nothing here yet." }
        }
        @for item in items {
            (item_line(section, item))
        }
    }
}

fn item_line(section: Section, item: &Item) -> Markup {
    let base = section.base();
    let key = super::encode(&item.key);
    html! {
        li {
            @if let Some(href) = section.select_href(&item.key) {
                a href=(href) { (item.label) }
            } @else {
                span { (item.label) }
            }
            @if let Some(detail) = &item.detail {
                small { (detail) }
            }
            button hx-get=(format!("{base}/edit/{key}")) hx-target="closest li" hx-swap="outerHTML" {
                "Edit"
            }
            button hx-delete=(format!("{base}/delete/{key}"))
                hx-target="#item-list"
                hx-confirm=(format!("Delete {}?", item.label)) {
                "Delete"
            }
        }
    }
}

/// Inline rename/edit form replacing one list line.
pub fn edit_form(section: Section, item: &Item) -> Markup {
    let base = section.base();
    let key = super::encode(&item.key);
    html! {
        li {
            form hx-put=(format!("{base}/update/{key}")) hx-target="#item-list" {
                input type="text" name="name" value=(item.label) required;
                " "
                button type="submit" { "Save" }
                " "
                a href=(format!("{base}/")) { "Cancel" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: &str, label: &str) -> Item {
        Item {
            key: key.to_string(),
            label: label.to_string(),
            detail: None,
        }
    }

    #[test]
    fn labels_are_escaped() {
        let html = items_fragment(Section::Rows, &[item("1", "<script>")]).into_string();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn databases_and_tables_link_to_select() {
        let html = items_fragment(Section::Databases, &[item("shop.sqlite", "shop.sqlite")])
            .into_string();
        assert!(html.contains(r#"href="/databases/select/shop.sqlite""#));
        assert!(html.contains(r#"hx-delete="/databases/delete/shop.sqlite""#));

        let html = items_fragment(Section::Columns, &[item("2", "price")]).into_string();
        assert!(!html.contains("/select/"));
        assert!(html.contains(r#"hx-get="/columns/edit/2""#));
    }

    #[test]
    fn keys_are_encoded_as_path_segments() {
        let html = items_fragment(Section::Tables, &[item("my table", "my table")]).into_string();
        assert!(html.contains(r#"href="/tables/select/my%20table""#));
        assert!(html.contains(r#"hx-delete="/tables/delete/my%20table""#));
        assert!(html.contains(">my table</a>"));
    }

    #[test]
    fn empty_listing_says_so() {
        let html = listing(Section::Tables, &[]).into_string();
        assert!(html.contains("Nothing here yet."));
        assert!(html.contains(r#"hx-post="/tables/add""#));
    }
}
