use maud::{Markup, html};

use crate::db::{ColumnInfo, Record};

/// A form with one text input per field; posts back to `action`.
pub fn entry_form(table: &str, action: &str, fields: &[(&str, Option<&str>)]) -> Markup {
    html! {
        form method="post" action=(action) {
            @for (name, value) in fields {
                p {
                    label {
                        (*name)
                        br;
                        input type="text" name=(*name) value=[*value];
                    }
                }
            }
            @if fields.is_empty() {
                p { "This table only has an id column." }
            }
            button type="submit" { "Save" }
            " "
            a href=(super::data_list_href(table)) { "Back to list" }
        }
    }
}

pub fn record_table(table: &str, columns: &[ColumnInfo], records: &[Record]) -> Markup {
    let segment = super::encode(table);
    html! {
        p { a href=(super::data_entry_href(table)) { "New record" } }
        table {
            thead {
                tr {
                    @for col in columns { th { (col.name) } }
                    th { "Actions" }
                }
            }
            tbody {
                @for record in records {
                    tr {
                        @for value in &record.values {
                            @match value {
                                Some(v) => td { (v) },
                                None => td.null { "NULL" },
                            }
                        }
                        td {
                            @if let Some(id) = record.id {
                                a href=(format!("/data-edit/{segment}/{id}")) { "Edit" }
                                " "
                                form method="post" action=(format!("/data-delete/{segment}/{id}")) style="display:inline" {
                                    button type="submit" { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        }
        @if records.is_empty() {
            p { "No records yet." }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_prefills_values() {
        let html = entry_form("items", "/data-edit/items/1", &[("name", Some("widget")), ("price", None)])
            .into_string();
        assert!(html.contains(r#"name="name" value="widget""#));
        assert!(html.contains(r#"name="price">"#));
        assert!(html.contains(r#"action="/data-edit/items/1""#));
    }

    #[test]
    fn nulls_are_marked() {
        let columns = vec![ColumnInfo {
            cid: 0,
            name: "note".into(),
            decl_type: "TEXT".into(),
            pk: 0,
        }];
        let records = vec![Record {
            id: None,
            values: vec![None],
        }];
        let html = record_table("t", &columns, &records).into_string();
        assert!(html.contains(r#"<td class="null">NULL</td>"#));
        assert!(!html.contains("/data-delete/"));
    }
}
