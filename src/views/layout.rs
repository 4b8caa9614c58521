use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::middleware::Selection;

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@2.0.4";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #fafafa; color: #222; }
header { background: #263238; color: #eceff1; padding: 0.75rem 1.5rem; }
header a { color: #80cbc4; margin-right: 1rem; text-decoration: none; }
header .context { margin: 0.25rem 0 0; font-size: 0.9rem; }
main { max-width: 960px; margin: 1.5rem auto; padding: 0 1.5rem; }
ul#item-list { list-style: none; padding: 0; }
ul#item-list li { display: flex; gap: 0.5rem; align-items: center; padding: 0.4rem 0; border-bottom: 1px solid #ddd; }
ul#item-list li > :first-child { flex: 1; }
table { border-collapse: collapse; width: 100%; }
td, th { border: 1px solid #ddd; padding: 0.3rem 0.5rem; text-align: left; }
.null { color: #999; font-style: italic; }
"#;

/// Full page shell: navigation, current selection, then `body`.
pub fn page(title: &str, selection: &Selection, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " - SQLite Admin" }
                script src=(HTMX_SRC) {}
                style { (PreEscaped(STYLE)) }
            }
            body {
                header {
                    nav {
                        a href="/databases/" { "Databases" }
                        a href="/tables/" { "Tables" }
                        a href="/columns/" { "Columns" }
                        a href="/" { "Rows" }
                        @if let Some(table) = selection.table() {
                            a href=(super::data_list_href(table)) { "Data" }
                        }
                    }
                    p.context {
                        "Database: " strong { (selection.database().unwrap_or("none")) }
                        " | Table: " strong { (selection.table().unwrap_or("none")) }
                    }
                }
                main {
                    h1 { (title) }
                    (body)
                }
            }
        }
    }
}
