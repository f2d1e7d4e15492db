//! HTML rendering of the info table.
//!
//! The styled key/value table that describes the selected feature can be
//! written out as a standalone HTML fragment next to the SVG report.

use crate::items::InfoTable;

const TABLE_STYLE: &str = "<style>
    .container {
        font-family: 'Montserrat', 'Helvetica Neue', Helvetica, Arial, sans-serif;
        font-size: 5px;
        margin: 1px;
    }
    table {
        width: 100%;
        border-collapse: collapse;
        margin-bottom: 10px;
    }
    th, td {
        border: 1px solid #ddd;
        padding: 5px;
        text-align: left;
    }
    th {
        background-color: #f2f2f2;
    }
    tr:nth-child(even) {
        background-color: #f9f9f9;
    }
    td:nth-child(2) {
        font-family: 'Source Code Pro', monospace;
    }
</style>";

/// Render an info table as a styled HTML fragment.
///
/// When the table has no data rows, a single "no data" row stands in for the
/// body so the export never produces a bare header.
pub fn info_table_html(table: &InfoTable) -> String {
    let mut html = String::from(TABLE_STYLE);
    html.push_str("\n<div class=\"container\">\n    <table>\n");
    html.push_str(&format!(
        "        <tr><th>{}</th><th>{}</th></tr>\n",
        escape(&table.header.0),
        escape(&table.header.1)
    ));

    if table.rows.is_empty() {
        html.push_str("        <tr><td colspan=\"2\">No data found.</td></tr>\n");
    } else {
        for (key, value) in &table.rows {
            html.push_str(&format!(
                "        <tr><td>{}</td><td>{}</td></tr>\n",
                escape(key),
                escape(value)
            ));
        }
    }

    html.push_str("    </table>\n</div>\n");
    html
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> InfoTable {
        let mut t = InfoTable::new(("Centro Comercial".into(), "Mall del Sol".into()));
        t.push_row("Área Registrada", "48972.41 m²");
        t.push_row("Centroide (lat, lon)", "-2.189000, -79.890000");
        t
    }

    #[test]
    fn test_table_contents() {
        let html = info_table_html(&table());
        assert!(html.contains("<style>"));
        assert!(html.contains("<th>Centro Comercial</th><th>Mall del Sol</th>"));
        assert!(html.contains("<td>Área Registrada</td><td>48972.41 m²</td>"));
        assert!(html.contains("Source Code Pro"));
    }

    #[test]
    fn test_empty_table_fallback() {
        let t = InfoTable::new(("Centro Comercial".into(), "Mall del Sol".into()));
        let html = info_table_html(&t);
        assert!(html.contains("No data found."));
    }

    #[test]
    fn test_escaping() {
        let mut t = InfoTable::new(("A & B".into(), "<x>".into()));
        t.push_row("k", "1 < 2");
        let html = info_table_html(&t);
        assert!(html.contains("A &amp; B"));
        assert!(html.contains("&lt;x&gt;"));
        assert!(html.contains("1 &lt; 2"));
    }
}
