//! Self-contained HTML report.

use super::export::ExportContext;
use crate::labels::{Heading, Labels};
use crate::types::Entry;
use std::fmt::Write;

const STYLESHEET: &str = r#"th,td {
        text-align: left;
        font-weight: normal;
        padding: 0.75rem;
      }
      thead {
        background-color: #212529;
        color: #fff;
      }
      body td {
        border-top: 1px solid #dee2e6;
      }
      body {
        color: #212529;
        font-family: sans;
        margin-left: 20px;
      }
      table {
        border: none;
      }
      tbody tr:nth-child(odd) {
        background-color: rgba(0,0,0,.05);
      }
      h2 {
        font-weight: normal;
        font-size: 2rem;
        margin: .5rem 0;
      }"#;

/// Render entries as an HTML document, one table row per entry, in order
pub fn render_html(entries: &[Entry], ctx: &ExportContext<'_>, labels: &dyn Labels) -> String {
    let mut rows = String::new();
    for entry in entries {
        // Writing to a String cannot fail
        let _ = write!(
            rows,
            "\n        <tr>\n          <td>{}</td>\n          <td>{}</td>\n          <td>{}</td>\n        </tr>",
            html_escape(&labels.module_name(&entry.module)),
            html_escape(labels.level_name(entry.level)),
            html_escape(&entry.message),
        );
    }

    let domain = html_escape(&ctx.ascii_domain);

    format!(
        r#"<!doctype html>
<html lang="{lang}">
  <head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0, shrink-to-fit=no">
    <title>{domain} • Zonemaster Test Result</title>
    <style>
      {style}
    </style>
  </head>
  <body>
    <header>
      <h2>{domain}</h2><i>{created}</i>
    </header>
    <table cellspacing="0" cellpadding="0">
      <thead>
        <tr>
          <th scope="col">{h_module}</th>
          <th scope="col">{h_level}</th>
          <th scope="col">{h_message}</th>
        </tr>
      </thead>
      <tbody>{rows}
      </tbody>
    </table>
  </body>
</html>
"#,
        lang = html_escape(ctx.language),
        style = STYLESHEET,
        created = html_escape(&ctx.formatted_created_at()),
        h_module = html_escape(labels.heading(Heading::Module)),
        h_level = html_escape(labels.heading(Heading::Level)),
        h_message = html_escape(labels.heading(Heading::Message)),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
