//! HTML snippets served by the gateway.

use eamquery_transcode::sink::html_escape;

/// Inline error marker shown in place of a result table.
pub fn error_fragment(message: &str) -> String {
    format!(
        "<span style='color:red;font-weight:bold;'>{}</span>",
        html_escape(message)
    )
}

/// Query form page.
///
/// "Run" posts the form to `/run` with HTMX and swaps the returned fragment
/// into `#result`. "Download CSV" submits the form natively to `/csv` so the
/// browser saves the attachment.
pub fn index_page(sample_rows: u32) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>EAM Query</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <style>
        body {{ font-family: sans-serif; margin: 2rem; }}
        form {{ display: grid; gap: 0.5rem; max-width: 48rem; }}
        textarea {{ min-height: 8rem; font-family: monospace; }}
        .data-table {{ border-collapse: collapse; margin-top: 1rem; }}
        .data-table th, .data-table td {{ border: 1px solid #ccc; padding: 0.25rem 0.5rem; }}
        .htmx-indicator {{ display: none; }}
        .htmx-request .htmx-indicator {{ display: inline; }}
    </style>
</head>
<body>
    <h1>EAM Query</h1>
    <form id="query-form" method="post" action="/run">
        <input name="username" placeholder="Username" required>
        <input name="password" type="password" placeholder="Password" required>
        <input name="tenant" placeholder="Tenant" required>
        <label><input type="hidden" name="sample" value="false"><input type="checkbox" name="sample" value="true" checked> Sample ({sample} rows)</label>
        <textarea name="query" placeholder="SELECT ..." required></textarea>
        <div>
            <button type="button" hx-post="/run" hx-include="closest form" hx-target="#result" hx-indicator="#spinner">Run</button>
            <button type="submit" formaction="/csv">Download CSV</button>
            <span id="spinner" class="htmx-indicator">Running…</span>
        </div>
    </form>
    <div id="result"></div>
</body>
</html>"##,
        sample = sample_rows,
    )
}
