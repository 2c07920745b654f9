//! HTML pages for the browser upload form.

use crate::transform::header::{DESCRIPTION_COLUMNS, REQUIRED_COLUMNS};
use crate::transform::TransformStats;

const STYLE: &str = "body{font-family:sans-serif;max-width:640px;margin:40px auto;padding:0 16px}\
form{border:1px dashed #888;padding:24px;border-radius:8px}\
.download{display:inline-block;margin-top:16px;padding:10px 18px;background:#1a7f37;color:#fff;text-decoration:none;border-radius:6px}\
.stats{color:#555}";

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>WERS Sequencer</title>\n<style>{}</style>\n</head>\n<body>\n\
         <h1>WERS Sequencer</h1>\n{}\n</body>\n</html>\n",
        STYLE, body
    )
}

fn upload_form() -> &'static str {
    "<form method=\"post\" action=\"/\" enctype=\"multipart/form-data\">\n\
     <p>Select an Excel file (.xlsx or .xls) to assign sequence numbers and marketing groups.</p>\n\
     <input type=\"file\" name=\"file\" accept=\".xlsx,.xls\" required>\n\
     <button type=\"submit\">Process</button>\n\
     </form>"
}

/// Upload form.
pub fn index_page() -> String {
    layout(upload_form())
}

/// Form plus a download link for the processed file.
pub fn download_page(output_file: &str, download_url: &str, stats: &TransformStats) -> String {
    let body = format!(
        "{}\n<p class=\"stats\">Header on row {}; {} of {} rows sequenced across {} WERS codes \
         (description column: {}).</p>\n<a class=\"download\" href=\"{}\">Download {}</a>",
        upload_form(),
        stats.header_row,
        stats.updated_rows,
        stats.data_rows,
        stats.described_codes,
        escape_html(&stats.description_column),
        escape_html(download_url),
        escape_html(output_file),
    );
    layout(&body)
}

/// Error block shown when processing fails.
pub fn error_page(message: &str) -> String {
    let required = REQUIRED_COLUMNS
        .iter()
        .map(|c| format!("'{}'", c))
        .collect::<Vec<_>>()
        .join(", ");
    let description = DESCRIPTION_COLUMNS
        .iter()
        .map(|c| format!("'{}'", c))
        .collect::<Vec<_>>()
        .join(" or ");

    let body = format!(
        "<div style='color: red; padding: 20px;'>\n<h2>Error processing file:</h2>\n<p>{}</p>\n\
         <p>Please make sure your Excel file has the required columns: {} and {}</p>\n</div>\n\
         <p><a href=\"/\">Try another file</a></p>",
        escape_html(message),
        escape_html(&required),
        escape_html(&description),
    );
    layout(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>'a' & \"b\"</b>"),
            "&lt;b&gt;&#x27;a&#x27; &amp; &quot;b&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_index_has_form() {
        let html = index_page();
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("name=\"file\""));
    }

    #[test]
    fn test_download_page() {
        let stats = TransformStats {
            header_row: 3,
            data_rows: 3,
            updated_rows: 2,
            skipped_rows: 1,
            described_codes: 2,
            description_column: "Short Description".into(),
        };
        let html = download_page("processed_a.xlsx", "/download/processed_a.xlsx", &stats);
        assert!(html.contains("href=\"/download/processed_a.xlsx\""));
        assert!(html.contains("2 of 3 rows"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = error_page("bad <script>");
        assert!(html.contains("bad &lt;script&gt;"));
        assert!(html.contains("&#x27;Top Family WERS Code&#x27;"));
    }
}
