//! Rendering of documents into the clipboard text format
//!
//! The record format is load-bearing: downstream tooling splits the
//! clipboard payload on these exact markers, so each document renders as
//! `File: <path>:\n\n<content>\n\n` with no separator beyond what the
//! record itself carries.

/// Render one document as a clipboard record.
pub fn render_document(path: &str, text: &str) -> String {
    format!("File: {path}:\n\n{text}\n\n")
}

/// Concatenate records for `documents` in iteration order.
///
/// An empty iterator yields the empty string; the caller decides whether
/// that is still worth a clipboard write (it is, for copy-all).
pub fn render_all<'a, I>(documents: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    for (path, text) in documents {
        out.push_str(&render_document(path, text));
    }
    out
}
