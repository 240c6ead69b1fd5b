//! HTML backend for content tree rendering.
//!
//! Produces HTML5 fragments styled by the portal stylesheet. Display and
//! inline equations are emitted between KaTeX auto-render delimiters
//! (`$$…$$` and `$…$`).

use std::fmt::Write;

use crate::backend::RenderBackend;
use crate::block::{ListKind, RichText};
use crate::escape::escape_html;

/// HTML render backend.
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn span(span: &RichText, out: &mut String) {
        if span.equation {
            write!(out, "${}$", escape_html(&span.content)).unwrap();
            return;
        }

        let mut html = escape_html(&span.content).replace('\n', "<br>");
        let a = span.annotations;
        if a.code {
            html = format!("<code>{html}</code>");
        }
        if a.bold {
            html = format!("<strong>{html}</strong>");
        }
        if a.italic {
            html = format!("<em>{html}</em>");
        }
        if a.strikethrough {
            html = format!("<s>{html}</s>");
        }
        if a.underline {
            html = format!("<u>{html}</u>");
        }
        if let Some(href) = &span.href {
            html = format!(r#"<a href="{}">{html}</a>"#, escape_html(href));
        }
        out.push_str(&html);
    }

    fn list(kind: ListKind, items: &[String], out: &mut String) {
        let tag = match kind {
            ListKind::Bulleted => "ul",
            ListKind::Numbered => "ol",
        };
        write!(out, "<{tag}>{}</{tag}>", items.concat()).unwrap();
    }

    fn list_item(inline: &str, children: &str, out: &mut String) {
        write!(out, "<li>{inline}{children}</li>").unwrap();
    }

    fn paragraph(inline: &str, children: &str, out: &mut String) {
        write!(out, "<p>{inline}</p>").unwrap();
        Self::trailing_children(children, out);
    }

    fn heading(level: u8, inline: &str, children: &str, out: &mut String) {
        write!(out, "<h{level}>{inline}</h{level}>").unwrap();
        Self::trailing_children(children, out);
    }

    fn quote(inline: &str, children: &str, out: &mut String) {
        write!(out, "<blockquote>{inline}{children}</blockquote>").unwrap();
    }

    fn callout(icon: Option<&str>, inline: &str, children: &str, out: &mut String) {
        out.push_str(r#"<div class="callout">"#);
        if let Some(icon) = icon {
            write!(out, r#"<span class="callout-icon">{}</span>"#, escape_html(icon)).unwrap();
        }
        write!(out, r#"<div class="callout-content">{inline}{children}</div></div>"#).unwrap();
    }

    fn code_block(language: Option<&str>, source: &str, out: &mut String) {
        out.push_str(r#"<div class="code-block">"#);
        if let Some(lang) = language {
            let lang = escape_html(lang);
            write!(
                out,
                r#"<div class="code-header">{lang}</div><pre><code class="language-{lang}">{}</code></pre>"#,
                escape_html(source)
            )
            .unwrap();
        } else {
            write!(out, "<pre><code>{}</code></pre>", escape_html(source)).unwrap();
        }
        out.push_str("</div>");
    }

    fn table(has_column_header: bool, has_row_header: bool, rows: &[Vec<String>], out: &mut String) {
        out.push_str(r#"<div class="table-wrapper"><table class="notion-table">"#);
        for (row_index, row) in rows.iter().enumerate() {
            out.push_str("<tr>");
            for (col_index, cell) in row.iter().enumerate() {
                let header =
                    (has_column_header && row_index == 0) || (has_row_header && col_index == 0);
                let tag = if header { "th" } else { "td" };
                write!(out, "<{tag}>{cell}</{tag}>").unwrap();
            }
            out.push_str("</tr>");
        }
        out.push_str("</table></div>");
    }

    fn table_placeholder(out: &mut String) {
        out.push_str(r#"<div class="table-placeholder">Table content unavailable</div>"#);
    }

    fn image(url: &str, caption: &str, out: &mut String) {
        write!(
            out,
            r#"<figure class="image-block"><img src="{}" alt="" loading="lazy">"#,
            escape_html(url)
        )
        .unwrap();
        if !caption.is_empty() {
            write!(out, "<figcaption>{caption}</figcaption>").unwrap();
        }
        out.push_str("</figure>");
    }

    fn file(url: &str, name: &str, out: &mut String) {
        write!(
            out,
            r#"<div class="file-download"><a class="download-link" href="{}" download>{}</a></div>"#,
            escape_html(url),
            escape_html(name)
        )
        .unwrap();
    }

    fn to_do(checked: bool, inline: &str, children: &str, out: &mut String) {
        if checked {
            write!(
                out,
                r#"<div class="todo-item checked"><input type="checkbox" checked disabled> <span>{inline}</span>{children}</div>"#
            )
            .unwrap();
        } else {
            write!(
                out,
                r#"<div class="todo-item"><input type="checkbox" disabled> <span>{inline}</span>{children}</div>"#
            )
            .unwrap();
        }
    }

    fn equation(expression: &str, out: &mut String) {
        write!(out, r#"<div class="equation">$${}$$</div>"#, escape_html(expression)).unwrap();
    }

    fn divider(out: &mut String) {
        out.push_str("<hr>");
    }

    fn toggle(summary: &str, children: &str, out: &mut String) {
        write!(
            out,
            r#"<details class="toggle"><summary>{summary}</summary>{children}</details>"#
        )
        .unwrap();
    }

    fn trailing_children(children: &str, out: &mut String) {
        if !children.is_empty() {
            write!(out, r#"<div class="block-children">{children}</div>"#).unwrap();
        }
    }

    fn unsupported(kind: &str, out: &mut String) {
        write!(
            out,
            r#"<div class="unknown-block">Unsupported block type: {}</div>"#,
            escape_html(kind)
        )
        .unwrap();
    }

    fn depth_exceeded(limit: usize, out: &mut String) {
        write!(
            out,
            r#"<div class="render-error">Content nested deeper than {limit} levels was not rendered</div>"#
        )
        .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Annotations;
    use pretty_assertions::assert_eq;

    fn span_html(span: &RichText) -> String {
        let mut out = String::new();
        HtmlBackend::span(span, &mut out);
        out
    }

    #[test]
    fn test_span_escapes_text() {
        assert_eq!(span_html(&RichText::plain("a < b & c")), "a &lt; b &amp; c");
    }

    #[test]
    fn test_span_annotations_nest() {
        let span = RichText {
            content: "x".to_owned(),
            annotations: Annotations {
                bold: true,
                italic: true,
                ..Annotations::default()
            },
            ..RichText::default()
        };
        assert_eq!(span_html(&span), "<em><strong>x</strong></em>");
    }

    #[test]
    fn test_span_link() {
        let span = RichText {
            content: "docs".to_owned(),
            href: Some("https://example.com/?a=1&b=2".to_owned()),
            ..RichText::default()
        };
        assert_eq!(
            span_html(&span),
            r#"<a href="https://example.com/?a=1&amp;b=2">docs</a>"#
        );
    }

    #[test]
    fn test_span_inline_equation() {
        let span = RichText {
            content: "a<b".to_owned(),
            equation: true,
            ..RichText::default()
        };
        assert_eq!(span_html(&span), "$a&lt;b$");
    }

    #[test]
    fn test_span_newline_becomes_break() {
        assert_eq!(span_html(&RichText::plain("one\ntwo")), "one<br>two");
    }

    #[test]
    fn test_code_block_with_language() {
        let mut out = String::new();
        HtmlBackend::code_block(Some("rust"), "fn main() {}\n<T>", &mut out);
        assert_eq!(
            out,
            r#"<div class="code-block"><div class="code-header">rust</div><pre><code class="language-rust">fn main() {}
&lt;T&gt;</code></pre></div>"#
        );
    }

    #[test]
    fn test_table_headers() {
        let rows = vec![
            vec!["h1".to_owned(), "h2".to_owned()],
            vec!["r1".to_owned(), "v1".to_owned()],
        ];
        let mut out = String::new();
        HtmlBackend::table(true, true, &rows, &mut out);
        assert_eq!(
            out,
            r#"<div class="table-wrapper"><table class="notion-table"><tr><th>h1</th><th>h2</th></tr><tr><th>r1</th><td>v1</td></tr></table></div>"#
        );
    }

    #[test]
    fn test_to_do_checked() {
        let mut out = String::new();
        HtmlBackend::to_do(true, "done", "", &mut out);
        assert!(out.starts_with(r#"<div class="todo-item checked">"#));
        assert!(out.contains("checked disabled"));
    }

    #[test]
    fn test_equation_uses_display_delimiters() {
        let mut out = String::new();
        HtmlBackend::equation("E = mc^2", &mut out);
        assert_eq!(out, r#"<div class="equation">$$E = mc^2$$</div>"#);
    }
}
