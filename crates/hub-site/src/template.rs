//! Document page template.
//!
//! A template is plain HTML containing each placeholder of [`Placeholder`]
//! exactly once. It is split into literal segments and slots when loaded,
//! so rendering is a single pass: substituted values are never scanned for
//! further placeholders, even when rendered content contains text that
//! looks like one.

use std::fmt::Write;

/// Built-in document page template.
pub const DEFAULT_DOCUMENT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>@@HEAD_TITLE@@</title>
<link rel="stylesheet" href="/assets/document.css">
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css" crossorigin="anonymous">
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.js" crossorigin="anonymous"></script>
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/contrib/auto-render.min.js" crossorigin="anonymous"
    onload="renderMathInElement(document.body, {delimiters: [{left: '$$', right: '$$', display: true}, {left: '$', right: '$', display: false}]});"></script>
</head>
<body>
<div class="container">
<div class="header">
<h1 class="doc-title">@@TITLE@@</h1>
<div class="doc-id">Document ID: @@DOC_ID@@</div>
</div>
<div class="metrics-bar">
<span class="metric"><strong>Views:</strong> @@VIEWS@@</span>
<span class="metric"><strong>Downloads:</strong> @@DOWNLOADS@@</span>
<span class="metric"><strong>Shares:</strong> @@SHARES@@</span>
</div>
@@PROPERTY_HTML@@
<div class="document-content">
@@CONTENT_HTML@@
</div>
<div class="footer">
<a href="/" class="back-link">&larr; Back to index</a>
<div class="timestamp">Last updated: @@TIMESTAMP@@</div>
</div>
</div>
</body>
</html>
"#;

/// Template slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placeholder {
    HeadTitle,
    Title,
    DocId,
    Views,
    Downloads,
    Shares,
    PropertyHtml,
    ContentHtml,
    Timestamp,
}

impl Placeholder {
    pub const ALL: [Self; 9] = [
        Self::HeadTitle,
        Self::Title,
        Self::DocId,
        Self::Views,
        Self::Downloads,
        Self::Shares,
        Self::PropertyHtml,
        Self::ContentHtml,
        Self::Timestamp,
    ];

    /// Token as it appears in a template.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::HeadTitle => "@@HEAD_TITLE@@",
            Self::Title => "@@TITLE@@",
            Self::DocId => "@@DOC_ID@@",
            Self::Views => "@@VIEWS@@",
            Self::Downloads => "@@DOWNLOADS@@",
            Self::Shares => "@@SHARES@@",
            Self::PropertyHtml => "@@PROPERTY_HTML@@",
            Self::ContentHtml => "@@CONTENT_HTML@@",
            Self::Timestamp => "@@TIMESTAMP@@",
        }
    }
}

/// Template validation error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template is missing placeholder {0}")]
    Missing(&'static str),

    #[error("Template contains placeholder {token} {count} times, expected once")]
    Repeated { token: &'static str, count: usize },
}

/// Values substituted into a [`PageTemplate`].
///
/// Text values are inserted verbatim; callers escape them.
#[derive(Debug, Default)]
pub struct PageValues<'a> {
    pub head_title: &'a str,
    pub title: &'a str,
    pub doc_id: &'a str,
    pub views: u64,
    pub downloads: u64,
    pub shares: u64,
    pub property_html: &'a str,
    pub content_html: &'a str,
    pub timestamp: &'a str,
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Slot(Placeholder),
}

/// Validated document page template.
#[derive(Debug, Clone)]
pub struct PageTemplate {
    segments: Vec<Segment>,
    size_hint: usize,
}

impl PageTemplate {
    /// Parse and validate a template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if any placeholder is missing or repeated.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut slots: Vec<(usize, Placeholder)> = Vec::with_capacity(Placeholder::ALL.len());
        for placeholder in Placeholder::ALL {
            let token = placeholder.token();
            let positions: Vec<usize> = source.match_indices(token).map(|(i, _)| i).collect();
            match positions.as_slice() {
                [] => return Err(TemplateError::Missing(token)),
                [pos] => slots.push((*pos, placeholder)),
                _ => {
                    return Err(TemplateError::Repeated {
                        token,
                        count: positions.len(),
                    });
                }
            }
        }
        slots.sort_by_key(|(pos, _)| *pos);

        let mut segments = Vec::with_capacity(slots.len() * 2 + 1);
        let mut cursor = 0;
        for (pos, placeholder) in slots {
            if pos > cursor {
                segments.push(Segment::Literal(source[cursor..pos].to_owned()));
            }
            segments.push(Segment::Slot(placeholder));
            cursor = pos + placeholder.token().len();
        }
        if cursor < source.len() {
            segments.push(Segment::Literal(source[cursor..].to_owned()));
        }

        Ok(Self {
            segments,
            size_hint: source.len(),
        })
    }

    /// Substitute `values` in one pass.
    #[must_use]
    pub fn render(&self, values: &PageValues<'_>) -> String {
        let mut out = String::with_capacity(
            self.size_hint + values.content_html.len() + values.property_html.len(),
        );
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(placeholder) => match placeholder {
                    Placeholder::HeadTitle => out.push_str(values.head_title),
                    Placeholder::Title => out.push_str(values.title),
                    Placeholder::DocId => out.push_str(values.doc_id),
                    Placeholder::Views => {
                        let _ = write!(out, "{}", values.views);
                    }
                    Placeholder::Downloads => {
                        let _ = write!(out, "{}", values.downloads);
                    }
                    Placeholder::Shares => {
                        let _ = write!(out, "{}", values.shares);
                    }
                    Placeholder::PropertyHtml => out.push_str(values.property_html),
                    Placeholder::ContentHtml => out.push_str(values.content_html),
                    Placeholder::Timestamp => out.push_str(values.timestamp),
                },
            }
        }
        out
    }
}
