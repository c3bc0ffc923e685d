//! XHTML rendering of document markup.

use crate::error::Result;
use crate::model::{DocumentMarkup, Fragment, PageMarkup};

/// Options for XHTML output.
#[derive(Debug, Clone)]
pub struct XhtmlOptions {
    /// Document title in `<head>`
    pub title: Option<String>,

    /// Put each element on its own line
    pub pretty: bool,

    /// Include `line` and `rect` hints
    pub include_vector_hints: bool,

    /// Add page warnings as `<meta>` entries in the page div
    pub include_warnings: bool,
}

impl XhtmlOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_vector_hints(mut self, include: bool) -> Self {
        self.include_vector_hints = include;
        self
    }

    pub fn with_warnings(mut self, include: bool) -> Self {
        self.include_warnings = include;
        self
    }
}

impl Default for XhtmlOptions {
    fn default() -> Self {
        Self {
            title: None,
            pretty: true,
            include_vector_hints: true,
            include_warnings: false,
        }
    }
}

/// Convert document markup to an XHTML string.
pub fn to_xhtml(doc: &DocumentMarkup, options: &XhtmlOptions) -> Result<String> {
    XhtmlRenderer::new(options.clone()).render(doc)
}

/// XHTML renderer.
pub struct XhtmlRenderer {
    options: XhtmlOptions,
}

impl XhtmlRenderer {
    pub fn new(options: XhtmlOptions) -> Self {
        Self { options }
    }

    pub fn render(&self, doc: &DocumentMarkup) -> Result<String> {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
        self.newline(&mut out);
        out.push_str("<html xmlns=\"http://www.w3.org/1999/xhtml\">");
        self.newline(&mut out);
        out.push_str("<head>");
        if let Some(title) = &self.options.title {
            out.push_str("<title>");
            out.push_str(&escape_text(title));
            out.push_str("</title>");
        }
        out.push_str("</head>");
        self.newline(&mut out);
        out.push_str("<body>");
        self.newline(&mut out);

        for page in &doc.pages {
            self.render_page(&mut out, page);
        }

        out.push_str("</body>");
        self.newline(&mut out);
        out.push_str("</html>");
        self.newline(&mut out);
        Ok(out)
    }

    /// Render a single page as a `<div class="page">`.
    pub fn render_page(&self, out: &mut String, page: &PageMarkup) {
        out.push_str("<div class=\"page\">");
        self.newline(out);

        if self.options.include_warnings {
            for warning in &page.warnings {
                out.push_str("<meta name=\"warning\" content=\"");
                out.push_str(&escape_attribute(warning));
                out.push_str("\"/>");
                self.newline(out);
            }
        }

        for fragment in &page.fragments {
            if !self.options.include_vector_hints && (fragment.is_line() || fragment.is_rect()) {
                continue;
            }
            write_fragment(out, fragment);
            self.newline(out);
        }

        out.push_str("</div>");
        self.newline(out);
    }

    fn newline(&self, out: &mut String) {
        if self.options.pretty {
            out.push('\n');
        }
    }
}

/// Write one fragment as an XHTML element.
pub fn write_fragment(out: &mut String, fragment: &Fragment) {
    out.push('<');
    out.push_str(fragment.tag());
    for (name, value) in fragment.attributes() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(&value));
        out.push('"');
    }
    match fragment.body() {
        Some(body) => {
            out.push('>');
            out.push_str(&escape_text(body));
            out.push_str("</");
            out.push_str(fragment.tag());
            out.push('>');
        }
        None => out.push_str("/>"),
    }
}

fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

fn escape_attribute(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
