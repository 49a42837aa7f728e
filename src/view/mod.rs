//! HTML rendering for the copy flow.
//!
//! Pages are assembled from [`Markup`] fragments. Markup can only be built
//! from static template text or from escaped values, so nothing fetched from
//! an n8n instance or typed by the operator reaches the page unescaped.

mod pages;

pub use pages::render_page;

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A fragment of HTML that is safe to emit as is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Template text. Only static strings are accepted.
    pub fn raw(html: &'static str) -> Self {
        Self(html.to_string())
    }

    pub fn text(text: &str) -> Self {
        Self(escape_html(text))
    }

    /// Appends template text.
    pub fn push_raw(&mut self, html: &'static str) -> &mut Self {
        self.0.push_str(html);
        self
    }

    /// Appends `text`, escaped.
    pub fn push_text(&mut self, text: &str) -> &mut Self {
        self.0.push_str(&escape_html(text));
        self
    }

    pub fn push(&mut self, markup: Markup) -> &mut Self {
        self.0.push_str(&markup.0);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
