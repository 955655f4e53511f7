//! Parsed documents and locator-based queries
//!
//! Uses the scraper crate to select elements by CSS selectors. A locator that
//! fails to compile behaves like one that matched nothing.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Describes which elements to pick out of a document
///
/// Built from a tag plus optional class and attribute predicates, or from a
/// raw CSS selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    css: String,
}

impl Locator {
    /// Match elements by tag name
    pub fn tag(tag: &str) -> Self {
        Self {
            css: tag.trim().to_string(),
        }
    }

    /// Match by a raw CSS selector
    pub fn css(selector: &str) -> Self {
        Self {
            css: selector.to_string(),
        }
    }

    /// Add a class predicate.
    ///
    /// A single token matches any element carrying that class. Several
    /// space-separated tokens must equal the whole `class` attribute, so
    /// `"mb-0"` and `"mb-0 mb-3"` select different elements.
    pub fn class(mut self, class: &str) -> Self {
        let class = class.trim();
        if class.contains(char::is_whitespace) {
            self.css
                .push_str(&format!(r#"[class="{}"]"#, escape_value(class)));
        } else if !class.is_empty() {
            self.css.push('.');
            self.css.push_str(class);
        }
        self
    }

    /// Require the attribute to be present
    pub fn has_attr(mut self, name: &str) -> Self {
        self.css.push_str(&format!("[{}]", name));
        self
    }

    /// Require the attribute to equal `value`
    pub fn attr_eq(mut self, name: &str, value: &str) -> Self {
        self.css
            .push_str(&format!(r#"[{}="{}"]"#, name, escape_value(value)));
        self
    }

    pub fn as_css(&self) -> &str {
        &self.css
    }

    fn selector(&self) -> Option<Selector> {
        match Selector::parse(&self.css) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(locator = %self.css, error = %e, "locator does not compile");
                None
            }
        }
    }
}

fn escape_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// A parsed page or a re-parsed piece of one
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse a complete page
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Parse a piece of markup, e.g. one listing cut out of a results page
    pub fn fragment(source: &str) -> Self {
        Self {
            html: Html::parse_fragment(source),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Serialized markup of the whole tree
    pub fn to_html(&self) -> String {
        self.html.html()
    }

    /// First element matching the locator, in document order
    pub fn find(&self, locator: &Locator) -> Option<ElementRef<'_>> {
        let selector = locator.selector()?;
        self.html.select(&selector).next()
    }

    /// All elements matching the locator, in document order
    pub fn find_all(&self, locator: &Locator) -> Vec<ElementRef<'_>> {
        match locator.selector() {
            Some(selector) => self.html.select(&selector).collect(),
            None => vec![],
        }
    }

    /// Trimmed text of the first match
    pub fn text_of(&self, locator: &Locator) -> Option<String> {
        self.find(locator).map(|el| element_text(&el))
    }

    /// Trimmed text of every match
    pub fn texts_of(&self, locator: &Locator) -> Vec<String> {
        self.find_all(locator)
            .iter()
            .map(element_text)
            .collect()
    }

    /// Attribute of the first match that carries it
    pub fn attr_of(&self, locator: &Locator, attr: &str) -> Option<String> {
        self.find_all(locator)
            .into_iter()
            .find_map(|el| el.value().attr(attr).map(String::from))
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.to_html() == other.to_html()
    }
}

/// First descendant of `element` matching the locator
pub fn find_in<'a>(element: &ElementRef<'a>, locator: &Locator) -> Option<ElementRef<'a>> {
    let selector = locator.selector()?;
    element.select(&selector).next()
}

/// Concatenated, trimmed text content of an element
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_and_texts() {
        let doc = Document::parse(
            r#"
        <html>
        <body>
            <div class="price">$19.99</div>
            <div class="price">$29.99</div>
            <a href="/product/123" class="link">Product</a>
        </body>
        </html>
        "#,
        );

        let prices = doc.texts_of(&Locator::tag("div").class("price"));
        assert_eq!(prices, vec!["$19.99", "$29.99"]);

        let first = doc.text_of(&Locator::tag("div").class("price"));
        assert_eq!(first.unwrap(), "$19.99");

        let href = doc.attr_of(&Locator::tag("a").has_attr("href"), "href");
        assert_eq!(href.unwrap(), "/product/123");
    }

    #[test]
    fn test_multi_class_matches_exactly() {
        let doc = Document::parse(
            r#"
        <p class="d-flex align-items-center mb-0 mb-3">one</p>
        <p class="d-flex align-items-center mb-0 mb-3">two</p>
        <p class="d-flex align-items-center mb-0">last</p>
        "#,
        );

        let top = doc.texts_of(&Locator::tag("p").class("d-flex align-items-center mb-0 mb-3"));
        assert_eq!(top, vec!["one", "two"]);

        let last = doc.text_of(&Locator::tag("p").class("d-flex align-items-center mb-0"));
        assert_eq!(last.unwrap(), "last");

        let any = doc.texts_of(&Locator::tag("p").class("mb-0"));
        assert_eq!(any.len(), 3);
    }

    #[test]
    fn test_bad_locator_matches_nothing() {
        let doc = Document::parse("<div>text</div>");
        let broken = Locator::css("div[[[");
        assert!(doc.find(&broken).is_none());
        assert!(doc.find_all(&broken).is_empty());
    }

    #[test]
    fn test_fragment_query() {
        let doc = Document::fragment(r#"<li class="offer"><span class="title">Flat</span></li>"#);
        assert_eq!(doc.text_of(&Locator::css("li.offer .title")).unwrap(), "Flat");
    }
}
