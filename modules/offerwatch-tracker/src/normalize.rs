//! HTML → bounded plain-text stream for the extraction model.
//!
//! Modern hotel sites carry their promotions inside slider/carousel widgets
//! whose copy lives in attributes (data-title, aria-label, img alt), not in
//! visible text. A naive text dump loses exactly the campaigns we are after,
//! so those attributes are lifted into a tagged prefix before the body text
//! is flattened.

use scraper::{ElementRef, Html, Selector};

/// Upper bound on the normalized stream, to bound model-input cost.
pub const MAX_STREAM_CHARS: usize = 48_000;

/// Elements that never contribute visible campaign copy.
const STRIP_TAGS: &[&str] = &[
    "script", "style", "iframe", "svg", "path", "link", "meta", "noscript", "header", "footer",
    "nav",
];

/// Elements likely to carry promotional metadata.
const PROMO_SELECTOR: &str = "[data-title], [data-description], [aria-label], \
     [aria-roledescription], .hero, .banner, .carousel, [data-testid*=\"promo\"]";

/// Convert raw markup to the normalized text stream: tagged promo-metadata
/// prefix, then visible body text, whitespace-collapsed, truncated to
/// [`MAX_STREAM_CHARS`] and trimmed. Pure: same markup, same stream.
pub fn normalize(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut buffer = promo_metadata(&document);
    buffer.push(' ');

    // Only the body carries visible text; head content is metadata.
    let body = Selector::parse("body").expect("valid body selector");
    match document.select(&body).next() {
        Some(body) => visible_text(body, &mut buffer),
        None => visible_text(document.root_element(), &mut buffer),
    }

    let collapsed = buffer.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, MAX_STREAM_CHARS)
}

/// Scan promo-flavored elements and collect their attribute copy, each value
/// wrapped in a marker tag so the extractor can tell provenance.
fn promo_metadata(document: &Html) -> String {
    let selector = Selector::parse(PROMO_SELECTOR).expect("valid promo selector");
    let img = Selector::parse("img").expect("valid img selector");

    let mut buffer = String::new();

    for element in document.select(&selector) {
        let value = element.value();

        let title = value.attr("data-title").or_else(|| value.attr("title"));
        let desc = value.attr("data-description");
        let label = value
            .attr("aria-label")
            .or_else(|| value.attr("aria-roledescription"));

        if let Some(title) = title {
            buffer.push_str(&format!(" [BANNER_TITLE: {title}] "));
        }
        if let Some(desc) = desc {
            buffer.push_str(&format!(" [BANNER_DESC: {desc}] "));
        }
        if let Some(label) = label {
            buffer.push_str(&format!(" [UI_LABEL: {label}] "));
        }

        for image in element.select(&img) {
            if let Some(alt) = image.value().attr("alt") {
                if !alt.is_empty() {
                    buffer.push_str(&format!(" [IMG_ALT: {alt}] "));
                }
            }
        }
    }

    buffer
}

/// Depth-first visible-text collection, skipping non-content subtrees.
fn visible_text(element: ElementRef<'_>, out: &mut String) {
    if STRIP_TAGS.contains(&element.value().name()) {
        return;
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            visible_text(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].trim().to_string(),
        None => s.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promo_attributes_become_tagged_prefix() {
        let html = r#"
            <html><body>
              <div class="hero" data-title="Spring Sale" data-description="20% off stays">
                <img src="x.jpg" alt="Cherry blossom package">
              </div>
              <p>Book now</p>
            </body></html>
        "#;

        let stream = normalize(html);

        assert!(stream.contains("[BANNER_TITLE: Spring Sale]"));
        assert!(stream.contains("[BANNER_DESC: 20% off stays]"));
        assert!(stream.contains("[IMG_ALT: Cherry blossom package]"));
        assert!(stream.contains("Book now"));
        // Prefix buffer comes before body text.
        let title_pos = stream.find("[BANNER_TITLE").unwrap();
        let body_pos = stream.find("Book now").unwrap();
        assert!(title_pos < body_pos);
    }

    #[test]
    fn aria_labels_are_captured() {
        let html = r#"<div aria-label="Member exclusive slide"></div>"#;
        assert!(normalize(html).contains("[UI_LABEL: Member exclusive slide]"));
    }

    #[test]
    fn chrome_elements_are_stripped() {
        let html = r#"
            <html><head><script>var hidden = "SCRIPT_TEXT";</script>
            <style>.x { color: red }</style></head>
            <body>
              <nav>NAV_TEXT</nav>
              <header>HEADER_TEXT</header>
              <p>Visible offer</p>
              <footer>FOOTER_TEXT</footer>
              <noscript>NOSCRIPT_TEXT</noscript>
            </body></html>
        "#;

        let stream = normalize(html);

        assert!(stream.contains("Visible offer"));
        for hidden in ["SCRIPT_TEXT", "NAV_TEXT", "HEADER_TEXT", "FOOTER_TEXT", "NOSCRIPT_TEXT"] {
            assert!(!stream.contains(hidden), "{hidden} should be stripped");
        }
    }

    #[test]
    fn whitespace_collapses_to_single_spaces() {
        let html = "<body><p>one\n\n   two</p>\t<p>three</p></body>";
        let stream = normalize(html);
        assert_eq!(stream, "one two three");
    }

    #[test]
    fn long_pages_truncate_to_the_cap() {
        let word = "offer ";
        let body: String = word.repeat(MAX_STREAM_CHARS / word.len() + 100);
        let html = format!("<body><p>{body}</p></body>");

        let stream = normalize(&html);

        assert!(stream.chars().count() <= MAX_STREAM_CHARS);
        // Enough input that we truncate at (or just under, after trim) the cap.
        assert!(stream.chars().count() > MAX_STREAM_CHARS - 10);
    }

    #[test]
    fn deterministic_for_same_input() {
        let html = r#"<div class="banner" data-title="Deal"><p>Same page</p></div>"#;
        assert_eq!(normalize(html), normalize(html));
    }
}
