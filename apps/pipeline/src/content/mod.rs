//! Landmark-based page reduction.
//!
//! Job-posting pages bury the posting text between a navigation header and a
//! site footer. This module isolates the content band between those two
//! landmarks and flattens it to plain text for the extraction prompt.

use scraper::{ElementRef, Html, Node, Selector};

/// Reduces rendered markup to the markup-free text between the `<header>`
/// and `<footer>` landmarks.
///
/// With a header present, every sibling element after it contributes its
/// visible text, stopping at the footer when one appears among the siblings.
/// Without a header, the full `<body>` text is used minus the footer
/// subtree. Output is whitespace-normalized and deterministic for a given
/// input; malformed markup degrades to best-effort or empty text — this
/// function never fails.
pub fn reduce(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let footer_id = select_first(&document, "footer").map(|element| element.id());

    if let Some(header) = select_first(&document, "header") {
        let mut fragments: Vec<String> = Vec::new();
        for sibling in header.next_siblings() {
            if footer_id == Some(sibling.id()) {
                break;
            }
            if let Some(element) = ElementRef::wrap(sibling) {
                fragments.extend(element.text().map(str::to_owned));
            }
        }
        normalize(&fragments.join(" "))
    } else if let Some(body) = select_first(&document, "body") {
        let mut fragments: Vec<String> = Vec::new();
        for node in body.descendants() {
            if let Node::Text(text) = node.value() {
                let in_footer =
                    footer_id.is_some_and(|id| node.ancestors().any(|a| a.id() == id));
                if !in_footer {
                    fragments.push(text.to_string());
                }
            }
        }
        normalize(&fragments.join(" "))
    } else {
        String::new()
    }
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

/// Collapse all whitespace runs to single spaces and trim the ends.
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_band_between_landmarks() {
        let markup = "<header>H</header><main>A</main><footer>F</footer>";
        let text = reduce(markup);
        assert!(text.contains('A'));
        assert!(!text.contains('H'));
        assert!(!text.contains('F'));
    }

    #[test]
    fn test_reduce_is_deterministic() {
        let markup = r#"
            <html><body>
            <header><nav>Jobs Menu</nav></header>
            <main><h1>Backend Engineer</h1><p>5+ years of Rust</p></main>
            <aside>Benefits: coffee</aside>
            <footer>Copyright</footer>
            </body></html>
        "#;
        assert_eq!(reduce(markup), reduce(markup));
    }

    #[test]
    fn test_collects_all_siblings_after_header() {
        let markup = "<header>nav</header><main>first</main><section>second</section>";
        let text = reduce(markup);
        assert_eq!(text, "first second");
    }

    #[test]
    fn test_no_header_falls_back_to_body_minus_footer() {
        let markup = "<body><div>posting text</div><footer>site links</footer></body>";
        let text = reduce(markup);
        assert!(text.contains("posting text"));
        assert!(!text.contains("site links"));
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let markup = "<header>h</header><main>  a\n\n   b\t c  </main>";
        assert_eq!(reduce(markup), "a b c");
    }

    #[test]
    fn test_output_is_markup_free() {
        let markup = "<header>h</header><div><p>a <b>bold</b> claim</p><br/></div>";
        let text = reduce(markup);
        assert!(!text.contains('<'));
        assert_eq!(text, "a bold claim");
    }

    #[test]
    fn test_empty_and_malformed_markup_never_panic() {
        assert_eq!(reduce(""), "");
        assert_eq!(reduce("   "), "");
        // unclosed tags, stray brackets: best-effort, no error
        let _ = reduce("<header><div>half open");
        let _ = reduce("<<<>>>");
    }

    #[test]
    fn test_footer_outside_sibling_chain_does_not_truncate() {
        // footer nested elsewhere: everything after the header is kept
        let markup = "<header>h</header><main>body text<div><footer>f</footer></div></main>";
        let text = reduce(markup);
        assert!(text.contains("body text"));
    }
}
