use scraper::{Html, Selector};

use super::ExtractedPage;

/// Likely article containers, tried in order; first match wins.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    ".post-content",
    ".entry-content",
    ".article-body",
    "#content",
];

fn selector(s: &str) -> Selector {
    Selector::parse(s).expect("static selector is valid")
}

/// Pull a title and readable body text out of an HTML document.
///
/// Title preference: `og:title` meta tag, then `<title>`, then "Untitled".
/// Body: first matching content selector, else the whole document body.
pub fn parse_page(html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    let og_title = document
        .select(&selector(r#"meta[property="og:title"]"#))
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let title = og_title
        .or_else(|| {
            document
                .select(&selector("title"))
                .next()
                .map(|el| collapse_whitespace(&el.text().collect::<String>()))
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| "Untitled".to_string());

    let content = CONTENT_SELECTORS
        .iter()
        .find_map(|sel| {
            document
                .select(&selector(sel))
                .next()
                .map(|el| collapse_whitespace(&el.text().collect::<String>()))
                .filter(|text| !text.is_empty())
        })
        .unwrap_or_else(|| {
            document
                .select(&selector("body"))
                .next()
                .map(|el| collapse_whitespace(&el.text().collect::<String>()))
                .unwrap_or_default()
        });

    ExtractedPage { title, content }
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn og_title_wins_over_title_tag() {
        let page = parse_page(
            r#"<html><head>
                <meta property="og:title" content="OG Title">
                <title>Tag Title</title>
            </head><body><article>Body text</article></body></html>"#,
        );
        assert_eq!(page.title, "OG Title");
        assert_eq!(page.content, "Body text");
    }

    #[test]
    fn falls_back_to_title_tag_then_untitled() {
        let page = parse_page("<html><head><title> Tag  Title </title></head><body></body></html>");
        assert_eq!(page.title, "Tag Title");

        let page = parse_page("<html><body>hello</body></html>");
        assert_eq!(page.title, "Untitled");
    }

    #[test]
    fn selectors_are_tried_in_order() {
        let page = parse_page(
            r#"<html><body>
                <div id="content">wrong</div>
                <main>also wrong</main>
                <article>article wins</article>
            </body></html>"#,
        );
        assert_eq!(page.content, "article wins");

        let page = parse_page(r#"<html><body><div class="entry-content">entry</div></body></html>"#);
        assert_eq!(page.content, "entry");
    }

    #[test]
    fn whole_body_is_the_fallback() {
        let page = parse_page("<html><body><p>just</p> <p>paragraphs</p></body></html>");
        assert_eq!(page.content, "just paragraphs");
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(collapse_whitespace("  a \n\t b   c  "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }
}
