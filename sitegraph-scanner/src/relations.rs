use crate::asset::{AssetKind, Relation, RelationKind, RelationTarget};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extract and resolve every outgoing relation of an asset. Only HTML and
/// CSS carry relations; everything else is a leaf.
pub fn extract_relations(referrer: &Path, kind: AssetKind, content: &str) -> Vec<Relation> {
    extract_references(kind, content)
        .into_iter()
        .filter_map(|(rel_kind, reference)| {
            resolve_reference(referrer, &reference).map(|target| Relation {
                kind: rel_kind,
                target,
            })
        })
        .collect()
}

/// Raw references in document order, before resolution.
pub fn extract_references(kind: AssetKind, content: &str) -> Vec<(RelationKind, String)> {
    match kind {
        AssetKind::Html => extract_html_references(content),
        AssetKind::Css => extract_css_references(content),
        _ => Vec::new(),
    }
}

fn extract_html_references(html: &str) -> Vec<(RelationKind, String)> {
    let document = Html::parse_document(html);
    let mut refs = Vec::new();

    let selectors = [
        (RelationKind::Anchor, "a[href]", "href"),
        (RelationKind::Script, "script[src]", "src"),
        (RelationKind::Stylesheet, "link[rel~=\"stylesheet\"][href]", "href"),
        (RelationKind::Icon, "link[rel~=\"icon\"][href]", "href"),
        (RelationKind::Image, "img[src]", "src"),
        (RelationKind::Iframe, "iframe[src]", "src"),
    ];

    for (kind, selector, attr) in selectors {
        let selector = Selector::parse(selector).unwrap();
        for element in document.select(&selector) {
            if let Some(value) = element.value().attr(attr) {
                debug!("found {} reference: {}", kind.as_str(), value);
                refs.push((kind, value.to_string()));
            }
        }
    }

    refs
}

// A small token scan rather than a CSS parser: `@import` targets first,
// then any remaining `url(...)` occurrences. At-rules and function names
// are case-insensitive in CSS, so the scan runs over an ASCII-lowercased
// copy (same byte offsets) while tokens are extracted from the original.
fn extract_css_references(css: &str) -> Vec<(RelationKind, String)> {
    let lowered = css.to_ascii_lowercase();
    let mut refs = Vec::new();
    let mut imported_urls: HashSet<usize> = HashSet::new();

    let mut search = 0;
    while let Some(found) = lowered[search..].find("@import") {
        let after = search + found + "@import".len();
        let rest = &css[after..];
        let trimmed = rest.trim_start();
        let trim_offset = after + (rest.len() - trimmed.len());

        if lowered[trim_offset..].starts_with("url(") {
            let inner = &css[trim_offset + "url(".len()..];
            if let Some(close) = inner.find(')') {
                imported_urls.insert(trim_offset);
                if let Some(reference) = clean_css_token(&inner[..close]) {
                    refs.push((RelationKind::CssImport, reference));
                }
            }
        } else if trimmed.starts_with('"') || trimmed.starts_with('\'') {
            let quote = trimmed.chars().next().unwrap_or('"');
            if let Some(close) = trimmed[1..].find(quote) {
                if let Some(reference) = clean_css_token(&trimmed[1..1 + close]) {
                    refs.push((RelationKind::CssImport, reference));
                }
            }
        }
        search = after;
    }

    let mut search = 0;
    while let Some(found) = lowered[search..].find("url(") {
        let at = search + found;
        search = at + "url(".len();
        if imported_urls.contains(&at) {
            continue;
        }
        if let Some(close) = css[search..].find(')') {
            if let Some(reference) = clean_css_token(&css[search..search + close]) {
                refs.push((RelationKind::CssUrl, reference));
            }
        }
    }

    refs
}

fn clean_css_token(token: &str) -> Option<String> {
    let token = token.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Resolve a raw reference against the referencing asset's location.
/// Returns `None` for references that are not assets at all: fragments,
/// empty hrefs, and javascript:/mailto:/tel:/data: pseudo-targets.
pub fn resolve_reference(referrer: &Path, reference: &str) -> Option<RelationTarget> {
    let reference = reference.trim();

    if reference.is_empty()
        || reference.starts_with('#')
        || reference.starts_with("javascript:")
        || reference.starts_with("mailto:")
        || reference.starts_with("tel:")
        || reference.starts_with("data:")
    {
        return None;
    }

    if reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with("//")
    {
        return Some(RelationTarget::External(reference.to_string()));
    }

    // Local reference: drop query string and fragment
    let trimmed = reference.split(['?', '#']).next().unwrap_or(reference);
    if trimmed.is_empty() {
        return None;
    }

    let (base, raw_path) = match trimmed.strip_prefix('/') {
        Some(stripped) => (PathBuf::new(), stripped),
        None => (
            referrer.parent().map(Path::to_path_buf).unwrap_or_default(),
            trimmed,
        ),
    };

    match normalize(&base, raw_path) {
        Some(path) => Some(RelationTarget::Internal(path)),
        None => Some(RelationTarget::Unresolved(reference.to_string())),
    }
}

// Collapse `.` and `..` segments; `None` means the reference climbed out of
// the scan root.
fn normalize(base: &Path, reference: &str) -> Option<PathBuf> {
    let mut parts: Vec<String> = base
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    for segment in reference.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other.to_string()),
        }
    }

    if parts.is_empty() {
        return None;
    }
    Some(parts.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_reference_kinds() {
        let html = r#"<html><head>
            <link rel="stylesheet" href="css/site.css">
            <link rel="shortcut icon" href="favicon.ico">
            <script src="js/app.js"></script>
        </head><body>
            <a href="about.html">About</a>
            <img src="img/logo.png">
            <iframe src="embed.html"></iframe>
        </body></html>"#;

        let refs = extract_references(AssetKind::Html, html);

        assert!(refs.contains(&(RelationKind::Anchor, "about.html".to_string())));
        assert!(refs.contains(&(RelationKind::Script, "js/app.js".to_string())));
        assert!(refs.contains(&(RelationKind::Stylesheet, "css/site.css".to_string())));
        assert!(refs.contains(&(RelationKind::Icon, "favicon.ico".to_string())));
        assert!(refs.contains(&(RelationKind::Image, "img/logo.png".to_string())));
        assert!(refs.contains(&(RelationKind::Iframe, "embed.html".to_string())));
        assert_eq!(refs.len(), 6);
    }

    #[test]
    fn test_html_plain_link_is_not_a_stylesheet() {
        let html = r#"<link rel="preconnect" href="other.html">"#;
        let refs = extract_references(AssetKind::Html, html);
        assert!(refs.is_empty());
    }

    #[test]
    fn test_css_import_forms() {
        let css = r#"
            @import "base.css";
            @import url(theme.css);
            @import url("print.css");
            body { background: url('img/bg.png'); }
        "#;

        let refs = extract_references(AssetKind::Css, css);

        assert!(refs.contains(&(RelationKind::CssImport, "base.css".to_string())));
        assert!(refs.contains(&(RelationKind::CssImport, "theme.css".to_string())));
        assert!(refs.contains(&(RelationKind::CssImport, "print.css".to_string())));
        assert!(refs.contains(&(RelationKind::CssUrl, "img/bg.png".to_string())));
        assert_eq!(refs.len(), 4);
    }

    #[test]
    fn test_css_tokens_match_case_insensitively() {
        let css = r#"
            @IMPORT URL(theme.css);
            @Import "base.css";
            body { background: Url('img/bg.png'); }
        "#;

        let refs = extract_references(AssetKind::Css, css);

        assert!(refs.contains(&(RelationKind::CssImport, "theme.css".to_string())));
        assert!(refs.contains(&(RelationKind::CssImport, "base.css".to_string())));
        assert!(refs.contains(&(RelationKind::CssUrl, "img/bg.png".to_string())));
        assert_eq!(refs.len(), 3);
    }

    #[test]
    fn test_non_parsed_kinds_have_no_references() {
        assert!(extract_references(AssetKind::Png, "not parsed").is_empty());
        assert!(extract_references(AssetKind::JavaScript, "import x from 'y'").is_empty());
    }

    #[test]
    fn test_resolve_sibling_reference() {
        let target = resolve_reference(Path::new("index.html"), "style.css");
        assert_eq!(
            target,
            Some(RelationTarget::Internal(PathBuf::from("style.css")))
        );
    }

    #[test]
    fn test_resolve_relative_to_referrer_directory() {
        let target = resolve_reference(Path::new("blog/post.html"), "../img/logo.png");
        assert_eq!(
            target,
            Some(RelationTarget::Internal(PathBuf::from("img/logo.png")))
        );
    }

    #[test]
    fn test_resolve_root_absolute_reference() {
        let target = resolve_reference(Path::new("blog/post.html"), "/css/site.css");
        assert_eq!(
            target,
            Some(RelationTarget::Internal(PathBuf::from("css/site.css")))
        );
    }

    #[test]
    fn test_resolve_strips_query_and_fragment() {
        let target = resolve_reference(Path::new("index.html"), "app.js?v=3#main");
        assert_eq!(
            target,
            Some(RelationTarget::Internal(PathBuf::from("app.js")))
        );
    }

    #[test]
    fn test_resolve_escaping_root_is_unresolved() {
        let target = resolve_reference(Path::new("index.html"), "../outside.css");
        assert_eq!(
            target,
            Some(RelationTarget::Unresolved("../outside.css".to_string()))
        );
    }

    #[test]
    fn test_resolve_external_references() {
        let referrer = Path::new("index.html");
        assert_eq!(
            resolve_reference(referrer, "https://cdn.example.com/lib.js"),
            Some(RelationTarget::External(
                "https://cdn.example.com/lib.js".to_string()
            ))
        );
        assert_eq!(
            resolve_reference(referrer, "//cdn.example.com/lib.js"),
            Some(RelationTarget::External("//cdn.example.com/lib.js".to_string()))
        );
    }

    #[test]
    fn test_resolve_skips_non_resources() {
        let referrer = Path::new("index.html");
        assert_eq!(resolve_reference(referrer, ""), None);
        assert_eq!(resolve_reference(referrer, "#section"), None);
        assert_eq!(resolve_reference(referrer, "javascript:void(0)"), None);
        assert_eq!(resolve_reference(referrer, "mailto:hi@example.com"), None);
        assert_eq!(resolve_reference(referrer, "tel:+123456"), None);
        assert_eq!(resolve_reference(referrer, "data:image/png;base64,AAAA"), None);
    }

    #[test]
    fn test_extract_relations_resolves_against_referrer() {
        let html = r##"<img src="../shared/logo.png"><a href="#top">Top</a>"##;
        let relations = extract_relations(Path::new("docs/page.html"), AssetKind::Html, html);

        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].kind, RelationKind::Image);
        assert_eq!(
            relations[0].target,
            RelationTarget::Internal(PathBuf::from("shared/logo.png"))
        );
    }
}
