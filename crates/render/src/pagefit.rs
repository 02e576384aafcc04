//! Single-page print preparation.
//!
//! Chrome decides page breaks from a page size fixed *before* layout, so the
//! only way to guarantee one page regardless of content length is to let the
//! engine measure the laid-out document itself and rewrite the page geometry
//! afterwards. The prepared document therefore carries a placeholder `@page`
//! rule plus a script that replaces it with the measured dimensions once the
//! document has loaded; `--run-all-compositor-stages-before-draw` makes the
//! renderer wait for that rewrite before printing.
//!
//! All additions are made on the parsed document tree, never by string
//! replacement on `</head>`/`</body>` markers, so unusual markup can't send
//! a style block into the middle of a text node.

use crate::error::{ErrorKind, Result};
use crate::style::Stylesheet;
use ego_tree::{NodeId, Tree};
use exn::OptionExt;
use html5ever::{Attribute, LocalName, QualName, local_name, ns};
use scraper::node::{Element, Node, Text};
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// `id` of the rewritable page-geometry style rule.
pub const PAGE_STYLE_ID: &str = "page-fit";
/// `id` of the script performing the rewrite.
pub const PAGE_SCRIPT_ID: &str = "page-fit-script";

const FIT_CONTENT_CSS: &str = "\
html, body {
    width: fit-content;
    height: fit-content;
    margin: 0;
    padding: 0;
}";

/// Arbitrary starting size, overwritten by the script once real dimensions
/// are known.
const PLACEHOLDER_PAGE_CSS: &str = "@page { size: 1000px 1000px; margin: 0; }";

const PAGE_FIT_SCRIPT: &str = "
function fitPage() {
    const root = document.getElementsByTagName('html')[0];
    const info = window.getComputedStyle(root);
    // Chrome rounds the page height down; one extra pixel avoids a
    // spurious second page.
    const height = parseInt(info.height) + 1 + 'px';
    const css = '@page { size: ' + info.width + ' ' + height + '; margin: 0; }';
    document.getElementById('page-fit').textContent = css;
}
window.onload = fitPage;
";

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

selector!(HEAD_SELECTOR, "head");
selector!(BODY_SELECTOR, "body");
// Restricted to the element types we inject: an id alone would also match
// a <head> or <body> that happens to carry it, and detaching those would
// orphan the very nodes we are about to append into.
selector!(TAGGED_SELECTOR, "style#page-fit, script#page-fit-script");

/// Rewrites an HTML document so that printing it yields exactly one page.
///
/// Appends to `<head>`: a style sizing the root and body to their content,
/// the tagged placeholder page-geometry rule, and the optional custom
/// stylesheet. Appends to `<body>`: the tagged page-fit script. Any elements
/// already carrying the tagged ids are removed first, so the output always
/// contains exactly one of each.
///
/// # Errors
/// Raises [`ErrorKind::MalformedHtml`] when the parsed document lacks a
/// `<head>` or `<body>` element; no render should be attempted for it.
pub fn prepare(html: &str, custom: Option<&Stylesheet>) -> Result<String> {
    let mut document = Html::parse_document(html);
    let head = select_id(&document, &HEAD_SELECTOR)
        .ok_or_raise(|| ErrorKind::MalformedHtml("document has no <head> element".into()))?;
    let body = select_id(&document, &BODY_SELECTOR)
        .ok_or_raise(|| ErrorKind::MalformedHtml("document has no <body> element".into()))?;

    let stale: Vec<NodeId> = document
        .select(&TAGGED_SELECTOR)
        .map(|element| element.id())
        .filter(|id| *id != head && *id != body)
        .collect();
    for id in stale {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    append_child(&mut document.tree, head, local_name!("style"), vec![], FIT_CONTENT_CSS);
    append_child(
        &mut document.tree,
        head,
        local_name!("style"),
        vec![id_attribute(PAGE_STYLE_ID)],
        PLACEHOLDER_PAGE_CSS,
    );
    if let Some(stylesheet) = custom {
        append_child(&mut document.tree, head, local_name!("style"), vec![], stylesheet.css());
    }
    append_child(
        &mut document.tree,
        body,
        local_name!("script"),
        vec![id_attribute(PAGE_SCRIPT_ID)],
        PAGE_FIT_SCRIPT,
    );

    Ok(format!("<!DOCTYPE html>\n{}", document.root_element().html()))
}

fn select_id(document: &Html, selector: &Selector) -> Option<NodeId> {
    document.select(selector).next().map(|element| element.id())
}

fn append_child(
    tree: &mut Tree<Node>,
    parent: NodeId,
    name: LocalName,
    attributes: Vec<Attribute>,
    content: &str,
) {
    let element = Element::new(QualName::new(None, ns!(html), name), attributes);
    if let Some(mut parent) = tree.get_mut(parent) {
        let mut node = parent.append(Node::Element(element));
        node.append(Node::Text(Text { text: content.into() }));
    }
}

fn id_attribute(value: &str) -> Attribute {
    Attribute { name: QualName::new(None, ns!(), local_name!("id")), value: value.into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    selector!(PAGE_STYLE_SELECTOR, "style#page-fit");
    selector!(PAGE_SCRIPT_SELECTOR, "script#page-fit-script");

    fn count(document: &Html, selector: &Selector) -> usize {
        document.select(selector).count()
    }

    #[test]
    fn injects_style_page_rule_and_script() {
        let html = "<html><head></head><body>Hi</body></html>";
        let prepared = prepare(html, None).unwrap();
        let document = Html::parse_document(&prepared);
        assert_eq!(count(&document, &PAGE_STYLE_SELECTOR), 1);
        assert_eq!(count(&document, &PAGE_SCRIPT_SELECTOR), 1);
        assert!(prepared.contains("fit-content"));
        assert!(prepared.contains("1000px 1000px"));
        assert!(prepared.contains("Hi"));
    }

    #[rstest]
    #[case("just some text, no markup at all")]
    #[case("<p>paragraph without head or body tags</p>")]
    #[case("<html><body>no head written out</body></html>")]
    fn parser_implies_missing_structure(#[case] html: &str) {
        // html5ever inserts the implied <head>/<body>, so even fragments
        // come out as complete single-page documents.
        let prepared = prepare(html, None).unwrap();
        let document = Html::parse_document(&prepared);
        assert_eq!(count(&document, &PAGE_STYLE_SELECTOR), 1);
        assert_eq!(count(&document, &PAGE_SCRIPT_SELECTOR), 1);
    }

    #[test]
    fn custom_stylesheet_lands_in_head() {
        let stylesheet = Stylesheet::from_content("p { color: rebeccapurple; }");
        let prepared =
            prepare("<html><head></head><body><p>x</p></body></html>", Some(&stylesheet)).unwrap();
        let document = Html::parse_document(&prepared);
        let head = document.select(&HEAD_SELECTOR).next().unwrap();
        assert!(head.html().contains("rebeccapurple"));
    }

    #[test]
    fn preexisting_tagged_elements_are_replaced() {
        let html = r#"<html><head><style id="page-fit">@page { size: 5px 5px; }</style></head>
            <body><script id="page-fit-script">old()</script>content</body></html>"#;
        let prepared = prepare(html, None).unwrap();
        let document = Html::parse_document(&prepared);
        assert_eq!(count(&document, &PAGE_STYLE_SELECTOR), 1);
        assert_eq!(count(&document, &PAGE_SCRIPT_SELECTOR), 1);
        assert!(!prepared.contains("5px 5px"));
        assert!(!prepared.contains("old()"));
    }

    #[test]
    fn tagged_id_on_body_is_left_alone() {
        let html = r#"<html><head></head><body id="page-fit">content</body></html>"#;
        let prepared = prepare(html, None).unwrap();
        let document = Html::parse_document(&prepared);
        assert_eq!(count(&document, &PAGE_STYLE_SELECTOR), 1);
        assert_eq!(count(&document, &PAGE_SCRIPT_SELECTOR), 1);
        assert!(prepared.contains("content"));
    }

    #[test]
    fn tagged_id_on_head_is_left_alone() {
        let html = r#"<html><head id="page-fit-script"><title>t</title></head><body>x</body></html>"#;
        let prepared = prepare(html, None).unwrap();
        let document = Html::parse_document(&prepared);
        assert_eq!(count(&document, &PAGE_STYLE_SELECTOR), 1);
        assert_eq!(count(&document, &PAGE_SCRIPT_SELECTOR), 1);
        assert!(prepared.contains("<title>t</title>"));
        assert!(prepared.contains("1000px 1000px"));
    }

    #[test]
    fn script_rewrites_the_tagged_rule() {
        // The script addresses the style element by its id; keep the two in sync.
        assert!(PAGE_FIT_SCRIPT.contains(&format!("getElementById('{PAGE_STYLE_ID}')")));
        assert!(PAGE_FIT_SCRIPT.contains("+ 1 +"));
    }

    #[test]
    fn output_reparses_losslessly() {
        let html = "<html><head><title>t</title></head><body><p>a &amp; b</p></body></html>";
        let prepared = prepare(html, None).unwrap();
        // Preparing the prepared output again must not duplicate anything.
        let twice = prepare(&prepared, None).unwrap();
        let document = Html::parse_document(&twice);
        assert_eq!(count(&document, &PAGE_STYLE_SELECTOR), 1);
        assert_eq!(count(&document, &PAGE_SCRIPT_SELECTOR), 1);
        assert!(twice.contains("a &amp; b"));
    }
}
