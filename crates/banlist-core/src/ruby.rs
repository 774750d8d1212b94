//! Ruby (furigana) stripping for Japanese card names.
//!
//! The reference database writes readings inline, e.g.
//! `<ruby>強欲<rt>ごうよく</rt></ruby>な<ruby>壺<rt>つぼ</rt></ruby>`, while
//! regulatory lists carry only the base text.

use scraper::{ElementRef, Html, Node};
use tracing::warn;

/// Base text recovered from a ruby-annotated name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RubyBase {
    pub text: String,
    /// Human-readable descriptions of nodes that did not have the expected
    /// shape. Their full text content is kept in `text`.
    pub anomalies: Vec<String>,
}

/// Keep only base text: top-level text nodes plus the first child of each
/// well-formed `<ruby>base<rt>reading</rt></ruby>`.
///
/// Never fails. Anything unexpected is logged and contributes its whole text
/// content, so a malformed name stays visibly wrong instead of vanishing.
pub fn strip_ruby(html: &str) -> RubyBase {
    let fragment = Html::parse_fragment(html);
    let mut text = String::new();
    let mut anomalies = Vec::new();

    for node in fragment.root_element().children() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(element) if element.name() == "ruby" => {
                let children: Vec<_> = node.children().collect();
                let base = match children.as_slice() {
                    [rb, rt] => match (rb.value(), rt.value()) {
                        (Node::Text(base), Node::Element(tag))
                            if tag.name() == "rt"
                                && rt.children().count() == 1
                                && rt.children().all(|c| c.value().is_text()) =>
                        {
                            Some(String::from(&**base))
                        }
                        _ => None,
                    },
                    _ => None,
                };
                match base {
                    Some(base) => text.push_str(&base),
                    None => {
                        let anomaly = format!(
                            "unexpected <ruby> children ({} nodes)",
                            children.len()
                        );
                        warn!(name = html, "{anomaly}");
                        anomalies.push(anomaly);
                        if let Some(el) = ElementRef::wrap(node) {
                            text.extend(el.text());
                        }
                    }
                }
            }
            Node::Element(element) => {
                let anomaly = format!("unexpected element <{}>", element.name());
                warn!(name = html, "{anomaly}");
                anomalies.push(anomaly);
                if let Some(el) = ElementRef::wrap(node) {
                    text.extend(el.text());
                }
            }
            _ => {
                let anomaly = "unexpected node type".to_string();
                warn!(name = html, "{anomaly}");
                anomalies.push(anomaly);
            }
        }
    }

    RubyBase { text, anomalies }
}

/// Convenience wrapper returning only the text.
pub fn base_text(html: &str) -> String {
    strip_ruby(html).text
}
