//! Reconstructable selector strings for resolved elements.
//!
//! Handles do not survive the trip to the client, so list-returning actions
//! hand back a CSS path instead. The page only reports the element's ancestry;
//! the path itself is composed here.

use serde::Deserialize;

use crate::driver::{Driver, DriverError, ElementHandle, ScriptArg};
use crate::error::ActionError;

/// Collects `{tag, id, index, count}` for the element and its ancestors,
/// leaf first, stopping at the first node that carries an id.
pub const ANCESTRY_SCRIPT: &str = r#"
const el = arguments[0];
if (!(el instanceof Element)) return null;
const steps = [];
let node = el;
while (node && node.nodeType === 1) {
  const step = { tag: node.nodeName.toLowerCase(), id: node.id || null, index: 1, count: 1 };
  if (!node.id && node.parentNode) {
    const siblings = Array.from(node.parentNode.children)
      .filter(e => e.nodeName === node.nodeName);
    step.count = siblings.length;
    step.index = siblings.indexOf(node) + 1;
  }
  steps.push(step);
  if (node.id) break;
  node = node.parentNode;
}
return steps;
"#;

/// One level of an element's ancestry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AncestorStep {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    /// 1-based position among same-tag siblings
    pub index: usize,
    /// number of same-tag siblings, including this node
    pub count: usize,
}

/// Build the selector string from leaf-first ancestry.
///
/// A node with an id terminates the path as `tag#id`. Other nodes get
/// `:nth-of-type(n)` only when their parent has more than one child of the
/// same tag. Levels are joined root-first with `" > "`.
pub fn compose(leaf_first: &[AncestorStep]) -> String {
    let mut parts = Vec::with_capacity(leaf_first.len());

    for step in leaf_first {
        let tag = step.tag.to_ascii_lowercase();
        match step.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => {
                parts.push(format!("{tag}#{}", css_escape(id)));
                break;
            }
            None if step.count > 1 => parts.push(format!("{tag}:nth-of-type({})", step.index)),
            None => parts.push(tag),
        }
    }

    parts.reverse();
    parts.join(" > ")
}

/// Synthesize a selector that re-resolves to `element` while the DOM is unchanged.
pub async fn synthesize_selector(
    driver: &dyn Driver,
    element: &ElementHandle,
) -> Result<String, ActionError> {
    let value = driver
        .execute_script(ANCESTRY_SCRIPT, vec![ScriptArg::from(element)])
        .await?;
    if value.is_null() {
        return Err(DriverError::Script("target is not an element".to_string()).into());
    }
    let steps: Vec<AncestorStep> = serde_json::from_value(value)
        .map_err(|e| DriverError::Script(format!("unexpected ancestry payload: {e}")))?;
    Ok(compose(&steps))
}

/// Escape an identifier the way `CSS.escape` does.
pub fn css_escape(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let chars: Vec<char> = ident.chars().collect();

    if chars.len() == 1 && chars[0] == '-' {
        return "\\-".to_string();
    }

    for (i, &c) in chars.iter().enumerate() {
        let leading_digit =
            c.is_ascii_digit() && (i == 0 || (i == 1 && chars[0] == '-'));
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => out.push_str(&format!("\\{:x} ", c as u32)),
            _ if leading_digit => out.push_str(&format!("\\{:x} ", c as u32)),
            _ if c as u32 >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() => {
                out.push(c)
            }
            _ => {
                out.push('\\');
                out.push(c);
            }
        }
    }

    out
}

/// Quote a value as a CSS string literal.
pub fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => out.push_str(&format!("\\{:x} ", c as u32)),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(tag: &str, id: Option<&str>, index: usize, count: usize) -> AncestorStep {
        AncestorStep {
            tag: tag.to_string(),
            id: id.map(str::to_string),
            index,
            count,
        }
    }

    #[test]
    fn id_terminates_the_path() {
        let steps = [
            step("button", None, 2, 3),
            step("div", None, 1, 1),
            step("form", Some("login"), 1, 1),
            step("body", None, 1, 1),
        ];
        assert_eq!(compose(&steps), "form#login > div > button:nth-of-type(2)");
    }

    #[test]
    fn full_path_to_root_without_ids() {
        let steps = [
            step("li", None, 3, 3),
            step("ul", None, 1, 1),
            step("body", None, 1, 1),
            step("html", None, 1, 1),
        ];
        assert_eq!(compose(&steps), "html > body > ul > li:nth-of-type(3)");
    }

    #[test]
    fn element_with_own_id() {
        assert_eq!(compose(&[step("input", Some("email"), 1, 4)]), "input#email");
    }

    #[test]
    fn empty_id_is_ignored() {
        assert_eq!(
            compose(&[step("P", Some(""), 1, 1), step("body", None, 1, 1)]),
            "body > p"
        );
    }

    #[test]
    fn escapes_like_css_escape() {
        assert_eq!(css_escape("main"), "main");
        assert_eq!(css_escape("1st"), "\\31 st");
        assert_eq!(css_escape("-2x"), "-\\32 x");
        assert_eq!(css_escape("-"), "\\-");
        assert_eq!(css_escape("a.b:c"), "a\\.b\\:c");
        assert_eq!(css_escape("naïve"), "naïve");
    }

    #[test]
    fn quotes_css_strings() {
        assert_eq!(css_string("plain"), "\"plain\"");
        assert_eq!(css_string("say \"hi\""), "\"say \\\"hi\\\"\"");
    }
}
