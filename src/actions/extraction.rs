use std::collections::HashSet;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

use super::ActionResult;
use crate::dispatch::ActionArgs;
use crate::driver::{ElementHandle, ScriptArg};
use crate::error::ActionError;
use crate::resolver::Selector;
use crate::session::Session;

const VALUE_SCRIPT: &str = r#"
if (arguments[0].value !== undefined && arguments[0].value !== null) return arguments[0].value;
return arguments[0].innerText;
"#;

#[derive(Debug, Serialize)]
struct Link {
    text: String,
    href: Option<String>,
}

/// Whether `selector` matches anything. Never fails.
pub fn element_exists(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let exists = match args.text("selector") {
            Ok(selector) => session.find(selector).await.is_ok(),
            Err(_) => false,
        };
        Ok(Value::Bool(exists))
    }
    .boxed()
}

pub fn get_text(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let element = session.find(args.text("selector")?).await?;
        Ok(Value::String(session.driver().text(&element).await?))
    }
    .boxed()
}

/// Visible text of `<body>`.
pub fn get_all_text(session: &Session, _args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let body = session.find("body").await?;
        Ok(Value::String(session.driver().text(&body).await?))
    }
    .boxed()
}

pub fn get_html(session: &Session, _args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move { Ok(Value::String(session.driver().page_source().await?)) }.boxed()
}

pub fn get_outer_html(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let element = session.find(args.text("selector")?).await?;
        let html = session.driver().attribute(&element, "outerHTML").await?;
        Ok(Value::String(html.unwrap_or_default()))
    }
    .boxed()
}

/// Attribute value, or `null` when the element has no such attribute.
pub fn get_attr(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let element = session.find(args.text("selector")?).await?;
        let value = session
            .driver()
            .attribute(&element, args.text("attribute")?)
            .await?;
        Ok(value.map(Value::String).unwrap_or(Value::Null))
    }
    .boxed()
}

/// `value` property for form controls, inner text for anything else.
pub fn get_value(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let element = session.find(args.text("selector")?).await?;
        let value = session
            .driver()
            .execute_script(VALUE_SCRIPT, vec![ScriptArg::from(&element)])
            .await?;
        Ok(value)
    }
    .boxed()
}

pub fn get_tag(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let element = session.find(args.text("selector")?).await?;
        Ok(Value::String(session.driver().tag_name(&element).await?))
    }
    .boxed()
}

/// Every `<a>` on the page as `{text, href}`.
pub fn list_links(session: &Session, _args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let driver = session.driver();
        let mut links = Vec::new();
        for anchor in session.find_all(&Selector::tag("a")).await? {
            links.push(Link {
                text: driver.text(&anchor).await?,
                href: driver.attribute(&anchor, "href").await?,
            });
        }
        Ok(serde_json::to_value(links).unwrap_or(Value::Null))
    }
    .boxed()
}

/// Selectors of visible, enabled buttons and `onclick` elements.
pub fn list_buttons(session: &Session, _args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let mut candidates = session.find_all(&Selector::tag("button")).await?;
        candidates.extend(session.find_all(&Selector::xpath("//*[@onclick]")).await?);
        let interactive = interactive_only(session, candidates).await?;
        Ok(Value::from(unique_selectors(session, &interactive).await?))
    }
    .boxed()
}

/// Selectors of visible, enabled `<input>` and `<textarea>` elements.
pub fn list_inputs(session: &Session, _args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let mut candidates = session.find_all(&Selector::tag("input")).await?;
        candidates.extend(session.find_all(&Selector::tag("textarea")).await?);
        let interactive = interactive_only(session, candidates).await?;
        Ok(Value::from(unique_selectors(session, &interactive).await?))
    }
    .boxed()
}

pub fn list_elements(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let matches = session.find_all(&Selector::css(args.text("selector")?)).await?;
        Ok(Value::from(unique_selectors(session, &matches).await?))
    }
    .boxed()
}

async fn interactive_only(
    session: &Session,
    elements: Vec<ElementHandle>,
) -> Result<Vec<ElementHandle>, ActionError> {
    let driver = session.driver();
    let mut kept = Vec::with_capacity(elements.len());
    for element in elements {
        if driver.is_displayed(&element).await? && driver.is_enabled(&element).await? {
            kept.push(element);
        }
    }
    Ok(kept)
}

// First occurrence wins; a node matched by two lookups is listed once.
async fn unique_selectors(
    session: &Session,
    elements: &[ElementHandle],
) -> Result<Vec<String>, ActionError> {
    let mut seen = HashSet::with_capacity(elements.len());
    let mut selectors = Vec::with_capacity(elements.len());
    for element in elements {
        let selector = session.selector_for(element).await?;
        if seen.insert(selector.clone()) {
            selectors.push(selector);
        }
    }
    Ok(selectors)
}
