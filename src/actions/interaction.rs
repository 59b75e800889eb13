use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Value, json};

use super::ActionResult;
use super::keys::Key;
use crate::dispatch::ActionArgs;
use crate::driver::ScriptArg;
use crate::error::ActionError;
use crate::session::Session;

const SCROLL_INTO_VIEW_SCRIPT: &str = "arguments[0].scrollIntoView(true);";
const SCROLL_BY_SCRIPT: &str = "window.scrollBy(arguments[0], arguments[1]);";

// Returns false when the element has no owning form.
const SUBMIT_SCRIPT: &str = r#"
const el = arguments[0];
const form = el.form || (el.tagName === "FORM" ? el : el.closest("form"));
if (!form) return false;
if (typeof form.requestSubmit === "function") {
  const submitter = (el !== form && (el.type === "submit" || el.type === "image")) ? el : undefined;
  form.requestSubmit(submitter);
} else {
  form.submit();
}
return true;
"#;

pub fn click(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let element = session.find(args.text("selector")?).await?;
        session.driver().click(&element).await?;
        Ok(Value::Null)
    }
    .boxed()
}

pub fn double_click(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let element = session.find(args.text("selector")?).await?;
        session.driver().double_click(&element).await?;
        Ok(Value::Null)
    }
    .boxed()
}

pub fn right_click(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let element = session.find(args.text("selector")?).await?;
        session.driver().context_click(&element).await?;
        Ok(Value::Null)
    }
    .boxed()
}

pub fn hover(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let element = session.find(args.text("selector")?).await?;
        session.driver().hover(&element).await?;
        Ok(Value::Null)
    }
    .boxed()
}

pub fn input_text(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let element = session.find(args.text("selector")?).await?;
        session.driver().send_keys(&element, args.text("text")?).await?;
        Ok(Value::Null)
    }
    .boxed()
}

pub fn clear_input(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let element = session.find(args.text("selector")?).await?;
        session.driver().clear(&element).await?;
        Ok(Value::Null)
    }
    .boxed()
}

/// Submit the form owning the element (or the form itself).
pub fn submit(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let selector = args.text("selector")?;
        let element = session.find(selector).await?;
        let submitted = session
            .driver()
            .execute_script(SUBMIT_SCRIPT, vec![ScriptArg::from(&element)])
            .await?;
        if submitted != Value::Bool(true) {
            return Err(ActionError::argument(
                "selector",
                format!("`{selector}` is not a form and is not inside one"),
            ));
        }
        Ok(Value::Null)
    }
    .boxed()
}

pub fn scroll_to(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let element = session.find(args.text("selector")?).await?;
        session
            .driver()
            .execute_script(SCROLL_INTO_VIEW_SCRIPT, vec![ScriptArg::from(&element)])
            .await?;
        Ok(Value::Null)
    }
    .boxed()
}

pub fn scroll_by(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let x = args.integer("x")?;
        let y = args.integer("y")?;
        session
            .driver()
            .execute_script(SCROLL_BY_SCRIPT, vec![json!(x).into(), json!(y).into()])
            .await?;
        Ok(Value::Null)
    }
    .boxed()
}

/// Send one key to the element matched by `selector`.
pub fn press_key(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let name = args.enumeration("key")?;
        let key = Key::from_name(name)
            .ok_or_else(|| ActionError::argument("key", format!("unknown key `{name}`")))?;
        let element = session.find(args.text("selector")?).await?;
        session
            .driver()
            .send_keys(&element, &key.code().to_string())
            .await?;
        Ok(Value::Null)
    }
    .boxed()
}
