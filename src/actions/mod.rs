//! Browser actions and the table that registers them.
//!
//! [`BROWSER_ACTIONS`] is the single source of truth for what is advertised:
//! each row pairs a handler with its declared signature and documentation, and
//! [`crate::catalog::build_catalog`] derives the tool schemas from it.

pub mod capture;
pub mod extraction;
pub mod forms;
pub mod interaction;
pub mod keys;
pub mod navigation;
pub mod waiting;

use std::time::Duration;

use serde_json::Value;

use crate::catalog::{ActionDef, ActionDoc, DeclaredParam, DeclaredType, Handler, ParamDoc};
use crate::dispatch::ActionArgs;
use crate::error::ActionError;
use crate::resolver::TextMatch;

pub use keys::Key;

pub type ActionResult = Result<Value, ActionError>;

/// Default namespace for [`BROWSER_ACTIONS`].
pub const DEFAULT_NAMESPACE: &str = "browser";

const SELECTOR: DeclaredParam = DeclaredParam::required("selector", DeclaredType::Text);
const SELECTOR_DOC: ParamDoc = ParamDoc::new("selector", "CSS selector for the target element.");
const TIMEOUT: DeclaredParam = DeclaredParam::required("timeout", DeclaredType::Float);
const TIMEOUT_DOC: ParamDoc = ParamDoc::new("timeout", "seconds to wait before giving up.");
const PATH: DeclaredParam = DeclaredParam::defaulted("path", DeclaredType::Optional(&DeclaredType::Text));
const PATH_DOC: ParamDoc = ParamDoc::new(
    "path",
    "file to write the PNG to. When omitted the image is returned base64-encoded.",
);

const fn def(
    name: &'static str,
    signature: &'static [DeclaredParam],
    description: &'static str,
    params: &'static [ParamDoc],
    handler: Handler,
) -> ActionDef {
    ActionDef {
        name,
        signature,
        doc: ActionDoc {
            description,
            params,
        },
        handler,
    }
}

/// Every browser action, in advertised order.
pub static BROWSER_ACTIONS: &[ActionDef] = &[
    // navigation
    def(
        "navigate",
        &[DeclaredParam::required("url", DeclaredType::Text)],
        "navigates to the specified URL and waits for the page to finish loading.",
        &[ParamDoc::new("url", "url to navigate to.")],
        navigation::navigate,
    ),
    def("reload", &[], "reloads the current page.", &[], navigation::reload),
    def("go_back", &[], "goes to the previous page in history.", &[], navigation::go_back),
    def("go_forward", &[], "goes to the next page in history.", &[], navigation::go_forward),
    // interaction
    def(
        "click",
        &[SELECTOR],
        "clicks on the first matching element.",
        &[SELECTOR_DOC],
        interaction::click,
    ),
    def(
        "double_click",
        &[SELECTOR],
        "double-clicks the element.",
        &[SELECTOR_DOC],
        interaction::double_click,
    ),
    def(
        "right_click",
        &[SELECTOR],
        "right-clicks the element.",
        &[SELECTOR_DOC],
        interaction::right_click,
    ),
    def(
        "input_text",
        &[SELECTOR, DeclaredParam::required("text", DeclaredType::Text)],
        "types text into an input field.",
        &[SELECTOR_DOC, ParamDoc::new("text", "the text to input into the element.")],
        interaction::input_text,
    ),
    def(
        "clear_input",
        &[SELECTOR],
        "clears the input field.",
        &[SELECTOR_DOC],
        interaction::clear_input,
    ),
    def(
        "submit",
        &[SELECTOR],
        "submits a form, or the form that owns the element.",
        &[SELECTOR_DOC],
        interaction::submit,
    ),
    def("hover", &[SELECTOR], "hovers over an element.", &[SELECTOR_DOC], interaction::hover),
    def(
        "scroll_to",
        &[SELECTOR],
        "scrolls to the element.",
        &[SELECTOR_DOC],
        interaction::scroll_to,
    ),
    def(
        "scroll_by",
        &[
            DeclaredParam::required("x", DeclaredType::Integer),
            DeclaredParam::required("y", DeclaredType::Integer),
        ],
        "scrolls by a pixel amount.",
        &[
            ParamDoc::new("x", "the pixel amount to scroll on X."),
            ParamDoc::new("y", "the pixel amount to scroll on Y."),
        ],
        interaction::scroll_by,
    ),
    def(
        "press_key",
        &[SELECTOR, DeclaredParam::required("key", DeclaredType::Enum(Key::NAMES))],
        "simulates a keyboard key press on the element.",
        &[SELECTOR_DOC, ParamDoc::new("key", "a key on the keyboard.")],
        interaction::press_key,
    ),
    // extraction
    def(
        "element_exists",
        &[SELECTOR],
        "returns whether the selector matches any element.",
        &[SELECTOR_DOC],
        extraction::element_exists,
    ),
    def(
        "get_text",
        &[SELECTOR],
        "returns inner text of the element.",
        &[SELECTOR_DOC],
        extraction::get_text,
    ),
    def(
        "get_all_text",
        &[],
        "returns all visible text on the page.",
        &[],
        extraction::get_all_text,
    ),
    def("get_html", &[], "returns the full page HTML.", &[], extraction::get_html),
    def(
        "get_outer_html",
        &[SELECTOR],
        "returns outer HTML of an element.",
        &[SELECTOR_DOC],
        extraction::get_outer_html,
    ),
    def(
        "get_attr",
        &[SELECTOR, DeclaredParam::required("attribute", DeclaredType::Text)],
        "returns a specific attribute (e.g., href, src).",
        &[SELECTOR_DOC, ParamDoc::new("attribute", "the attribute to get on the element.")],
        extraction::get_attr,
    ),
    def(
        "get_value",
        &[SELECTOR],
        "returns value of an input field.",
        &[SELECTOR_DOC],
        extraction::get_value,
    ),
    def(
        "get_tag",
        &[SELECTOR],
        "returns the tag name of the element.",
        &[SELECTOR_DOC],
        extraction::get_tag,
    ),
    def(
        "list_links",
        &[],
        "returns all <a> tags as {text, href}.",
        &[],
        extraction::list_links,
    ),
    def(
        "list_buttons",
        &[],
        "returns selectors of all visible <button> or clickable elements.",
        &[],
        extraction::list_buttons,
    ),
    def(
        "list_inputs",
        &[],
        "returns selectors of all visible <input> and <textarea> elements.",
        &[],
        extraction::list_inputs,
    ),
    def(
        "list_elements",
        &[SELECTOR],
        "returns selectors of every matching element.",
        &[SELECTOR_DOC],
        extraction::list_elements,
    ),
    // forms
    def(
        "select_option",
        &[SELECTOR, DeclaredParam::required("value", DeclaredType::Text)],
        "selects an <option> inside a <select> by its value attribute.",
        &[SELECTOR_DOC, ParamDoc::new("value", "value of the option to select.")],
        forms::select_option,
    ),
    def("check", &[SELECTOR], "checks a checkbox.", &[SELECTOR_DOC], forms::check),
    def("uncheck", &[SELECTOR], "unchecks a checkbox.", &[SELECTOR_DOC], forms::uncheck),
    def(
        "toggle",
        &[SELECTOR],
        "toggles checkbox/radio/switch.",
        &[SELECTOR_DOC],
        forms::toggle,
    ),
    def(
        "set_checkbox",
        &[SELECTOR, DeclaredParam::required("state", DeclaredType::Boolean)],
        "sets checkbox to true/false.",
        &[SELECTOR_DOC, ParamDoc::new("state", "the checkbox state to set it as.")],
        forms::set_checkbox,
    ),
    // waiting
    def(
        "wait_for",
        &[SELECTOR, TIMEOUT],
        "waits for selector to exist or timeout.",
        &[SELECTOR_DOC, TIMEOUT_DOC],
        waiting::wait_for,
    ),
    def(
        "wait_until_text",
        &[
            SELECTOR,
            DeclaredParam::required("text", DeclaredType::Text),
            TIMEOUT,
            DeclaredParam::defaulted("match_mode", DeclaredType::Enum(TextMatch::NAMES)),
        ],
        "waits for element text to match.",
        &[
            SELECTOR_DOC,
            ParamDoc::new("text", "a substring or a regex pattern."),
            TIMEOUT_DOC,
            ParamDoc::new(
                "match_mode",
                "AUTO (full-match regex when text is a valid pattern, substring otherwise), \
                 PATTERN or SUBSTRING. Defaults to AUTO.",
            ),
        ],
        waiting::wait_until_text,
    ),
    def(
        "sleep",
        &[DeclaredParam::required("seconds", DeclaredType::Float)],
        "pauses execution for N seconds.",
        &[ParamDoc::new("seconds", "how long to pause.")],
        waiting::sleep,
    ),
    // capture
    def(
        "screenshot",
        &[PATH],
        "takes a screenshot of the viewport (base64 or path).",
        &[PATH_DOC],
        capture::screenshot,
    ),
    def(
        "element_screenshot",
        &[SELECTOR, PATH],
        "screenshots a specific element (base64 or path).",
        &[SELECTOR_DOC, PATH_DOC],
        capture::element_screenshot,
    ),
];

/// Non-negative duration argument given in seconds.
pub(crate) fn duration_arg(args: &ActionArgs, name: &str) -> Result<Duration, ActionError> {
    let seconds = args.number(name)?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ActionError::argument(name, "must be a non-negative number of seconds"));
    }
    Duration::try_from_secs_f64(seconds)
        .map_err(|e| ActionError::argument(name, e.to_string()))
}
