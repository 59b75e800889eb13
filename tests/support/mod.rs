// Shared test helpers: an in-memory page and a fake Driver over it.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use browser_toolcalls::actions::{BROWSER_ACTIONS, DEFAULT_NAMESPACE};
use browser_toolcalls::catalog::build_catalog;
use browser_toolcalls::dispatch::Dispatcher;
use browser_toolcalls::driver::{Driver, DriverError, DriverResult, ElementHandle, ScriptArg};
use browser_toolcalls::resolver::synth::ANCESTRY_SCRIPT;
use browser_toolcalls::resolver::{Selector, SelectorKind};
use browser_toolcalls::session::{Session, SessionContext};

pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

/// Element description used to build a [`Page`].
#[derive(Debug, Clone, Default)]
pub struct El {
    tag: String,
    attrs: HashMap<String, String>,
    text: String,
    hidden: bool,
    disabled: bool,
    selected: bool,
}

impl El {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    el: El,
    parent: Option<usize>,
    children: Vec<usize>,
    clicks: usize,
    typed: String,
}

/// In-memory DOM: `html > body` plus whatever the test appends.
#[derive(Debug, Clone)]
pub struct Page {
    nodes: Vec<Node>,
}

impl Page {
    pub const HTML: usize = 0;
    pub const BODY: usize = 1;

    pub fn new() -> Self {
        let mut page = Self { nodes: Vec::new() };
        page.push(None, El::new("html"));
        page.push(Some(Self::HTML), El::new("body"));
        page
    }

    pub fn body(&self) -> usize {
        Self::BODY
    }

    /// Append `el` as the last child of `parent`; returns the new node id.
    pub fn append(&mut self, parent: usize, el: El) -> usize {
        self.push(Some(parent), el)
    }

    fn push(&mut self, parent: Option<usize>, el: El) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node {
            el,
            parent,
            children: Vec::new(),
            clicks: 0,
            typed: String::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    fn document_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Self::HTML];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        order
    }

    fn descendants(&self, root: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[root].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        out
    }

    fn same_tag_position(&self, id: usize) -> (usize, usize) {
        let Some(parent) = self.nodes[id].parent else {
            return (1, 1);
        };
        let tag = &self.nodes[id].el.tag;
        let siblings: Vec<usize> = self.nodes[parent]
            .children
            .iter()
            .copied()
            .filter(|&c| &self.nodes[c].el.tag == tag)
            .collect();
        let index = siblings.iter().position(|&c| c == id).map_or(1, |p| p + 1);
        (index, siblings.len())
    }

    fn text_of(&self, id: usize) -> String {
        let node = &self.nodes[id];
        if node.el.hidden {
            return String::new();
        }
        let mut parts = Vec::new();
        if !node.el.text.is_empty() {
            parts.push(node.el.text.clone());
        }
        for &child in &node.children {
            let text = self.text_of(child);
            if !text.is_empty() {
                parts.push(text);
            }
        }
        parts.join(" ")
    }

    fn outer_html(&self, id: usize) -> String {
        let node = &self.nodes[id];
        let mut attrs: Vec<_> = node.el.attrs.iter().collect();
        attrs.sort();
        let attrs: String = attrs
            .into_iter()
            .map(|(k, v)| format!(" {k}=\"{v}\""))
            .collect();
        let inner: String = node.children.iter().map(|&c| self.outer_html(c)).collect();
        format!("<{tag}{attrs}>{}{inner}</{tag}>", node.el.text, tag = node.el.tag)
    }

    fn in_form(&self, id: usize) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.nodes[node].el.tag == "form" {
                return true;
            }
            current = self.nodes[node].parent;
        }
        false
    }

    fn select(&self, selector: &Selector, scope: Option<usize>) -> Vec<usize> {
        let candidates = match scope {
            Some(root) => self.descendants(root),
            None => self.document_order(),
        };
        match selector.kind {
            SelectorKind::Css => {
                let chain = parse_css(&selector.value);
                candidates
                    .into_iter()
                    .filter(|&id| self.matches_chain(id, &chain))
                    .collect()
            }
            SelectorKind::Tag => candidates
                .into_iter()
                .filter(|&id| self.nodes[id].el.tag == selector.value)
                .collect(),
            SelectorKind::Id => candidates
                .into_iter()
                .filter(|&id| self.attr(id, "id") == Some(selector.value.as_str()))
                .collect(),
            SelectorKind::Name => candidates
                .into_iter()
                .filter(|&id| self.attr(id, "name") == Some(selector.value.as_str()))
                .collect(),
            SelectorKind::XPath => {
                // only the attribute-presence form `//*[@attr]` is modelled
                let attr = selector
                    .value
                    .strip_prefix("//*[@")
                    .and_then(|rest| rest.strip_suffix(']'))
                    .unwrap_or_default();
                candidates
                    .into_iter()
                    .filter(|&id| self.attr(id, attr).is_some())
                    .collect()
            }
        }
    }

    fn attr(&self, id: usize, name: &str) -> Option<&str> {
        self.nodes[id].el.attrs.get(name).map(String::as_str)
    }

    fn matches_chain(&self, id: usize, chain: &[(Combinator, Compound)]) -> bool {
        let Some(((combinator, compound), rest)) = chain.split_last() else {
            return true;
        };
        if !self.matches_compound(id, compound) {
            return false;
        }
        if rest.is_empty() {
            return true;
        }
        match combinator {
            Combinator::Child => self.nodes[id]
                .parent
                .is_some_and(|parent| self.matches_chain(parent, rest)),
            Combinator::Descendant => {
                let mut current = self.nodes[id].parent;
                while let Some(ancestor) = current {
                    if self.matches_chain(ancestor, rest) {
                        return true;
                    }
                    current = self.nodes[ancestor].parent;
                }
                false
            }
        }
    }

    fn matches_compound(&self, id: usize, compound: &Compound) -> bool {
        let node = &self.nodes[id];
        if let Some(tag) = &compound.tag
            && tag != "*"
            && *tag != node.el.tag
        {
            return false;
        }
        if let Some(want) = &compound.id
            && self.attr(id, "id") != Some(want.as_str())
        {
            return false;
        }
        for (name, value) in &compound.attrs {
            match (self.attr(id, name), value) {
                (None, _) => return false,
                (Some(actual), Some(want)) if actual != want => return false,
                _ => {}
            }
        }
        if let Some(n) = compound.nth_of_type
            && self.same_tag_position(id).0 != n
        {
            return false;
        }
        true
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum Combinator {
    Child,
    Descendant,
}

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    attrs: Vec<(String, Option<String>)>,
    nth_of_type: Option<usize>,
}

// Enough CSS for tests: tag, #id, [attr], [attr=value], [attr="value"],
// :nth-of-type(n), joined by " > " or whitespace.
fn parse_css(selector: &str) -> Vec<(Combinator, Compound)> {
    let mut chain = Vec::new();
    let mut next = Combinator::Descendant;
    for token in selector.split_whitespace() {
        if token == ">" {
            next = Combinator::Child;
            continue;
        }
        chain.push((next, parse_compound(token)));
        next = Combinator::Descendant;
    }
    chain
}

fn parse_compound(token: &str) -> Compound {
    let mut compound = Compound::default();
    let mut rest = token;

    let tag_end = rest.find(['#', '[', ':']).unwrap_or(rest.len());
    if tag_end > 0 {
        compound.tag = Some(rest[..tag_end].to_string());
    }
    rest = &rest[tag_end..];

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('#') {
            let end = after.find(['[', ':']).unwrap_or(after.len());
            compound.id = Some(after[..end].replace('\\', ""));
            rest = &after[end..];
        } else if let Some(after) = rest.strip_prefix('[') {
            let end = after.find(']').unwrap_or(after.len());
            let body = &after[..end];
            let attr = match body.split_once('=') {
                Some((name, value)) => (
                    name.trim().to_string(),
                    Some(value.trim().trim_matches('"').to_string()),
                ),
                None => (body.trim().to_string(), None),
            };
            compound.attrs.push(attr);
            rest = after.get(end + 1..).unwrap_or_default();
        } else if let Some(after) = rest.strip_prefix(":nth-of-type(") {
            let end = after.find(')').unwrap_or(after.len());
            compound.nth_of_type = after[..end].parse().ok();
            rest = after.get(end + 1..).unwrap_or_default();
        } else {
            break;
        }
    }

    compound
}

#[derive(Debug)]
struct State {
    page: Page,
    ready_states: VecDeque<String>,
    calls: Vec<String>,
    lookup_failure: Option<DriverError>,
    quit: bool,
}

/// Fake [`Driver`] over a [`Page`], recording every call it receives.
#[derive(Debug)]
pub struct FakeDriver {
    state: Mutex<State>,
}

impl FakeDriver {
    pub fn new(page: Page) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                page,
                ready_states: VecDeque::new(),
                calls: Vec::new(),
                lookup_failure: None,
                quit: false,
            }),
        })
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Values `document.readyState` reports before settling on "complete".
    pub fn queue_ready_states(&self, states: &[&str]) {
        self.state()
            .ready_states
            .extend(states.iter().map(|s| s.to_string()));
    }

    /// Make every `find_element` fail with `err` instead of searching the page.
    pub fn fail_lookups_with(&self, err: DriverError) {
        self.state().lookup_failure = Some(err);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Calls whose name starts with `prefix`.
    pub fn calls_to(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(prefix))
            .collect()
    }

    pub fn clicks(&self, node: usize) -> usize {
        self.state().page.nodes[node].clicks
    }

    pub fn is_checked(&self, node: usize) -> bool {
        self.state().page.nodes[node].el.selected
    }

    pub fn typed(&self, node: usize) -> String {
        self.state().page.nodes[node].typed.clone()
    }

    pub fn has_quit(&self) -> bool {
        self.state().quit
    }

    /// Mutate the page between calls, e.g. to simulate late rendering.
    pub fn with_page<R>(&self, f: impl FnOnce(&mut Page) -> R) -> R {
        f(&mut self.state().page)
    }

    fn record(&self, call: String) {
        self.state().calls.push(call);
    }

    fn node(&self, handle: &ElementHandle) -> DriverResult<usize> {
        let id: usize = handle.id().parse().map_err(|_| DriverError::StaleElement)?;
        if id < self.state().page.nodes.len() {
            Ok(id)
        } else {
            Err(DriverError::StaleElement)
        }
    }

    fn script_node(args: &[ScriptArg]) -> Option<usize> {
        match args.first() {
            Some(ScriptArg::Element(handle)) => handle.id().parse().ok(),
            _ => None,
        }
    }
}

fn handle(id: usize) -> ElementHandle {
    ElementHandle::new(id.to_string())
}

#[async_trait]
impl Driver for FakeDriver {
    async fn navigate(&self, url: &str) -> DriverResult<()> {
        self.record(format!("navigate {url}"));
        Ok(())
    }

    async fn refresh(&self) -> DriverResult<()> {
        self.record("refresh".to_string());
        Ok(())
    }

    async fn back(&self) -> DriverResult<()> {
        self.record("back".to_string());
        Ok(())
    }

    async fn forward(&self) -> DriverResult<()> {
        self.record("forward".to_string());
        Ok(())
    }

    async fn page_source(&self) -> DriverResult<String> {
        self.record("page_source".to_string());
        Ok(self.state().page.outer_html(Page::HTML))
    }

    async fn find_element(&self, selector: &Selector) -> DriverResult<ElementHandle> {
        self.record(format!("find_element {selector}"));
        let state = self.state();
        if let Some(err) = &state.lookup_failure {
            return Err(err.clone());
        }
        let found = state.page.select(selector, None);
        found
            .first()
            .map(|&id| handle(id))
            .ok_or_else(|| DriverError::NoSuchElement(selector.to_string()))
    }

    async fn find_elements(&self, selector: &Selector) -> DriverResult<Vec<ElementHandle>> {
        self.record(format!("find_elements {selector}"));
        Ok(self
            .state()
            .page
            .select(selector, None)
            .into_iter()
            .map(handle)
            .collect())
    }

    async fn find_within(
        &self,
        parent: &ElementHandle,
        selector: &Selector,
    ) -> DriverResult<Vec<ElementHandle>> {
        let parent = self.node(parent)?;
        self.record(format!("find_within {parent} {selector}"));
        Ok(self
            .state()
            .page
            .select(selector, Some(parent))
            .into_iter()
            .map(handle)
            .collect())
    }

    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> DriverResult<Value> {
        let target = Self::script_node(&args);
        let mut state = self.state();

        if script.contains("document.readyState") {
            state.calls.push("ready_state".to_string());
            let ready = state
                .ready_states
                .pop_front()
                .unwrap_or_else(|| "complete".to_string());
            return Ok(Value::String(ready));
        }

        if script == ANCESTRY_SCRIPT {
            state.calls.push("ancestry".to_string());
            let Some(mut current) = target else {
                return Ok(Value::Null);
            };
            let page = &state.page;
            let mut steps = Vec::new();
            loop {
                let node = &page.nodes[current];
                let id = page.attr(current, "id").map(str::to_string);
                let (index, count) = if id.is_some() {
                    (1, 1)
                } else {
                    page.same_tag_position(current)
                };
                steps.push(json!({
                    "tag": node.el.tag,
                    "id": id,
                    "index": index,
                    "count": count,
                }));
                if id.is_some() {
                    break;
                }
                match node.parent {
                    Some(parent) => current = parent,
                    None => break,
                }
            }
            return Ok(Value::Array(steps));
        }

        state.calls.push(format!(
            "script {}",
            script.split_whitespace().collect::<Vec<_>>().join(" ")
        ));

        if script.contains("requestSubmit") {
            return Ok(Value::Bool(target.is_some_and(|id| state.page.in_form(id))));
        }
        if script.contains("innerText") {
            return Ok(match target {
                Some(id) => match state.page.attr(id, "value") {
                    Some(value) => Value::String(value.to_string()),
                    None => Value::String(state.page.text_of(id)),
                },
                None => Value::Null,
            });
        }
        Ok(Value::Null)
    }

    async fn click(&self, element: &ElementHandle) -> DriverResult<()> {
        let id = self.node(element)?;
        let mut state = self.state();
        state.calls.push(format!("click {id}"));
        let node = &mut state.page.nodes[id];
        node.clicks += 1;
        let kind = node.el.attrs.get("type").map(String::as_str);
        match (node.el.tag.as_str(), kind) {
            ("input", Some("checkbox")) => node.el.selected = !node.el.selected,
            ("input", Some("radio")) | ("option", _) => node.el.selected = true,
            _ => {}
        }
        Ok(())
    }

    async fn double_click(&self, element: &ElementHandle) -> DriverResult<()> {
        let id = self.node(element)?;
        self.record(format!("double_click {id}"));
        Ok(())
    }

    async fn context_click(&self, element: &ElementHandle) -> DriverResult<()> {
        let id = self.node(element)?;
        self.record(format!("context_click {id}"));
        Ok(())
    }

    async fn hover(&self, element: &ElementHandle) -> DriverResult<()> {
        let id = self.node(element)?;
        self.record(format!("hover {id}"));
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> DriverResult<()> {
        let id = self.node(element)?;
        let mut state = self.state();
        state.calls.push(format!("send_keys {id}"));
        state.page.nodes[id].typed.push_str(text);
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> DriverResult<()> {
        let id = self.node(element)?;
        let mut state = self.state();
        state.calls.push(format!("clear {id}"));
        state.page.nodes[id].typed.clear();
        Ok(())
    }

    async fn attribute(&self, element: &ElementHandle, name: &str) -> DriverResult<Option<String>> {
        let id = self.node(element)?;
        let state = self.state();
        if name == "outerHTML" {
            return Ok(Some(state.page.outer_html(id)));
        }
        Ok(state.page.attr(id, name).map(str::to_string))
    }

    async fn text(&self, element: &ElementHandle) -> DriverResult<String> {
        let id = self.node(element)?;
        Ok(self.state().page.text_of(id))
    }

    async fn tag_name(&self, element: &ElementHandle) -> DriverResult<String> {
        let id = self.node(element)?;
        Ok(self.state().page.nodes[id].el.tag.clone())
    }

    async fn is_displayed(&self, element: &ElementHandle) -> DriverResult<bool> {
        let id = self.node(element)?;
        Ok(!self.state().page.nodes[id].el.hidden)
    }

    async fn is_enabled(&self, element: &ElementHandle) -> DriverResult<bool> {
        let id = self.node(element)?;
        Ok(!self.state().page.nodes[id].el.disabled)
    }

    async fn is_selected(&self, element: &ElementHandle) -> DriverResult<bool> {
        let id = self.node(element)?;
        Ok(self.state().page.nodes[id].el.selected)
    }

    async fn screenshot(&self) -> DriverResult<Vec<u8>> {
        self.record("screenshot".to_string());
        Ok(FAKE_PNG.to_vec())
    }

    async fn element_screenshot(&self, element: &ElementHandle) -> DriverResult<Vec<u8>> {
        let id = self.node(element)?;
        self.record(format!("element_screenshot {id}"));
        Ok(FAKE_PNG.to_vec())
    }

    async fn quit(&self) -> DriverResult<()> {
        let mut state = self.state();
        state.calls.push("quit".to_string());
        state.quit = true;
        Ok(())
    }
}

/// Dispatcher over the full browser action table, backed by `driver`.
pub fn dispatcher(driver: Arc<FakeDriver>) -> Dispatcher {
    let catalog = Arc::new(build_catalog(BROWSER_ACTIONS, DEFAULT_NAMESPACE));
    let session = Session::new(driver);
    Dispatcher::new(catalog, SessionContext::new(session))
}

/// JSON object literal to an argument map.
pub fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
