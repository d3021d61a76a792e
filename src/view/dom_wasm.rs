use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement};

use super::{ActionBinding, FieldState, FormView};
use crate::models::FieldPath;

/// The rendered rule container in the browser DOM
pub struct DomView {
    container: Element,
}

impl DomView {
    pub fn new(container: Element) -> Self {
        Self { container }
    }

    /// Look up the container element by id
    pub fn attach(document: &Document, container_id: &str) -> Option<Self> {
        let container = document.get_element_by_id(container_id)?;
        Some(Self::new(container))
    }

    /// Replace the container content with freshly rendered markup
    pub fn replace(&self, markup: &str) {
        self.container.set_inner_html(markup);
        debug!("Rule container re-rendered ({} bytes)", markup.len());
    }
}

impl FormView for DomView {
    fn field(&self, path: &FieldPath) -> Option<FieldState> {
        let selector = format!("[name=\"{}\"]", path.name());
        let element = self.container.query_selector(&selector).ok()??;
        let input = element.dyn_into::<HtmlInputElement>().ok()?;
        Some(FieldState {
            value: input.value(),
            disabled: input.disabled(),
        })
    }
}

/// Read the action binding and committed value of an event target.
///
/// Walks up from `target` to the nearest element carrying `data-action`.
pub fn binding_for(target: &Element) -> Option<(ActionBinding, String)> {
    let element = target.closest("[data-action]").ok()??;
    let action = element.get_attribute("data-action")?;
    let index = |attr: &str| {
        element
            .get_attribute(attr)
            .and_then(|v| v.parse::<usize>().ok())
    };

    let binding = ActionBinding {
        action,
        rule: index("data-rule"),
        descriptor: index("data-descriptor"),
        content: index("data-content"),
        capability: element.get_attribute("data-capability"),
        name: element.get_attribute("name"),
    };
    Some((binding, control_value(&element)))
}

fn control_value(element: &Element) -> String {
    if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        return select.value();
    }
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    String::new()
}
