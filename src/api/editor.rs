use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Promise};
use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlElement, HtmlInputElement,
    HtmlTextAreaElement,
};

use crate::constants::element_ids::{
    DECODE_BUTTON, DECODE_STATUS, ENCODE_BUTTON, ENCODE_STATUS, LOG_TEXT, PLMN, PTI,
    RESULT_SECTIONS, RESULT_TEXT, SAVE_BUTTON, SAVE_STATUS, UPSC, URSP_CONTAINER, URSP_COUNT,
};
use crate::interfaces::{
    prepare_decode, prepare_encode, save_results, send_decode, send_encode, SubmitContext,
    SubmitError, SubmitGate,
};
use crate::models::{EditorAction, Rerender, RuleStore};
use crate::settings::Settings;
use crate::template::{render_results, render_rules, ResultView};
use crate::utils::HttpBackend;
use crate::view::{binding_for, DomView, FormSnapshot};

struct EditorInner {
    document: Document,
    store: RefCell<RuleStore>,
    backend: HttpBackend,
    encode_gate: SubmitGate,
    decode_gate: SubmitGate,
    context: SubmitContext,
}

/// The rule editor mounted on the page
#[wasm_bindgen]
pub struct UrspEditor {
    inner: Rc<EditorInner>,
}

#[wasm_bindgen]
impl UrspEditor {
    /// Create an editor with one default rule. `backend_url` overrides the
    /// configured encoder address.
    #[wasm_bindgen(constructor)]
    pub fn new(backend_url: Option<String>) -> Result<UrspEditor, JsValue> {
        let settings = Settings::current();
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document available"))?;
        let backend = match backend_url {
            Some(url) => HttpBackend::new(&url),
            None => HttpBackend::from_settings(&settings),
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let inner = EditorInner {
            document,
            store: RefCell::new(RuleStore::with_limits(settings.limits())),
            backend,
            encode_gate: SubmitGate::new(settings.submit_cooldown_ms),
            decode_gate: SubmitGate::new(settings.submit_cooldown_ms),
            context: SubmitContext::from_settings(&settings),
        };
        Ok(UrspEditor {
            inner: Rc::new(inner),
        })
    }

    /// Rebuild the rule container from the store
    pub fn render(&self) {
        self.inner.rerender();
    }

    /// Render and wire every control of the page
    pub fn mount(&self) -> Result<(), JsValue> {
        let inner = &self.inner;
        inner.rerender();

        let on_change = {
            let inner = Rc::clone(inner);
            Closure::<dyn FnMut(Event)>::new(move |event: Event| inner.on_change(&event))
        };
        for id in [URSP_CONTAINER, URSP_COUNT] {
            inner
                .element(id)?
                .add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
        }
        on_change.forget();

        let buttons: [(&str, fn(Rc<EditorInner>) -> Promise); 3] = [
            (ENCODE_BUTTON, |inner| future_to_promise(inner.run_encode())),
            (DECODE_BUTTON, |inner| future_to_promise(inner.run_decode())),
            (SAVE_BUTTON, |inner| future_to_promise(inner.run_save())),
        ];
        for (id, run) in buttons {
            let inner_for_click = Rc::clone(inner);
            let on_click = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                let _ = run(Rc::clone(&inner_for_click));
            });
            inner
                .element(id)?
                .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
            on_click.forget();
        }

        debug!("URSP editor mounted");
        Ok(())
    }

    /// Apply an action given as a plain object, e.g.
    /// `{action: "set-rule-count", count: 2}`
    pub fn apply(&self, action: JsValue) -> Result<(), JsValue> {
        let action: EditorAction = serde_wasm_bindgen::from_value(action)?;
        self.inner
            .dispatch(&action)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// The rule set in the encoder's positional shape
    pub fn sections(&self) -> Result<JsValue, JsValue> {
        let sections = self.inner.store.borrow().sections();
        Ok(serde_wasm_bindgen::to_value(&sections)?)
    }

    pub fn encode(&self) -> Promise {
        future_to_promise(Rc::clone(&self.inner).run_encode())
    }

    pub fn decode(&self) -> Promise {
        future_to_promise(Rc::clone(&self.inner).run_decode())
    }

    pub fn save(&self) -> Promise {
        future_to_promise(Rc::clone(&self.inner).run_save())
    }
}

impl EditorInner {
    fn element(&self, id: &str) -> Result<Element, JsValue> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("Element #{} not found", id)))
    }

    fn input_value(&self, id: &str, fallback: &str) -> String {
        self.document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_else(|| fallback.to_string())
    }

    fn on_change(self: &Rc<Self>, event: &Event) {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let Some((binding, value)) = binding_for(&target) else {
            return;
        };
        match binding.to_action(&value) {
            Ok(action) => {
                if let Err(e) = self.dispatch(&action) {
                    warn!("{}", e);
                }
            }
            Err(e) => warn!("Ignoring control change: {}", e),
        }
    }

    fn dispatch(self: &Rc<Self>, action: &EditorAction) -> Result<(), String> {
        let rerender = self
            .store
            .borrow_mut()
            .apply(action)
            .map_err(|e| format!("Editor action {} failed: {}", action.name(), e))?;

        match rerender {
            Rerender::Immediate => self.rerender(),
            Rerender::Deferred => {
                let inner = Rc::clone(self);
                spawn_local(async move { inner.rerender() });
            }
            Rerender::CountOnly => match action {
                EditorAction::ToggleCapability { rule, .. } => self.update_capability_count(*rule),
                _ => self.rerender(),
            },
        }
        Ok(())
    }

    /// Refresh the "(n selected)" counter of a rule, leaving its open list alone
    fn update_capability_count(&self, rule: usize) {
        let selected = self
            .store
            .borrow()
            .rule(rule)
            .map_or(0, |r| r.capabilities().len());
        let selector = format!("[data-ursp-index=\"{}\"] .capabilities-count", rule);
        match self.document.query_selector(&selector) {
            Ok(Some(counter)) => {
                counter.set_text_content(Some(&format!("({} selected)", selected)))
            }
            _ => self.rerender(),
        }
    }

    fn rerender(&self) {
        let (markup, rule_count) = {
            let store = self.store.borrow();
            (render_rules(&store), store.rule_count())
        };
        let markup = match markup {
            Ok(markup) => markup,
            Err(e) => {
                error!("{}", e);
                return;
            }
        };

        match DomView::attach(&self.document, URSP_CONTAINER) {
            Some(view) => view.replace(&markup),
            None => error!("Element #{} not found", URSP_CONTAINER),
        }
        if let Some(count) = self
            .document
            .get_element_by_id(URSP_COUNT)
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            count.set_value(&rule_count.to_string());
        }
    }

    fn context(&self) -> SubmitContext {
        SubmitContext {
            pti: self.input_value(PTI, &self.context.pti),
            plmn: self.input_value(PLMN, &self.context.plmn),
            upsc: self.input_value(UPSC, &self.context.upsc),
        }
    }

    fn set_status(&self, id: &str, message: &str, class: &str) {
        if let Some(status) = self.document.get_element_by_id(id) {
            status.set_text_content(Some(message));
            let class_name = format!("status-message {}", class);
            status.set_class_name(class_name.trim_end());
        }
    }

    fn set_button_disabled(&self, id: &str, disabled: bool) {
        if let Some(button) = self
            .document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlButtonElement>().ok())
        {
            button.set_disabled(disabled);
        }
    }

    /// Keep the button disabled for the gate's cool-down after a request
    fn enable_after_cooldown(self: &Rc<Self>, id: &'static str, cooldown_ms: u64) {
        let inner = Rc::clone(self);
        let callback = Closure::once_into_js(move || inner.set_button_disabled(id, false));
        let scheduled = web_sys::window().map(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref::<Function>(),
                i32::try_from(cooldown_ms).unwrap_or(i32::MAX),
            )
        });
        if !matches!(scheduled, Some(Ok(_))) {
            self.set_button_disabled(id, false);
        }
    }

    fn show_results(&self, view: &ResultView) -> Result<(), JsValue> {
        match view {
            ResultView::Text { text } => {
                if let Ok(area) = self.element(RESULT_TEXT)?.dyn_into::<HtmlTextAreaElement>() {
                    area.set_value(text);
                }
            }
            ResultView::Sections { .. } => {
                let markup =
                    render_results(view).map_err(|e| JsValue::from_str(&e.to_string()))?;
                self.element(RESULT_SECTIONS)?.set_inner_html(&markup);
            }
        }
        if let Some(tab) = self
            .document
            .query_selector("[data-tab=\"result\"]")?
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        {
            tab.click();
        }
        Ok(())
    }

    fn report(
        &self,
        status_id: &str,
        result: Result<(&str, ResultView), SubmitError>,
    ) -> Result<JsValue, JsValue> {
        match result {
            Ok((message, view)) => {
                self.set_status(status_id, message, "success");
                self.show_results(&view)?;
                Ok(JsValue::TRUE)
            }
            Err(e) => {
                self.set_status(status_id, &e.to_string(), "error");
                Ok(JsValue::FALSE)
            }
        }
    }

    async fn run_encode(self: Rc<Self>) -> Result<JsValue, JsValue> {
        let Some(pass) = self.encode_gate.enter() else {
            debug!("Encode already in progress");
            return Ok(JsValue::FALSE);
        };
        self.set_button_disabled(ENCODE_BUTTON, true);
        self.set_status(ENCODE_STATUS, "Encoding...", "");

        let context = self.context();
        let prepared = {
            let mut store = self.store.borrow_mut();
            match DomView::attach(&self.document, URSP_CONTAINER) {
                Some(view) => prepare_encode(&mut store, &view, &context),
                None => {
                    warn!("Element #{} not found, encoding stored values", URSP_CONTAINER);
                    prepare_encode(&mut store, &FormSnapshot::new(), &context)
                }
            }
        };
        let result = match prepared {
            Ok(request) => send_encode(&self.backend, &request).await.map(|response| {
                (
                    "Encoding completed successfully!",
                    ResultView::from_encode(&response),
                )
            }),
            Err(e) => Err(e.into()),
        };
        drop(pass);

        self.enable_after_cooldown(ENCODE_BUTTON, self.encode_gate.cooldown_ms());
        self.report(ENCODE_STATUS, result)
    }

    async fn run_decode(self: Rc<Self>) -> Result<JsValue, JsValue> {
        let Some(pass) = self.decode_gate.enter() else {
            debug!("Decode already in progress");
            return Ok(JsValue::FALSE);
        };
        self.set_button_disabled(DECODE_BUTTON, true);

        let log_text = self
            .document
            .get_element_by_id(LOG_TEXT)
            .and_then(|e| e.dyn_into::<HtmlTextAreaElement>().ok())
            .map(|area| area.value())
            .unwrap_or_default();

        let result = match prepare_decode(&log_text) {
            Ok(request) => {
                self.set_status(DECODE_STATUS, "Decoding...", "");
                send_decode(&self.backend, &request).await.map(|response| {
                    (
                        "Decoding completed successfully!",
                        ResultView::from_decode(&response),
                    )
                })
            }
            Err(e) => Err(e.into()),
        };
        drop(pass);

        self.enable_after_cooldown(DECODE_BUTTON, self.decode_gate.cooldown_ms());
        self.report(DECODE_STATUS, result)
    }

    async fn run_save(self: Rc<Self>) -> Result<JsValue, JsValue> {
        match save_results(&self.backend).await {
            Ok(response) => {
                let saved = response
                    .path
                    .or(response.filename)
                    .unwrap_or_else(|| "policy command".to_string());
                self.set_status(SAVE_STATUS, &format!("Saved {}", saved), "success");
                Ok(JsValue::TRUE)
            }
            Err(e) => {
                self.set_status(SAVE_STATUS, &e.to_string(), "error");
                Ok(JsValue::FALSE)
            }
        }
    }
}
