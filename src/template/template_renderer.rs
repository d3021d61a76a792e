use log::error;
use minijinja::{context, Environment, Error as JinjaError};
use once_cell::sync::Lazy;
use serde::Serialize;
use thiserror::Error;

use super::editor_view::EditorView;
use super::results_view::ResultView;
use crate::models::RuleStore;
use crate::settings::Settings;

const CONTAINER_TEMPLATE: &str = "container.html";
const PAGE_TEMPLATE: &str = "page.html";
const RESULTS_TEMPLATE: &str = "results.html";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template render failed! Reason: {0}")]
    Template(#[from] JinjaError),
}

/// Page-level values around the rule container
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub title: String,
    pub pti: String,
    pub plmn: String,
    pub upsc: String,
    pub cooldown_ms: u64,
    pub log_level: String,
    pub backend_url: String,
    pub wasm_module: Option<String>,
}

impl PageContext {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            title: "URSP Rule Editor".to_string(),
            pti: settings.default_pti.clone(),
            plmn: settings.default_plmn.clone(),
            upsc: settings.default_upsc.clone(),
            cooldown_ms: settings.submit_cooldown_ms,
            log_level: settings.log_level.clone(),
            backend_url: settings.backend_url.clone(),
            wasm_module: settings.wasm_module.clone(),
        }
    }
}

/// Template environment, `.html` names are auto-escaped
static TEMPLATE_ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_filter("hex_octet", filter_hex_octet);

    let templates = [
        (CONTAINER_TEMPLATE, include_str!("templates/container.html")),
        (PAGE_TEMPLATE, include_str!("templates/page.html")),
        (RESULTS_TEMPLATE, include_str!("templates/results.html")),
    ];
    for (name, source) in templates {
        if let Err(e) = env.add_template(name, source) {
            error!("Failed to parse template {}: {}", name, e);
        }
    }
    env
});

fn render(name: &str, ctx: minijinja::Value) -> Result<String, RenderError> {
    let template = TEMPLATE_ENV.get_template(name)?;
    template.render(ctx).map_err(|e| {
        error!("Template render failed! Reason: {}", e);
        RenderError::from(e)
    })
}

/// Markup of the rule container, rebuilt from scratch on every call
pub fn render_rules(store: &RuleStore) -> Result<String, RenderError> {
    render(
        CONTAINER_TEMPLATE,
        context! { editor => EditorView::from_store(store) },
    )
}

/// The whole editor page with the current rules in place
pub fn render_page(store: &RuleStore, page: &PageContext) -> Result<String, RenderError> {
    render(
        PAGE_TEMPLATE,
        context! {
            editor => EditorView::from_store(store),
            page => page,
        },
    )
}

/// Markup of the result sections
pub fn render_results(result: &ResultView) -> Result<String, RenderError> {
    render(RESULTS_TEMPLATE, context! { result => result })
}

fn filter_hex_octet(value: u32) -> String {
    format!("{:02X}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_octet() {
        assert_eq!(filter_hex_octet(8), "08");
        assert_eq!(filter_hex_octet(0x1f), "1F");
    }

    #[test]
    fn test_all_templates_parse() {
        for name in [CONTAINER_TEMPLATE, PAGE_TEMPLATE, RESULTS_TEMPLATE] {
            assert!(TEMPLATE_ENV.get_template(name).is_ok(), "{} missing", name);
        }
    }
}
