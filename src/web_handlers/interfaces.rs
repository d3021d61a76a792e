use std::sync::Arc;

use actix_web::{http::StatusCode, web, HttpResponse};
use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, BackendService};
use crate::interfaces::{prepare_decode, prepare_encode, save_results, send_decode, send_encode};
use crate::interfaces::{SubmitContext, SubmitError};
use crate::models::{AppState, EditorAction, Rerender};
use crate::template::{
    render_page, render_results, render_rules, PageContext, RenderError, ResultView,
};
use crate::view::{ActionBinding, FormSnapshot};

/// Body of `POST /editor/action`: a ready action, or a control binding
/// plus the value it committed
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ActionRequest {
    Action(EditorAction),
    Bound { binding: ActionBinding, value: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionReply {
    pub markup: String,
    pub rule_count: usize,
    pub rerender: Rerender,
}

/// Body of `POST /editor/encode`
#[derive(Debug, Clone, Deserialize)]
pub struct EncodeForm {
    #[serde(flatten)]
    pub context: SubmitContext,
    #[serde(default)]
    pub fields: FormSnapshot,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecodeForm {
    #[serde(default)]
    pub log_text: String,
}

/// Outcome of a submit, shown in the status line and the result tab
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitReply {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_text: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorReply {
    error: String,
}

fn error_reply(status: StatusCode, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorReply { error: message })
}

fn render_failed(e: RenderError) -> HttpResponse {
    error!("{}", e);
    error_reply(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn submit_failed(e: SubmitError) -> HttpResponse {
    let status = match &e {
        SubmitError::Validation(_) => StatusCode::BAD_REQUEST,
        SubmitError::Busy => StatusCode::TOO_MANY_REQUESTS,
        SubmitError::Backend(BackendError::Rejected(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitError::Backend(_) => StatusCode::BAD_GATEWAY,
    };
    HttpResponse::build(status).json(SubmitReply {
        success: false,
        message: e.to_string(),
        ..Default::default()
    })
}

fn results_reply(message: &str, view: ResultView) -> HttpResponse {
    let reply = match &view {
        ResultView::Text { text } => SubmitReply {
            success: true,
            message: message.to_string(),
            results_html: None,
            result_text: Some(text.clone()),
        },
        ResultView::Sections { .. } => match render_results(&view) {
            Ok(html) => SubmitReply {
                success: true,
                message: message.to_string(),
                results_html: Some(html),
                result_text: None,
            },
            Err(e) => return render_failed(e),
        },
    };
    HttpResponse::Ok().json(reply)
}

/// Serve the editor page
pub async fn index_handler<B: BackendService + 'static>(
    data: web::Data<Arc<AppState<B>>>,
) -> HttpResponse {
    let page = PageContext::from_settings(&data.config);
    match data.with_store(|store| render_page(store, &page)) {
        Ok(html) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => render_failed(e),
    }
}

/// Serve the rule container markup alone
pub async fn render_handler<B: BackendService + 'static>(
    data: web::Data<Arc<AppState<B>>>,
) -> HttpResponse {
    match data.with_store(|store| render_rules(store)) {
        Ok(html) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => render_failed(e),
    }
}

/// Apply one edit and answer with the re-rendered container
pub async fn action_handler<B: BackendService + 'static>(
    body: web::Json<ActionRequest>,
    data: web::Data<Arc<AppState<B>>>,
) -> HttpResponse {
    let action = match body.into_inner() {
        ActionRequest::Action(action) => action,
        ActionRequest::Bound { binding, value } => match binding.to_action(&value) {
            Ok(action) => action,
            Err(e) => {
                debug!("Rejected editor action: {}", e);
                return error_reply(StatusCode::BAD_REQUEST, e.to_string());
            }
        },
    };

    let result = data.with_store(|store| {
        let rerender = store.apply(&action)?;
        Ok::<_, crate::models::StoreError>((render_rules(store), store.rule_count(), rerender))
    });

    match result {
        Ok((Ok(markup), rule_count, rerender)) => HttpResponse::Ok().json(ActionReply {
            markup,
            rule_count,
            rerender,
        }),
        Ok((Err(e), _, _)) => render_failed(e),
        Err(e) => {
            debug!("Editor action {} failed: {}", action.name(), e);
            error_reply(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

/// Sync posted fields, validate and forward to the encoder
pub async fn encode_handler<B: BackendService + 'static>(
    body: web::Json<EncodeForm>,
    data: web::Data<Arc<AppState<B>>>,
) -> HttpResponse {
    let Some(_pass) = data.encode_gate.enter() else {
        return submit_failed(SubmitError::Busy);
    };
    let form = body.into_inner();

    let prepared = data.with_store(|store| prepare_encode(store, &form.fields, &form.context));
    let request = match prepared {
        Ok(request) => request,
        Err(e) => return submit_failed(e.into()),
    };
    match send_encode(&data.backend, &request).await {
        Ok(response) => results_reply(
            "Encoding completed successfully!",
            ResultView::from_encode(&response),
        ),
        Err(e) => submit_failed(e),
    }
}

pub async fn decode_handler<B: BackendService + 'static>(
    body: web::Json<DecodeForm>,
    data: web::Data<Arc<AppState<B>>>,
) -> HttpResponse {
    let Some(_pass) = data.decode_gate.enter() else {
        return submit_failed(SubmitError::Busy);
    };

    let request = match prepare_decode(&body.log_text) {
        Ok(request) => request,
        Err(e) => return submit_failed(e.into()),
    };
    match send_decode(&data.backend, &request).await {
        Ok(response) => results_reply(
            "Decoding completed successfully!",
            ResultView::from_decode(&response),
        ),
        Err(e) => submit_failed(e),
    }
}

pub async fn save_handler<B: BackendService + 'static>(
    data: web::Data<Arc<AppState<B>>>,
) -> HttpResponse {
    match save_results(&data.backend).await {
        Ok(response) => HttpResponse::Ok().json(SubmitReply {
            success: true,
            message: format!(
                "Saved {}",
                response
                    .path
                    .or(response.filename)
                    .unwrap_or_else(|| "policy command".to_string())
            ),
            ..Default::default()
        }),
        Err(e) => submit_failed(e),
    }
}

pub fn config<B: BackendService + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index_handler::<B>))
        .route("/editor/render", web::get().to(render_handler::<B>))
        .route("/editor/action", web::post().to(action_handler::<B>))
        .route("/editor/encode", web::post().to(encode_handler::<B>))
        .route("/editor/decode", web::post().to(decode_handler::<B>))
        .route("/editor/save", web::post().to(save_handler::<B>));
}
