//! Submission flows: sync the form into the store, validate, send.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::gate::SubmitGate;
use crate::backend::{
    BackendError, BackendService, DecodeRequest, DecodeResponse, EncodeRequest, EncodeResponse,
    SaveExcelResponse,
};
use crate::constants::defaults::{DEFAULT_PLMN, DEFAULT_PTI, DEFAULT_UPSC};
use crate::models::{ContentType, RuleStore};
use crate::settings::Settings;
use crate::utils::hex::count_hex_octets;
use crate::view::{sync_from_view, FormView};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("URSP Rule {rule}: Precedence Value is required")]
    MissingRulePrecedence { rule: usize },

    #[error("RSD {rule}_{descriptor}: Precedence Value is required")]
    MissingDescriptorPrecedence { rule: usize, descriptor: usize },

    #[error("RSD Type {rule}_{descriptor}_{content} ({content_type}): Value is required")]
    MissingContentValue {
        rule: usize,
        descriptor: usize,
        content: usize,
        content_type: ContentType,
    },

    #[error("Please enter hex log data")]
    EmptyLog,

    #[error("No hex values found in log data")]
    NoHexOctets,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("A request is already in progress")]
    Busy,
}

/// NAS session values sent alongside the rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitContext {
    pub pti: String,
    pub plmn: String,
    pub upsc: String,
}

impl Default for SubmitContext {
    fn default() -> Self {
        Self {
            pti: DEFAULT_PTI.to_string(),
            plmn: DEFAULT_PLMN.to_string(),
            upsc: DEFAULT_UPSC.to_string(),
        }
    }
}

impl SubmitContext {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            pti: settings.default_pti.clone(),
            plmn: settings.default_plmn.clone(),
            upsc: settings.default_upsc.clone(),
        }
    }
}

/// Check the store in form order and report the first missing value
pub fn validate(store: &RuleStore) -> Result<(), ValidationError> {
    for (i, rule) in store.rules().iter().enumerate() {
        if rule.precedence.trim().is_empty() {
            return Err(ValidationError::MissingRulePrecedence { rule: i });
        }
    }

    for (i, _) in store.rules().iter().enumerate() {
        let descriptors = store.descriptors(i).unwrap_or_default();
        for (j, descriptor) in descriptors.iter().enumerate() {
            if descriptor.precedence.trim().is_empty() {
                return Err(ValidationError::MissingDescriptorPrecedence {
                    rule: i,
                    descriptor: j,
                });
            }
        }
    }

    for (i, _) in store.rules().iter().enumerate() {
        let descriptors = store.descriptors(i).unwrap_or_default();
        for j in 0..descriptors.len() {
            let contents = store.contents(i, j).unwrap_or_default();
            for (k, content) in contents.iter().enumerate() {
                if content.is_editable() && content.value.trim().is_empty() {
                    return Err(ValidationError::MissingContentValue {
                        rule: i,
                        descriptor: j,
                        content: k,
                        content_type: content.content_type,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Sync the live form into the store, validate it and build the request
pub fn prepare_encode<V>(
    store: &mut RuleStore,
    view: &V,
    context: &SubmitContext,
) -> Result<EncodeRequest, ValidationError>
where
    V: FormView + ?Sized,
{
    sync_from_view(store, view);
    validate(store)?;
    Ok(EncodeRequest {
        pti: context.pti.clone(),
        plmn: context.plmn.clone(),
        upsc: context.upsc.clone(),
        sections: store.sections(),
    })
}

pub async fn send_encode<B>(
    backend: &B,
    request: &EncodeRequest,
) -> Result<EncodeResponse, SubmitError>
where
    B: BackendService,
{
    match backend.encode(request).await {
        Ok(response) => {
            info!(
                "Encoded {} URSP rule(s)",
                request.sections.ursp_sum.len()
            );
            Ok(response)
        }
        Err(e) => {
            warn!("Encode failed: {}", e);
            Err(e.into())
        }
    }
}

/// Full encode flow for callers that own the store outright
pub async fn encode_rules<B, V>(
    store: &mut RuleStore,
    view: &V,
    context: &SubmitContext,
    backend: &B,
    gate: &SubmitGate,
) -> Result<EncodeResponse, SubmitError>
where
    B: BackendService,
    V: FormView + ?Sized,
{
    let _pass = gate.enter().ok_or(SubmitError::Busy)?;
    let request = prepare_encode(store, view, context)?;
    send_encode(backend, &request).await
}

/// Reject log text the decoder could not use
pub fn prepare_decode(log_text: &str) -> Result<DecodeRequest, ValidationError> {
    if log_text.trim().is_empty() {
        return Err(ValidationError::EmptyLog);
    }
    let octets = count_hex_octets(log_text);
    if octets == 0 {
        return Err(ValidationError::NoHexOctets);
    }
    debug!("Decoding log with {} hex octet(s)", octets);
    Ok(DecodeRequest {
        log_text: log_text.to_string(),
    })
}

pub async fn send_decode<B>(
    backend: &B,
    request: &DecodeRequest,
) -> Result<DecodeResponse, SubmitError>
where
    B: BackendService,
{
    match backend.decode(request).await {
        Ok(response) => {
            info!(
                "Decoded {}",
                response.message_type.as_deref().unwrap_or("message")
            );
            Ok(response)
        }
        Err(e) => {
            warn!("Decode failed: {}", e);
            Err(e.into())
        }
    }
}

pub async fn decode_log<B>(
    log_text: &str,
    backend: &B,
    gate: &SubmitGate,
) -> Result<DecodeResponse, SubmitError>
where
    B: BackendService,
{
    let _pass = gate.enter().ok_or(SubmitError::Busy)?;
    let request = prepare_decode(log_text)?;
    send_decode(backend, &request).await
}

/// Ask the backend to export the last policy command as a spreadsheet
pub async fn save_results<B>(backend: &B) -> Result<SaveExcelResponse, SubmitError>
where
    B: BackendService,
{
    match backend.save_excel().await {
        Ok(response) => {
            info!(
                "Saved policy command to {}",
                response.path.as_deref().unwrap_or("backend")
            );
            Ok(response)
        }
        Err(e) => {
            warn!("Save failed: {}", e);
            Err(e.into())
        }
    }
}
