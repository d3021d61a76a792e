use serde::Serialize;

use crate::backend::{DecodeResponse, EncodeResponse, EncodedRules};

const DECODE_DONE: &str = "Decoding completed";

/// What the result tab shows after a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultView {
    /// Full rule set: hex dumps and text breakdowns
    Sections {
        ef_ursp: Option<String>,
        dl_nas: Option<String>,
        ursp_rule: Option<String>,
        policy_command: Option<String>,
    },
    /// One-line decode outcome for non-downlink messages
    Text { text: String },
}

impl ResultView {
    pub fn from_rules(rules: &EncodedRules) -> Self {
        let ursp_rule = rules.ursp_info.as_ref().filter(|s| !s.is_empty()).map(|info| {
            format!("{}\n\n{}", info, rules.ursp_conts.as_deref().unwrap_or_default())
        });

        ResultView::Sections {
            ef_ursp: non_empty(&rules.ef_ursp),
            dl_nas: non_empty(&rules.dl_nas),
            ursp_rule,
            policy_command: non_empty(&rules.pol_cmd_txt),
        }
    }

    pub fn from_encode(response: &EncodeResponse) -> Self {
        Self::from_rules(&response.rules)
    }

    pub fn from_decode(response: &DecodeResponse) -> Self {
        if response.is_dl_nas_transport() {
            return Self::from_rules(&response.rules);
        }
        let text = non_empty(&response.info)
            .or_else(|| non_empty(&response.usi_result))
            .unwrap_or_else(|| DECODE_DONE.to_string());
        ResultView::Text { text }
    }

    /// Plain-text form, used by the command line
    pub fn to_text(&self) -> String {
        match self {
            ResultView::Sections {
                ef_ursp,
                dl_nas,
                ursp_rule,
                policy_command,
            } => {
                let parts = [
                    ("SIM EF_URSP", ef_ursp),
                    ("DL NAS TRANSPORT", dl_nas),
                    ("URSP RULE", ursp_rule),
                    ("MANAGE UE POLICY COMMAND", policy_command),
                ];
                parts
                    .iter()
                    .filter_map(|(title, body)| {
                        body.as_ref().map(|body| format!("[{}]\n{}\n", title, body))
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            ResultView::Text { text } => format!("{}\n", text),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}
