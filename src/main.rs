use std::path::Path;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::{bail, Context};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};

use ursp_editor::interfaces::{encode_rules, SubmitContext, SubmitGate};
use ursp_editor::models::{AppState, RuleSet, RuleStore};
use ursp_editor::settings::update_settings_from_file;
use ursp_editor::template::ResultView;
use ursp_editor::utils::HttpBackend;
use ursp_editor::view::FormSnapshot;
use ursp_editor::web_handlers::interfaces;
use ursp_editor::Settings;

/// Editor and encoder front end for 3GPP URSP rule sets
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Listen address (e.g., 127.0.0.1 or 0.0.0.0)
    #[arg(short, long, value_name = "ADDRESS")]
    address: Option<String>,

    /// Listen port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Rule-set JSON file to encode directly instead of starting the server
    #[arg(long, value_name = "FILE")]
    rules: Option<String>,

    /// Output file for the encoded result (must be used with --rules)
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<String>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.rules.is_some() != args.output.is_some() {
        bail!("--rules and -o/--output must be used together");
    }

    if let Some(path) = &args.config {
        update_settings_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path))?;
    }
    let settings = Settings::current();

    // Initialize the logger, RUST_LOG wins over the configured level
    env_logger::init_from_env(Env::default().default_filter_or(settings.log_level.as_str()));
    if !settings.pref_path.is_empty() {
        info!("Using settings from {}", settings.pref_path);
    }

    if let (Some(rules), Some(output)) = (&args.rules, &args.output) {
        info!("Encoding rule set {} to {}", rules, output);
        return encode_file(&settings, Path::new(rules), Path::new(output)).await;
    }

    let mut settings = Settings::clone(&settings);
    if let Some(address) = args.address {
        settings.listen_address = address;
    }
    if let Some(port) = args.port {
        settings.listen_port = port;
    }
    let listen_address = if settings.listen_address.trim().is_empty() {
        warn!("Empty listen_address in settings, defaulting to 127.0.0.1");
        format!("127.0.0.1:{}", settings.listen_port)
    } else if settings.listen_address.contains(':') {
        settings.listen_address.clone()
    } else {
        format!("{}:{}", settings.listen_address, settings.listen_port)
    };

    let app_state = Arc::new(AppState::from_settings(Arc::new(settings))?);
    info!(
        "URSP editor starting on {}, backend {}",
        listen_address, app_state.config.backend_url
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(Arc::clone(&app_state)))
            .configure(interfaces::config::<HttpBackend>)
    })
    .bind(&listen_address)
    .with_context(|| format!("Failed to bind {}", listen_address))?
    .run()
    .await?;
    Ok(())
}

/// Encode a rule-set file through the backend and write the text result
async fn encode_file(settings: &Settings, rules: &Path, output: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(rules)
        .with_context(|| format!("Failed to read {}", rules.display()))?;
    let rule_set = RuleSet::from_json(&content)
        .with_context(|| format!("Invalid rule-set file {}", rules.display()))?;

    let mut context = SubmitContext::from_settings(settings);
    if let Some(pti) = rule_set.pti {
        context.pti = pti;
    }
    if let Some(plmn) = rule_set.plmn {
        context.plmn = plmn;
    }
    if let Some(upsc) = rule_set.upsc {
        context.upsc = upsc;
    }

    let mut store = RuleStore::from_sections(rule_set.sections, settings.limits());
    let faults = store.integrity_faults();
    if !faults.is_empty() {
        bail!("Rule set {} is malformed: {:?}", rules.display(), faults);
    }

    let backend = HttpBackend::from_settings(settings)?;
    let gate = SubmitGate::new(0);
    let form = FormSnapshot::new();
    let response = encode_rules(&mut store, &form, &context, &backend, &gate).await?;

    std::fs::write(output, ResultView::from_encode(&response).to_text())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Successfully wrote encoded rules to {}", output.display());
    Ok(())
}
