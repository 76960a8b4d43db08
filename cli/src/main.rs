//! CLI entrypoint for consent
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod app;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use consent_application::{
    AuditLog, CompletionGateway, EntityStore, ExportFinalDocumentUseCase, NoProgress, ProgressNotifier,
    SessionFacade, UnavailableGateway,
};
use consent_infrastructure::{
    ConfigLoader, FileConfig, JsonFileMedium, JsonlAuditLogger, PlainTextExtractor, default_exporters,
};
use consent_presentation::{Cli, ProgressReporter, SimpleProgress};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    // Held until exit so buffered file logs are flushed
    let _log_guard = init_logging(cli.verbose, config.logging.dir.as_deref());

    info!("Starting consent");
    for issue in config.validate() {
        warn!("Configuration: {}", issue);
    }

    // === Dependency Injection ===
    let data_dir = config.storage.resolved_data_dir();
    let medium = JsonFileMedium::open(&data_dir)
        .with_context(|| format!("Cannot open data directory {}", data_dir.display()))?;
    let store = EntityStore::new(Arc::new(medium));

    let audit: Option<Arc<dyn AuditLog>> = if config.logging.audit {
        JsonlAuditLogger::open(data_dir.join("audit.jsonl"))
            .map(|logger| Arc::new(logger) as Arc<dyn AuditLog>)
    } else {
        None
    };

    let mut facade = SessionFacade::new(store, config.workflow_params());
    if let Some(audit) = &audit {
        facade = facade.with_audit_log(audit.clone());
    }
    let mut export = ExportFinalDocumentUseCase::new(facade.clone());
    if let Some(audit) = audit {
        export = export.with_audit_log(audit);
    }
    for exporter in default_exporters() {
        export = export.with_exporter(exporter);
    }

    let gateway = build_gateway(&config);
    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let app = App::new(facade, gateway, export, progress)
        .with_extractor(Arc::new(PlainTextExtractor));

    app.run(cli.command, cli.session.as_deref()).await
}

/// Console logging by verbosity, plus a daily log file when a directory is configured
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "consent.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

#[cfg_attr(not(feature = "llm"), allow(unused_variables))]
fn build_gateway(config: &FileConfig) -> Arc<dyn CompletionGateway> {
    #[cfg(feature = "llm")]
    match consent_infrastructure::AnthropicGateway::from_config(&config.llm) {
        Ok(gateway) => return Arc::new(gateway),
        Err(e) => warn!("Text completion unavailable, using fallbacks: {}", e),
    }
    Arc::new(UnavailableGateway)
}
