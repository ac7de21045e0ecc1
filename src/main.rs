use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use pathpilot_intent::{
    cli::Cli,
    config::Config,
    intent::{adapters::build_classifier, gateway::ClassifierGateway, pipeline::IntentPipeline},
    logging::init_tracing,
    server,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    let logging_guard = init_tracing(&config.logging).context("failed to initialize logging")?;

    let classifier =
        build_classifier(&config.classifier).context("failed to build classifier backend")?;
    tracing::info!(
        target: "server",
        run_id = logging_guard.run_id(),
        backend = classifier.name(),
        model = %config.classifier.model,
        timeout_ms = config.classifier.request_timeout_ms,
        "classifier_ready"
    );

    let gateway = ClassifierGateway::new(
        classifier,
        config.classifier.generation(),
        Duration::from_millis(config.classifier.request_timeout_ms),
    );
    let pipeline = IntentPipeline::new(gateway);

    server::run(config, pipeline).await
}
