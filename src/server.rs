use anyhow::{Context, Result, anyhow};
use tokio::{
    signal::unix::{SignalKind, signal},
    task::JoinSet,
};
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    intent::pipeline::IntentPipeline,
    transport::{http, rpc},
};

enum ExitReason {
    Signal(&'static str),
    TransportExited,
}

/// Serves every enabled binding until a signal arrives or one binding fails.
pub async fn run(config: Config, pipeline: IntentPipeline) -> Result<()> {
    let mut sigint =
        signal(SignalKind::interrupt()).context("unable to listen for SIGINT (Ctrl+C)")?;
    let mut sigterm = signal(SignalKind::terminate()).context("unable to listen for SIGTERM")?;

    let shutdown = CancellationToken::new();
    let mut transports: JoinSet<(&'static str, Result<()>)> = JoinSet::new();

    if config.http.enabled {
        let pipeline = pipeline.with_admission(&config.http.admission);
        let token = shutdown.clone();
        let listen = config.http.listen;
        transports.spawn(async move { ("http", http::serve(pipeline, listen, token).await) });
    }
    if config.rpc.enabled {
        let pipeline = pipeline.with_admission(&config.rpc.admission);
        let token = shutdown.clone();
        let listen = config.rpc.listen;
        transports.spawn(async move { ("rpc", rpc::serve(pipeline, listen, token).await) });
    }
    if transports.is_empty() {
        return Err(anyhow!("no transport enabled"));
    }

    tracing::info!(
        target: "server",
        http = config.http.enabled,
        rpc = config.rpc.enabled,
        "server_started"
    );

    let mut first_failure = None;
    let exit_reason = tokio::select! {
        _ = sigint.recv() => ExitReason::Signal("SIGINT"),
        _ = sigterm.recv() => ExitReason::Signal("SIGTERM"),
        Some(joined) = transports.join_next() => {
            first_failure = transport_failure(joined);
            ExitReason::TransportExited
        }
    };

    shutdown.cancel();
    while let Some(joined) = transports.join_next().await {
        if let Some(err) = transport_failure(joined) {
            first_failure.get_or_insert(err);
        }
    }

    match exit_reason {
        ExitReason::Signal(signal_name) => {
            tracing::info!(target: "server", signal = signal_name, "server_stopped")
        }
        ExitReason::TransportExited => {
            tracing::warn!(target: "server", "server_stopped_transport_exited")
        }
    }

    match first_failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn transport_failure(
    joined: std::result::Result<(&'static str, Result<()>), tokio::task::JoinError>,
) -> Option<anyhow::Error> {
    match joined {
        Ok((_, Ok(()))) => None,
        Ok((name, Err(err))) => {
            tracing::error!(target: "server", transport = name, error = %format!("{err:#}"), "transport_failed");
            Some(err.context(format!("{name} transport failed")))
        }
        Err(err) => {
            tracing::error!(target: "server", error = %err, "transport_task_panicked");
            Some(anyhow!("transport task failed: {err}"))
        }
    }
}
