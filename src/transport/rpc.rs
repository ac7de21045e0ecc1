use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status, transport::Server};

use crate::{
    intent::{
        error::{IntentError, IntentErrorKind},
        pipeline::IntentPipeline,
    },
    transport::proto::{
        ParseIntentRequest, ParseIntentResponse,
        intent_service_server::{IntentService, IntentServiceServer},
    },
};

pub struct RpcIntentService {
    pipeline: IntentPipeline,
}

impl RpcIntentService {
    pub fn new(pipeline: IntentPipeline) -> Self {
        Self { pipeline }
    }

    pub fn into_server(self) -> IntentServiceServer<Self> {
        IntentServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl IntentService for RpcIntentService {
    async fn parse_intent(
        &self,
        request: Request<ParseIntentRequest>,
    ) -> Result<Response<ParseIntentResponse>, Status> {
        let peer = request.remote_addr();
        match self.pipeline.parse_intent(request.into_inner().into()).await {
            Ok(result) => Ok(Response::new(result.into())),
            Err(err) => {
                if err.kind.is_client_fault() {
                    tracing::debug!(
                        target: "transport.rpc",
                        peer = ?peer,
                        reason = err.kind.as_str(),
                        error = %err,
                        "parse_intent_rejected"
                    );
                } else {
                    tracing::warn!(
                        target: "transport.rpc",
                        peer = ?peer,
                        reason = err.kind.as_str(),
                        error = %err,
                        "parse_intent_failed"
                    );
                }
                Err(status_from_error(&err))
            }
        }
    }
}

pub fn status_from_error(err: &IntentError) -> Status {
    match err.kind {
        IntentErrorKind::Validation => Status::invalid_argument(err.message.clone()),
        IntentErrorKind::Overloaded => Status::resource_exhausted(err.message.clone()),
        IntentErrorKind::Gateway
        | IntentErrorKind::Parse
        | IntentErrorKind::Schema
        | IntentErrorKind::Internal => {
            Status::internal(format!("{}: {}", err.kind.as_str(), err.message))
        }
    }
}

pub async fn serve(
    pipeline: IntentPipeline,
    listen: SocketAddr,
    shutdown: CancellationToken,
) -> Result<()> {
    tracing::info!(target: "transport.rpc", listen = %listen, "rpc_listening");

    Server::builder()
        .add_service(RpcIntentService::new(pipeline).into_server())
        .serve_with_shutdown(listen, async move { shutdown.cancelled().await })
        .await
        .with_context(|| format!("rpc server on {} failed", listen))?;

    tracing::info!(target: "transport.rpc", "rpc_stopped");
    Ok(())
}
