//! Always-serving gRPC health responder.
//!
//! A liveness stub for the standard `grpc.health.v1` contract: every
//! `Check` reports SERVING without consulting dependencies, and
//! `Watch` completes immediately with no status updates. Services
//! that need readiness semantics register a real reporter instead.

use std::pin::Pin;

use tokio_stream::Stream;
use tonic::{Request, Response, Status};
use tonic_health::pb::health_check_response::ServingStatus;
use tonic_health::pb::health_server::{Health, HealthServer};
use tonic_health::pb::{HealthCheckRequest, HealthCheckResponse};

/// The stub responder. Stateless; register once per server.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysServing;

/// Convenience: a ready-to-register `HealthServer`.
///
/// ```ignore
/// Server::builder()
///     .add_service(svckit_health::server())
///     .serve(addr)
///     .await?;
/// ```
pub fn server() -> HealthServer<AlwaysServing> {
    HealthServer::new(AlwaysServing)
}

#[tonic::async_trait]
impl Health for AlwaysServing {
    async fn check(
        &self,
        _request: Request<HealthCheckRequest>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        Ok(Response::new(HealthCheckResponse {
            status: ServingStatus::Serving as i32,
        }))
    }

    type WatchStream =
        Pin<Box<dyn Stream<Item = Result<HealthCheckResponse, Status>> + Send>>;

    /// No-op watch: the stream ends immediately with no events and no
    /// error. Kept deliberately minimal; no subscribers are expected.
    async fn watch(
        &self,
        _request: Request<HealthCheckRequest>,
    ) -> Result<Response<Self::WatchStream>, Status> {
        Ok(Response::new(Box::pin(tokio_stream::empty())))
    }
}
