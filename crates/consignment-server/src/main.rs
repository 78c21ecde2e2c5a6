#![doc = include_str!("../README.md")]

mod server;

use anyhow::Context;
use clap::Parser;
use consignment_core::{
    proto::{FILE_DESCRIPTOR_SET, shipping_service_server::ShippingServiceServer},
    store::MemoryStore,
};
use futures::Stream;
use server::config::{CliArgs, ServerConfig};
use server::service::handler::ConsignmentService;
use server::telemetry::init_telemetry;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::signal;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::server::Connected;
use tonic::{codec::CompressionEncoding, transport::Server};
use tonic_reflection::server::Builder;
use tonic_web::GrpcWebLayer;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    let providers = init_telemetry()?;
    let res = serve(&config, shutdown_signal()).await;
    providers.shutdown();
    res
}

/// Binds the configured listener and serves until `shutdown` resolves.
///
/// A bind failure is returned before anything is served.
async fn serve<F>(config: &ServerConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    // The one store for the lifetime of the process.
    let service = ConsignmentService::new(Arc::new(MemoryStore::new()));

    if config.uds {
        #[cfg(unix)]
        {
            use tokio::net::UnixListener;
            use tokio_stream::wrappers::UnixListenerStream;
            let uds_path = config.server_addr.clone();
            let uds = UnixListener::bind(&uds_path)
                .with_context(|| format!("failed to bind {}", uds_path))?;
            let incoming = UnixListenerStream::new(uds);
            tracing::info!("Starting consignment service on {}", uds_path);
            let res = run_server_with_incoming(incoming, service, shutdown).await;
            // Best effort; a panic can still leave the socket file behind.
            let _ = std::fs::remove_file(&uds_path);
            res
        }
        #[cfg(not(unix))]
        {
            let _ = (service, shutdown);
            anyhow::bail!("Unix domain sockets are not supported on this platform");
        }
    } else {
        let tcp = TcpListener::bind(&config.server_addr)
            .await
            .with_context(|| format!("failed to bind {}", config.server_addr))?;
        let incoming = TcpListenerStream::new(tcp);
        tracing::info!("Starting consignment service on {}", config.server_addr);
        run_server_with_incoming(incoming, service, shutdown).await
    }
}

async fn run_server_with_incoming<I, IO, IE, F>(
    incoming: I,
    service: ConsignmentService,
    shutdown: F,
) -> anyhow::Result<()>
where
    I: Stream<Item = Result<IO, IE>>,
    IO: AsyncRead + AsyncWrite + Connected + Unpin + Send + 'static,
    IE: Into<tower::BoxError>,
    F: Future<Output = ()>,
{
    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<ShippingServiceServer<ConsignmentService>>()
        .await;

    let reflection = Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()?;

    Server::builder()
        .accept_http1(true)
        .http2_adaptive_window(Some(true))
        .layer(
            ServiceBuilder::new()
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(GrpcWebLayer::new()),
        )
        .add_service(health_service)
        .add_service(reflection)
        .add_service(build_shipping_service(service.clone()))
        .serve_with_incoming_shutdown(incoming, async move {
            shutdown.await;
            tracing::info!("Shutdown signal received, terminating gracefully...");
            health_reporter
                .set_not_serving::<ShippingServiceServer<ConsignmentService>>()
                .await;
        })
        .await?;

    tracing::info!(
        stored = service.store().len(),
        "Service shut down successfully"
    );
    Ok(())
}

fn build_shipping_service(
    service: ConsignmentService,
) -> ShippingServiceServer<ConsignmentService> {
    ShippingServiceServer::new(service)
        .send_compressed(CompressionEncoding::Zstd)
        .send_compressed(CompressionEncoding::Gzip)
        .send_compressed(CompressionEncoding::Deflate)
        .accept_compressed(CompressionEncoding::Zstd)
        .accept_compressed(CompressionEncoding::Gzip)
        .accept_compressed(CompressionEncoding::Deflate)
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
