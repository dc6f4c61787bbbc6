pub mod api;

use crate::cli::Args;
use crate::relay::RelayHandler;
use log::{ info, warn };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub struct Server {
    addr: String,
    relay: Arc<RelayHandler>,
    args: Args,
}

impl Server {
    pub fn new(addr: String, relay: Arc<RelayHandler>, args: Args) -> Self {
        Self { addr, relay, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.addr.parse::<SocketAddr>()?;
        let app = api::router(self.relay.clone());

        match (self.args.enable_tls, &self.args.tls_cert_path, &self.args.tls_key_path) {
            (true, Some(cert_path), Some(key_path)) => {
                info!(
                    "TLS enabled. Loading certificate from '{}' and key from '{}'",
                    cert_path,
                    key_path
                );
                let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                    cert_path,
                    key_path
                ).await?;

                info!("HTTPS relay listening on: https://{}", addr);
                axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service()).await?;
            }
            (true, _, _) => {
                return Err("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.".into());
            }
            (false, _, _) => {
                if self.args.tls_cert_path.is_some() || self.args.tls_key_path.is_some() {
                    warn!("TLS paths given but --enable-tls is off; serving plain HTTP.");
                }
                let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
                    format!("Failed to bind relay to {}: {}. Try a different address.", addr, e)
                })?;
                info!("HTTP relay listening on: http://{}", addr);
                axum::serve(listener, app.into_make_service())
                    .with_graceful_shutdown(shutdown_signal()).await?;
            }
        }

        info!("Relay stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
