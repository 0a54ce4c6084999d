pub mod api;

use std::error::Error;
use std::net::SocketAddr;

use log::info;

use crate::cli::Args;
use api::AppState;

pub struct Server {
    addr: String,
    state: AppState,
    args: Args,
}

impl Server {
    pub fn new(addr: String, state: AppState, args: Args) -> Self {
        Self { addr, state, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.addr.parse::<SocketAddr>()?;
        let app = api::router(self.state.clone(), &self.args.allowed_origins);

        if let (true, Some(cert_path), Some(key_path)) = (
            self.args.enable_tls,
            self.args.tls_cert_path.as_ref(),
            self.args.tls_key_path.as_ref(),
        ) {
            let tls_config =
                axum_server::tls_rustls::RustlsConfig::from_pem_file(cert_path, key_path).await?;

            info!("Starting HTTPS gateway on: https://{}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await?;
        } else {
            info!("Starting HTTP gateway on: http://{}", addr);
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app.into_make_service()).await?;
        }

        Ok(())
    }
}
