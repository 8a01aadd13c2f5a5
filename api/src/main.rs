use std::net::SocketAddr;
use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use menulens_api::{
    application::http::server::http_server::{router, state},
    args::{Args, LogArgs},
};
use tracing_subscriber::EnvFilter;

fn init_logger(log: &LogArgs) {
    let filter = EnvFilter::try_new(&log.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if log.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv::dotenv().ok();

    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install the rustls crypto provider"))?;

    let args = Arc::new(Args::parse());
    init_logger(&args.log);

    let addr: SocketAddr = format!("{}:{}", args.server.host, args.server.port).parse()?;
    let app_state = state(args.clone()).await?;
    let app = router(app_state)?;

    match (&args.server.tls_cert, &args.server.tls_key) {
        (Some(cert), Some(key)) => {
            let tls = RustlsConfig::from_pem_file(cert, key).await?;
            tracing::info!(%addr, "MenuLens API listening with TLS");
            axum_server::bind_rustls(addr, tls)
                .serve(app.into_make_service())
                .await?;
        }
        _ => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(%addr, "MenuLens API listening");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
