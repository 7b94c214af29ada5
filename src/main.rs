use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use weather_service::app::{AppState, create_app};
use weather_service::config::{Args, Config};

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(error) = run(Args::parse()).await {
        log::error!("{error}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_args(args)?;
    let state = AppState::from_config(&config)?;
    let app = create_app(state, config.frontend_origin.clone());

    log::info!("fetching weather from {}", config.upstream_base_url);
    log::info!(
        "allowing cross-origin requests from {:?}",
        config.frontend_origin
    );
    log::info!("listening on {}", config.listen_address);
    if let Some(tls) = config.tls {
        log::info!(
            "using tls with key file {} and cert file {}",
            tls.key_file_path.display(),
            tls.cert_file_path.display()
        );
        let tls_config = RustlsConfig::from_pem_file(tls.cert_file_path, tls.key_file_path).await?;
        axum_server::bind_rustls(config.listen_address, tls_config)
            .serve(app.into_make_service())
            .await?;
    } else {
        axum_server::bind(config.listen_address)
            .serve(app.into_make_service())
            .await?;
    }
    Ok(())
}
