use clap::Parser;
use sqs_relay::impls::sqs::{build_sdk_client, SqsQueueClient};
use sqs_relay::{InstanceNameDeriver, Relay, RelayConfig, StartupError};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> ExitCode {
    let config = RelayConfig::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let relay = match build_relay(&config).await {
        Ok(relay) => relay,
        Err(e) => {
            log::error!("Startup failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_signal().await;
        log::info!("Shutdown signal received, finishing in-flight message");
        let _ = shutdown_tx.send(true);
        // keep the sender alive so the relay sees `true` rather than a closed channel
        std::future::pending::<()>().await;
    });

    relay.run(shutdown_rx).await;
    ExitCode::SUCCESS
}

async fn build_relay(config: &RelayConfig) -> Result<Relay, StartupError> {
    config.validate()?;

    let sqs_client =
        build_sdk_client(config.endpoint_url.as_deref(), config.operation_timeout()).await;
    let inbound = SqsQueueClient::resolve(sqs_client.clone(), &config.inbound_queue)
        .await?
        .with_wait_time_seconds(config.wait_time_seconds)
        .with_visibility_timeout(config.visibility_timeout);
    let outbound = SqsQueueClient::resolve(sqs_client, &config.outbound_queue).await?;

    Ok(Relay::new(
        Arc::new(inbound),
        Arc::new(outbound),
        Arc::new(InstanceNameDeriver),
        config.relay_settings(),
    ))
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            log::error!("Unable to listen for SIGTERM: {e}");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Unable to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
