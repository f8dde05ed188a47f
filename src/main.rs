use anyhow::Context;
use clap::Parser;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use hawkeye::api::path_request_dto::{PathRequestDto, PathResultDto};
use hawkeye::api::topology_dto::TopologyDto;
use hawkeye::config::HawkEyeConfig;
use hawkeye::domain::path::path_request::PathRequest;
use hawkeye::domain::session::session_controller::{SessionController, SessionEvent};
use hawkeye::loader::parser::parse_json_file;
use hawkeye::logger;

const CHANNEL_CAPACITY: usize = 64;
const UPDATE_WAIT: Duration = Duration::from_millis(500);

/// Computes SRv6 paths for a batch of requests on a topology snapshot.
#[derive(Parser, Debug)]
#[command(name = "hawkeye", version)]
struct Args {
    /// Topology snapshot (JSON)
    #[arg(long)]
    topology: String,

    /// Path requests (JSON array)
    #[arg(long)]
    requests: String,

    /// Topology snapshot applied on top of the first one once all requests are answered
    #[arg(long)]
    update: Option<String>,

    /// Close all client streams after this many milliseconds
    #[arg(long)]
    cancel_after_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let config = HawkEyeConfig::from_env().context("reading configuration")?;
    log::info!("Configuration: {:?}", config);

    let (update_tx, update_rx) = mpsc::channel(1);
    let (manager, processor) = hawkeye::build_engine(&args.topology, config, update_tx).context("loading topology")?;

    let dtos: Vec<PathRequestDto> = parse_json_file(&args.requests).context("loading requests")?;

    let (request_tx, request_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (event_tx, mut event_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let controller = SessionController::new(manager, request_rx, update_rx, event_tx);
    let sessions = controller.get_session_table();
    let controller_handle = tokio::spawn(controller.run());

    let streams = CancellationToken::new();
    let mut pending = 0;

    for dto in dtos {
        let request = PathRequest::try_from(dto)?;
        let request =
            PathRequest::with_cancellation_token(request.ipv6_source_address, request.ipv6_destination_address, request.intents, streams.child_token());

        request_tx.send(request).await?;
        pending += 1;
    }

    while pending > 0 {
        let Some(event) = event_rx.recv().await else {
            break;
        };
        pending -= 1;

        report(event)?;
    }

    log::info!("{} sessions open", sessions.len());

    if let Some(update_path) = &args.update {
        let snapshot: TopologyDto = parse_json_file(update_path).context("loading topology update")?;
        let applied = processor.process_events(snapshot.into_events());
        log::info!("Applied {} topology update events", applied);

        while let Ok(Some(event)) = tokio::time::timeout(UPDATE_WAIT, event_rx.recv()).await {
            report(event)?;
        }
    }

    if let Some(delay) = args.cancel_after_ms {
        tokio::time::sleep(Duration::from_millis(delay)).await;
        streams.cancel();
        tokio::task::yield_now().await;
        log::info!("Streams closed, {} sessions open", sessions.len());
    }

    drop(request_tx);
    controller_handle.await?;
    Ok(())
}

fn report(event: SessionEvent) -> anyhow::Result<()> {
    match event {
        SessionEvent::PathCalculated { result, cached, .. } => {
            if cached {
                log::info!("Answered from an open session");
            }
            println!("{}", serde_json::to_string_pretty(&PathResultDto::from(&result))?);
        }
        SessionEvent::PathUpdated { fingerprint, result } => {
            log::info!("Path of request {} updated", fingerprint);
            println!("{}", serde_json::to_string_pretty(&PathResultDto::from(&result))?);
        }
        SessionEvent::CalculationFailed { fingerprint, error } => log::error!("Request {} failed: {}", fingerprint, error),
    }
    Ok(())
}
