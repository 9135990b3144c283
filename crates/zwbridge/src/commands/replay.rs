//! `zwbridge replay`: run a scenario through the bridge's host loop.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use zwbridge_core::sim::MemoryController;
use zwbridge_core::{Bridge, BridgeConfig, BridgeError, CommandResult, Event, NodeRecord};

use crate::cli::{GlobalOpts, OutputFormat, ReplayArgs};
use crate::error::CliError;
use crate::output;
use crate::scenario::Scenario;

// ── Records ─────────────────────────────────────────────────────────

/// One emitted event, as a host would receive it.
#[derive(Debug, Serialize)]
struct EventRecord {
    #[serde(skip)]
    seq: usize,
    #[serde(skip)]
    node_id: Option<u8>,
    event: &'static str,
    args: Vec<serde_json::Value>,
}

impl EventRecord {
    fn new(seq: usize, event: &Event) -> Self {
        Self {
            seq,
            node_id: event.node_id(),
            event: event.name(),
            args: event.args(),
        }
    }
}

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "#")]
    seq: usize,
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Args")]
    args: String,
}

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Node")]
    node_id: u8,
    #[tabled(rename = "Home")]
    home_id: String,
    #[tabled(rename = "Values")]
    values: usize,
    #[tabled(rename = "Polling")]
    polling: bool,
}

fn node_row(n: &NodeRecord) -> NodeRow {
    NodeRow {
        node_id: n.node_id,
        home_id: format!("{:#010x}", n.home_id),
        values: n.values.len(),
        polling: n.polling_enabled,
    }
}

fn compact_args(args: &[serde_json::Value]) -> String {
    args.iter()
        .map(output::render_json_compact)
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    args: ReplayArgs,
    mut bridge_config: BridgeConfig,
    format: OutputFormat,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let scenario = Scenario::load(&args.scenario)?;
    if let Some(device) = args.device {
        bridge_config.device = device;
    }

    let (events, nodes) = replay(scenario, bridge_config, &args.scenario).await?;

    let color = output::should_color(global.color);
    let records: Vec<EventRecord> = events
        .iter()
        .enumerate()
        .map(|(n, e)| EventRecord::new(n + 1, e))
        .collect();
    let rendered = output::render_list(
        format,
        &records,
        |r| EventRow {
            seq: r.seq,
            node: r.node_id.map(|n| n.to_string()).unwrap_or_default(),
            event: output::paint_name(r.event, color),
            args: compact_args(&r.args),
        },
        |r| {
            let name = output::paint_name(r.event, color);
            if r.args.is_empty() {
                name
            } else {
                format!("{name} {}", compact_args(&r.args))
            }
        },
    );
    output::print_output(&rendered, global.quiet);

    if args.nodes {
        let rendered = output::render_list(format, &nodes, |n| node_row(n), |n| {
            format!("{} {}", n.node_id, n.values.len())
        });
        output::print_output(&rendered, global.quiet);
    }
    Ok(())
}

/// Run the scenario and return every emitted event plus the node table
/// as it stood before the bridge disconnected.
async fn replay(
    scenario: Scenario,
    config: BridgeConfig,
    path: &Path,
) -> Result<(Vec<Event>, Vec<Arc<NodeRecord>>), CliError> {
    let controller = Arc::new(MemoryController::new(scenario.network));
    let (sink, mut received) = mpsc::unbounded_channel();
    let mut bridge = Bridge::new(controller.clone(), config.clone(), sink)?;
    bridge.connect().map_err(|err| match err {
        BridgeError::Controller(source) => CliError::ConnectionFailed {
            device: config.device.clone(),
            source,
        },
        other => other.into(),
    })?;

    let handle = bridge.handle();
    let cancel = CancellationToken::new();
    let task = tokio::spawn(bridge.run(cancel.clone()));

    // The controller's worker thread.
    let steps = scenario.steps;
    let producer = Arc::clone(&controller);
    let fired = tokio::task::spawn_blocking(move || {
        for (n, step) in steps.iter().enumerate() {
            step.fire(&producer).map_err(|e| (n, e))?;
        }
        Ok::<_, (usize, zwbridge_core::ControllerError)>(steps.len())
    })
    .await
    .map_err(|e| BridgeError::Internal(e.to_string()))?;

    let step_error = match fired {
        Ok(count) => {
            debug!(steps = count, "all steps fired");
            None
        }
        Err((n, source)) => Some(CliError::Scenario {
            path: path.display().to_string(),
            reason: format!("step {n}: {source}"),
        }),
    };

    if step_error.is_none() {
        let mut failed = 0usize;
        for command in scenario.commands {
            let name = command.name();
            match handle.execute(command).await {
                Ok(CommandResult::Applied) => debug!(command = name, "command applied"),
                Ok(CommandResult::Ignored) => info!(command = name, "command ignored"),
                Err(BridgeError::Closed) => return Err(BridgeError::Closed.into()),
                Err(_) => failed += 1,
            }
        }
        if failed > 0 {
            warn!(failed, "some scenario commands failed");
        }
    }

    cancel.cancel();
    let mut bridge = task
        .await
        .map_err(|e| BridgeError::Internal(e.to_string()))?;
    let nodes = bridge.registry().nodes().as_ref().clone();
    bridge.disconnect()?;
    drop(bridge);

    let mut events = Vec::new();
    while let Ok(event) = received.try_recv() {
        events.push(event);
    }

    match step_error {
        Some(err) => Err(err),
        None => Ok((events, nodes)),
    }
}
