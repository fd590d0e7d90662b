use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use clap::Parser;
use futures::StreamExt;
use serde_json::json;
use survival_core::action::Action;
use survival_core::io::seed::{build_engine, Seed};
use survival_core::schedule::Timer;
use survival_core::Engine;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "survivald", about = "Survival village simulation streaming daemon")]
struct Args {
    /// Path to the seed JSON document. The standard opening is used when omitted.
    #[arg(long = "seed-file", value_name = "PATH")]
    seed_file: Option<PathBuf>,

    /// Override the RNG seed from the seed document.
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Address to bind (defaults to 127.0.0.1).
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on for WebSocket clients.
    #[arg(long, default_value_t = 8787)]
    port: u16,
}

type SharedEngine = Arc<Mutex<Engine>>;

#[derive(Clone)]
struct AppState {
    tx: broadcast::Sender<String>,
    engine: SharedEngine,
}

fn load_seed(args: &Args) -> Result<Seed> {
    match &args.seed_file {
        Some(path) => Seed::load_from_path(path)
            .with_context(|| format!("failed to load seed from {:?}", path)),
        None => Ok(Seed::default()),
    }
}

fn snapshot_line(engine: &Engine) -> Result<String> {
    serde_json::to_string(&engine.snapshot()).context("failed to serialize snapshot")
}

fn publish(tx: &broadcast::Sender<String>, line: String) {
    if tx.send(line).is_err() {
        tracing::trace!("no subscribers for snapshot");
    }
}

/// Run one timer on its own interval until aborted.
fn spawn_timer(
    timer: Timer,
    period: Duration,
    engine: SharedEngine,
    tx: broadcast::Sender<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let line = {
                let mut engine = engine.lock().await;
                engine.tick(timer);
                snapshot_line(&engine)
            };
            match line {
                Ok(line) => publish(&tx, line),
                Err(err) => {
                    error!(?err, %timer, "timer stopped");
                    break;
                }
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(?err, "failed to listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args = Args::parse();

    let seed = load_seed(&args)?;
    let engine = build_engine(&seed, args.rng_seed);
    info!(seed = %seed.name, "game started");

    let (tx, _rx) = broadcast::channel::<String>(128);
    let engine: SharedEngine = Arc::new(Mutex::new(engine));
    let state = AppState {
        tx: tx.clone(),
        engine: Arc::clone(&engine),
    };

    let timers: Vec<JoinHandle<()>> = Timer::ALL
        .into_iter()
        .map(|timer| {
            let period = seed.periods.get(timer);
            info!(%timer, period_ms = period.as_millis() as u64, "starting timer");
            spawn_timer(timer, period, Arc::clone(&engine), tx.clone())
        })
        .collect();

    let app = Router::new()
        .route("/stream", get(ws_handler))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.bind, args.port))?;

    info!(%addr, "starting survivald");
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    for handle in timers {
        handle.abort();
    }
    info!("timers stopped");
    Ok(())
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| async move { handle_socket(socket, state).await })
}

/// Apply a client command and broadcast the resulting state to every client.
async fn apply_command(state: &AppState, action: &Action) -> Result<()> {
    let line = {
        let mut engine = state.engine.lock().await;
        if let Err(rejection) = engine.apply(action) {
            debug!(%action, %rejection, "command rejected");
        }
        snapshot_line(&engine)?
    };
    publish(&state.tx, line);
    Ok(())
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut rx = state.tx.subscribe();

    let initial = {
        let engine = state.engine.lock().await;
        snapshot_line(&engine)
    };
    match initial {
        Ok(line) => {
            if socket.send(Message::Text(line)).await.is_err() {
                return;
            }
        }
        Err(err) => {
            error!(?err, "failed to build initial snapshot");
            return;
        }
    }

    loop {
        tokio::select! {
            frame = rx.recv() => match frame {
                Ok(line) => {
                    if socket.send(Message::Text(line)).await.is_err() {
                        warn!("websocket client disconnected");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "websocket client lagging");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = socket.next() => match incoming {
                Some(Ok(Message::Text(command))) => match command.parse::<Action>() {
                    Ok(action) => {
                        if let Err(err) = apply_command(&state, &action).await {
                            error!(?err, "command failed");
                        }
                    }
                    Err(err) => {
                        let reply = json!({ "error": err.to_string() }).to_string();
                        if socket.send(Message::Text(reply)).await.is_err() {
                            break;
                        }
                    }
                },
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(?err, "websocket receive failed");
                    break;
                }
            },
        }
    }
}
