//! `tether-comm` – Comm bridge daemon speaking newline-delimited JSON.
//!
//! Reads one inbound frame per line from stdin (or a TCP connection with
//! `--listen`) and writes one event frame per line, opening each channel with
//! the customary `KernelReady` acknowledgement. Logs go to stderr so the
//! protocol stream stays clean.

use std::io::{self, BufReader, BufWriter};
use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tether::bridge::{ChannelTarget, CommandDispatcher, InMemoryStore, VariableStore, WriterChannel};

#[derive(Parser)]
#[command(name = "tether-comm")]
#[command(about = "Command/event variable-sharing bridge daemon", long_about = None)]
struct Cli {
    /// Listen for front-end connections on a TCP address instead of stdio
    #[arg(long)]
    listen: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let store: Arc<dyn VariableStore> = Arc::new(InMemoryStore::new());

    match cli.listen {
        Some(addr) => run_tcp(store, &addr),
        None => run_stdio(store),
    }
}

fn run_stdio(store: Arc<dyn VariableStore>) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();

    let mut target = ChannelTarget::new(CommandDispatcher::new(store));
    target.open(WriterChannel::new(BufWriter::new(stdout.lock())))?;
    target.serve(stdin.lock())?;
    Ok(())
}

fn run_tcp(store: Arc<dyn VariableStore>, addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).with_context(|| format!("failed to bind {addr}"))?;
    let actual = listener.local_addr()?;
    eprintln!("tether-comm listening on {}", actual);

    // Connections are served sequentially; the bridge is single-threaded by
    // contract and all connections share the one variable store.
    for incoming in listener.incoming() {
        match incoming {
            Ok(stream) => {
                let peer = stream.peer_addr().ok();
                let reader = BufReader::new(stream.try_clone()?);
                let writer = BufWriter::new(stream);

                let mut target = ChannelTarget::new(CommandDispatcher::new(store.clone()));
                let served = match target.open(WriterChannel::new(writer)) {
                    Ok(()) => target.serve(reader),
                    Err(err) => Err(err),
                };
                if let Err(err) = served {
                    eprintln!("connection error from {:?}: {}", peer, err);
                }
            }
            Err(err) => {
                eprintln!("accept error: {}", err);
            }
        }
    }

    Ok(())
}
