//! queue-exerciser: drives per-session queues the way a file client would.
//!
//! Opens a handle, sets a capacity, fills the queue, checks that one more
//! write is refused with `EACCES`, reads everything back in FIFO order and
//! checks that a second read hits end-of-data. Then repeats the cycle from
//! several threads at once, each with its own handle.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug queue-exerciser --capacity 10 --clients 4 --byte-order le
//! ```

use std::error::Error;
use std::io::{Read, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use clap::Parser;
use handleq_core::{ByteOrder, QueueConfig, QueueFile, SessionRegistry, wire};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "queue-exerciser")]
#[command(about = "Replays a file-style client workload against per-session queues")]
struct Args {
    /// Queue capacity to request (1 to 100)
    #[arg(long, default_value_t = 10)]
    capacity: i8,

    /// Number of concurrent clients in the second phase
    #[arg(long, default_value_t = 4)]
    clients: usize,

    /// Element byte order: le, be or native
    #[arg(long, default_value = "le")]
    byte_order: ByteOrder,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let args = Args::parse();
    let config = QueueConfig::default().with_byte_order(args.byte_order);
    let registry = Arc::new(SessionRegistry::with_config(config));

    let outcome = single_client(&registry, args.capacity)
        .and_then(|()| concurrent_clients(&registry, args.clients, args.capacity));

    match outcome {
        Ok(()) if registry.is_empty() => {
            tracing::info!("all checks passed");
            ExitCode::SUCCESS
        }
        Ok(()) => {
            tracing::error!(leaked = registry.len(), "sessions left attached");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "exercise failed");
            ExitCode::FAILURE
        }
    }
}

fn single_client(registry: &Arc<SessionRegistry>, capacity: i8) -> Result<()> {
    let order = registry.config().byte_order;
    let mut file = registry.open();
    tracing::info!(handle = %file.handle(), "opened queue");

    if file.write(&[capacity as u8])? != 1 {
        return Err("capacity write was not consumed".into());
    }
    tracing::info!(capacity, "queue initialized");

    let expected: Vec<i32> = (1..=capacity as i32).map(|i| i * 10).collect();
    for &value in &expected {
        if file.write(&order.encode(value))? != wire::ELEMENT_WIRE_SIZE {
            return Err(format!("enqueue of {value} was not consumed").into());
        }
        tracing::debug!(value, "enqueued");
    }

    match file.write(&order.encode(999)) {
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            tracing::info!("write to full queue refused with permission denied");
        }
        other => return Err(format!("expected permission denied, got {other:?}").into()),
    }

    let mut buf = vec![0u8; expected.len() * wire::ELEMENT_WIRE_SIZE];
    let n = file.read(&mut buf)?;
    let values = decode(&buf[..n], order)?;
    if values != expected {
        return Err(format!("read {values:?}, expected {expected:?}").into());
    }
    tracing::info!(count = values.len(), "read back queue in FIFO order");

    let n = file.read(&mut buf)?;
    if n != 0 {
        return Err(format!("second read returned {n} bytes, expected end of data").into());
    }
    tracing::info!("second read reached end of data");

    Ok(())
}

fn concurrent_clients(registry: &Arc<SessionRegistry>, clients: usize, capacity: i8) -> Result<()> {
    let workers: Vec<_> = (0..clients)
        .map(|client| {
            let file = registry.open();
            thread::spawn(move || client_cycle(file, client as i32, capacity))
        })
        .collect();

    for worker in workers {
        worker.join().map_err(|_| "client thread panicked")??;
    }
    tracing::info!(clients, "concurrent clients finished");
    Ok(())
}

fn client_cycle(file: QueueFile, client: i32, capacity: i8) -> Result<()> {
    file.set_capacity(capacity)?;
    for round in 0..3 {
        let expected: Vec<i32> = (0..capacity as i32)
            .map(|i| client * 100_000 + round * 1_000 + i)
            .collect();
        for &value in &expected {
            file.push(value)?;
        }
        let values = file.drain_values(expected.len() * wire::ELEMENT_WIRE_SIZE)?;
        if values != expected {
            return Err(format!("client {client} round {round}: read {values:?}").into());
        }
        tracing::debug!(client, round, "round complete");
    }
    Ok(())
}

fn decode(bytes: &[u8], order: ByteOrder) -> Result<Vec<i32>> {
    bytes
        .chunks_exact(wire::ELEMENT_WIRE_SIZE)
        .map(|chunk| wire::element(chunk, order).map_err(Into::into))
        .collect()
}
