use anyhow::Context;
use anyhow::Result;

use clap::Parser;

use std::convert::TryFrom;
use std::path::PathBuf;

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;
use tracing::Level;

use tracing_subscriber::filter::EnvFilter;

use txstamp::cmsg::Registry;
use txstamp::configuration::Configuration;
use txstamp::socket::SocketError;
use txstamp::timestamping;
use txstamp::timestamping::TimestampingMask;
use txstamp::TimestampedSocket;

const PROBE: &[u8] = b"txstamp";

/// Send probe datagrams and log their transmit timestamps
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// Configuration file
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config = load_config(&args);

    if let Err(e) = run(config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Configuration) -> Result<()> {
    for interface in config.hardware_interfaces() {
        match timestamping::enable_hardware_timestamping(&interface.name) {
            Ok(()) => info!("hardware timestamping enabled on {}", interface.name),
            Err(e) => error!("{}", e),
        }
    }

    let bind = config.bind_addr()?;
    let target = config.target_addr()?;
    let mask = TimestampingMask::from(&config);

    let socket = TimestampedSocket::connect(bind, target)
        .with_context(|| format!("unable to open timestamping socket to {}", target))?;

    let mut registry = Registry::default();
    timestamping::register(&mut registry);

    info!(
        "sending probes from {} to {} requesting {:?}",
        socket.local_addr()?,
        target,
        mask
    );

    let mut interval = tokio::time::interval(config.interval()?);

    loop {
        interval.tick().await;

        match probe(&socket, &registry, mask) {
            Ok(()) => (),
            Err(e) if e.is_transient() => warn!("{}", e),
            Err(e) => return Err(e.into()),
        }
    }
}

fn probe(
    socket: &TimestampedSocket,
    registry: &Registry,
    mask: TimestampingMask,
) -> Result<(), SocketError> {
    // timestamps for the previous probe have arrived by now
    while let Some(unified) = socket.next_unified(registry)? {
        info!("{}", unified);
    }

    let sent = socket.send(PROBE, mask)?;
    debug!("sent {} byte probe", sent);

    Ok(())
}

fn load_config(args: &Args) -> Configuration {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .finish();

    let (config, filter) = tracing::subscriber::with_default(subscriber, || {
        let config = match Configuration::load(&args.config) {
            Ok(c) => c,
            Err(e) => {
                error!("failed to load configuration file: {}", e);
                std::process::exit(1);
            }
        };

        let filter = match EnvFilter::try_from(config.clone()) {
            Ok(f) => f,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        };

        (config, filter)
    });

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber).expect("no global subscriber has been set");

    config
}
