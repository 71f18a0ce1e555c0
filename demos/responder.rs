//! Run the responder on a TAP device
//!
//! To run this example:
//!
//! ```sh
//! cargo run --example responder -- --iface tap0 --reserve 10.0.0.99 -v
//! ```
//!
//! Note: Root/sudo privileges are required to create the TAP device. Attach it
//! to a bridge (or give the host an address on the same subnet) to have
//! traffic reach it; `ping 10.0.0.99` should then be answered.

use clap::Parser;
use flycatcher::{Config, TapInterface};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod utils;
use utils::network::bring_up;

fn main() -> std::io::Result<()> {
    let config = Config::parse();

    let level = if config.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let iface = TapInterface::new(&config.iface, config.ether)?;
    bring_up(iface.name())?;

    let responder = config.responder(iface);
    info!("answering for {} address(es)", responder.cache().len());
    responder.run()
}
