use std::io;
use std::process::Command;

use tracing::info;

/// Bring a link up: `ip link set up dev <iface_name>`
///
/// No address is assigned; the responder only needs frames to flow.
pub fn bring_up(iface_name: &str) -> io::Result<()> {
    let status = Command::new("ip")
        .arg("link")
        .arg("set")
        .arg("up")
        .arg("dev")
        .arg(iface_name)
        .status()?;

    if !status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("failed to bring up interface {} ({})", iface_name, status),
        ));
    }

    info!("interface {} is up", iface_name);
    Ok(())
}
