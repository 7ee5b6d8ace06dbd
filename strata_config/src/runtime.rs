//! Post-merge derivation of runtime fields.
//!
//! These fields depend on merged values but are not sourced from any
//! document: the working directory, the outbound-facing host address, and
//! the composed log path. Discovery failures are fatal to the load: a
//! process that cannot establish where it runs is unsafe to start.

use std::net::UdpSocket;

use camino::Utf8PathBuf;

use crate::base::BaseConfig;
use crate::error::{StrataError, StrataResult};

/// Address the outbound probe connects to. Connecting a UDP socket selects
/// a local address via the routing table without sending a datagram.
const PROBE_ADDR: &str = "114.114.114.114:53";

/// Probe used to discover the host address; injectable for tests.
pub type HostProbe = fn() -> std::io::Result<String>;

/// Fill the derived fields of `base` after all layers have merged.
///
/// # Errors
///
/// Returns [`StrataError::RuntimeProbe`] when the working directory or the
/// host address cannot be established.
pub(crate) fn derive(base: &mut BaseConfig, probe: HostProbe) -> StrataResult<()> {
    let cwd = std::env::current_dir()
        .map_err(|source| StrataError::runtime_probe("working directory", source))?;
    base.work_path = Utf8PathBuf::from_path_buf(cwd).map_err(|path| {
        StrataError::runtime_probe(
            "working directory",
            std::io::Error::other(format!("non-UTF-8 path: {}", path.display())),
        )
    })?;
    base.host = probe().map_err(|source| StrataError::runtime_probe("host address", source))?;
    base.log_path = Utf8PathBuf::from(format!(
        "{}/{}-{}",
        base.log_root, base.host, base.project_name
    ));
    Ok(())
}

/// Discover the local address used for outbound traffic.
pub(crate) fn outbound_host() -> std::io::Result<String> {
    let socket = UdpSocket::bind(("0.0.0.0", 0))?;
    socket.connect(PROBE_ADDR)?;
    Ok(socket.local_addr()?.ip().to_string())
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, ensure};

    use super::derive;
    use crate::base::BaseConfig;
    use crate::error::StrataError;

    fn loopback_probe() -> std::io::Result<String> {
        Ok("127.0.0.1".to_owned())
    }

    fn failing_probe() -> std::io::Result<String> {
        Err(std::io::Error::other("no route"))
    }

    #[test]
    fn log_path_composes_root_host_and_project() -> Result<()> {
        let mut base = BaseConfig {
            project_name: "back-normal".to_owned(),
            log_root: "/var/log/apps".to_owned(),
            ..BaseConfig::default()
        };
        derive(&mut base, loopback_probe)?;
        ensure!(base.host == "127.0.0.1");
        ensure!(base.log_path == "/var/log/apps/127.0.0.1-back-normal");
        Ok(())
    }

    #[test]
    fn work_path_is_the_current_directory() -> Result<()> {
        let mut base = BaseConfig::default();
        derive(&mut base, loopback_probe)?;
        let cwd = std::env::current_dir()?;
        ensure!(base.work_path.as_std_path() == cwd);
        Ok(())
    }

    #[test]
    fn probe_failure_is_fatal() {
        let mut base = BaseConfig::default();
        let err = derive(&mut base, failing_probe);
        assert!(matches!(
            err,
            Err(StrataError::RuntimeProbe {
                what: "host address",
                ..
            })
        ));
    }
}
