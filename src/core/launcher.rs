//! Window cloning - start a fresh instance of this program

use super::surface::WindowLauncher;
use crate::error::SpawnError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

const FILE_URI_PREFIX: &str = "file://";

/// Turn a `file://` URI (or a plain path) into a path
pub fn uri_to_path(uri: &str) -> PathBuf {
    PathBuf::from(uri.strip_prefix(FILE_URI_PREFIX).unwrap_or(uri))
}

/// Launches with `std::process::Command`. The caller never waits; a
/// detached thread reaps the child when it exits.
#[derive(Debug, Default)]
pub struct ProcessLauncher;

impl WindowLauncher for ProcessLauncher {
    fn launch(&mut self, argv: &[OsString], cwd: Option<&Path>) -> Result<u32, SpawnError> {
        let (program, args) = match argv.split_first() {
            Some((program, args)) => (program.clone(), args),
            None => (std::env::current_exe()?.into_os_string(), &[][..]),
        };

        let mut cmd = Command::new(&program);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        log::debug!("cloning: {:?} in {:?}", program, cwd);
        let mut child = cmd.spawn()?;
        let pid = child.id();
        let reaper = std::thread::Builder::new()
            .name(format!("reap-{}", pid))
            .spawn(move || match child.wait() {
                Ok(status) => log::debug!("cloned window {} exited ({})", pid, status),
                Err(e) => log::debug!("waiting on cloned window {}: {}", pid, e),
            });
        if let Err(e) = reaper {
            log::warn!("unable to start reaper for {}: {}", pid, e);
        }
        Ok(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_to_path() {
        assert_eq!(uri_to_path("file:///home/me/src"), PathBuf::from("/home/me/src"));
        assert_eq!(uri_to_path("/already/a/path"), PathBuf::from("/already/a/path"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_exited_clone_is_reaped() {
        use std::time::{Duration, Instant};

        let mut launcher = ProcessLauncher;
        let pid = launcher.launch(&[OsString::from("true")], None).unwrap();

        // a zombie keeps its /proc entry until waited on
        let proc_dir = PathBuf::from(format!("/proc/{}", pid));
        let deadline = Instant::now() + Duration::from_secs(10);
        while proc_dir.exists() {
            assert!(Instant::now() < deadline, "child {} was never reaped", pid);
            std::thread::sleep(Duration::from_millis(20));
        }
    }

    #[test]
    fn test_launch_failure_is_reported() {
        let mut launcher = ProcessLauncher;
        let argv = vec![OsString::from("/nonexistent/tabterm-binary")];
        assert!(matches!(
            launcher.launch(&argv, None),
            Err(SpawnError::Clone(_))
        ));
    }
}
