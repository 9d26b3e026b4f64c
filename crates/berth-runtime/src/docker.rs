//! Container backend delegating to the local `docker` binary.

use std::process::Command;

use berth_common::constants::STOP_GRACE_SECS;
use berth_common::error::{BerthError, Result};
use berth_common::types::RuntimeRef;

use crate::runtime::{ContainerRuntime, RuntimeContainer, RuntimeStatus};

/// Backend that shells out to the docker CLI.
///
/// Every operation is one CLI invocation; the engine's "No such
/// container" stderr is mapped to `NotFound` so callers can tell absence
/// apart from real failures.
#[derive(Debug, Clone)]
pub struct DockerCliBackend {
    stop_grace_secs: u64,
}

impl DockerCliBackend {
    /// Creates a backend with the default stop grace period.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stop_grace_secs: STOP_GRACE_SECS,
        }
    }

    /// Creates a backend with a custom stop grace period.
    #[must_use]
    pub const fn with_stop_grace(stop_grace_secs: u64) -> Self {
        Self { stop_grace_secs }
    }

    /// Runs `docker` with the given arguments and returns trimmed stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        tracing::debug!(?args, "docker invocation");
        let output = Command::new("docker")
            .args(args)
            .output()
            .map_err(|e| BerthError::Io {
                path: "docker".into(),
                source: e,
            })?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if is_not_found(&stderr) {
            // stop/rm/inspect all take the handle as the final argument.
            let id = args.last().map_or_else(String::new, ToString::to_string);
            return Err(BerthError::NotFound {
                kind: "container",
                id,
            });
        }
        Err(BerthError::Runtime {
            message: format!("docker {} failed: {stderr}", args.first().unwrap_or(&"")),
        })
    }
}

impl Default for DockerCliBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerRuntime for DockerCliBackend {
    fn create(&self, image: &str) -> Result<RuntimeRef> {
        let id = self.run(&["run", "-d", image])?;
        if id.is_empty() {
            return Err(BerthError::Runtime {
                message: format!("docker run returned no container id for image {image}"),
            });
        }
        tracing::info!(%id, image, "container created");
        Ok(RuntimeRef::new(id))
    }

    fn stop(&self, id: &RuntimeRef) -> Result<()> {
        let grace = self.stop_grace_secs.to_string();
        let _ = self.run(&["stop", "-t", &grace, id.as_str()])?;
        tracing::info!(id = %id, "container stopped");
        Ok(())
    }

    fn remove(&self, id: &RuntimeRef) -> Result<()> {
        let _ = self.run(&["rm", "-f", id.as_str()])?;
        tracing::info!(id = %id, "container removed");
        Ok(())
    }

    fn inspect(&self, id: &RuntimeRef) -> Result<RuntimeStatus> {
        let running = self.run(&["inspect", "-f", "{{.State.Running}}", id.as_str()])?;
        Ok(parse_running_flag(&running))
    }

    fn list(&self) -> Result<Vec<RuntimeContainer>> {
        let raw = self.run(&[
            "ps",
            "-a",
            "--no-trunc",
            "--format",
            "{{.ID}}\t{{.Image}}\t{{.State}}",
        ])?;
        Ok(parse_inventory(&raw))
    }

    fn is_available(&self) -> bool {
        which::which("docker").is_ok()
    }
}

/// Whether docker's stderr reports an unknown container or object.
fn is_not_found(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    lower.contains("no such container") || lower.contains("no such object")
}

/// Parses the output of `docker inspect -f {{.State.Running}}`.
fn parse_running_flag(flag: &str) -> RuntimeStatus {
    if flag.trim() == "true" {
        RuntimeStatus::Running
    } else {
        RuntimeStatus::Stopped
    }
}

/// Parses `docker ps -a` tab-separated lines into inventory entries.
fn parse_inventory(raw: &str) -> Vec<RuntimeContainer> {
    raw.lines()
        .filter_map(|line| {
            let mut parts = line.splitn(3, '\t');
            let id = parts.next()?.trim();
            if id.is_empty() {
                return None;
            }
            let image = parts.next().unwrap_or("unknown").trim();
            let state = parts.next().unwrap_or("").trim();
            Some(RuntimeContainer {
                id: RuntimeRef::new(id),
                image: image.to_string(),
                status: if state == "running" {
                    RuntimeStatus::Running
                } else {
                    RuntimeStatus::Stopped
                },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_detection_matches_docker_wording() {
        assert!(is_not_found("Error response from daemon: No such container: abc"));
        assert!(is_not_found("Error: no such object: abc"));
        assert!(!is_not_found("Error response from daemon: conflict"));
    }

    #[test]
    fn running_flag_parses_both_ways() {
        assert_eq!(parse_running_flag("true"), RuntimeStatus::Running);
        assert_eq!(parse_running_flag("false"), RuntimeStatus::Stopped);
        assert_eq!(parse_running_flag(""), RuntimeStatus::Stopped);
    }

    #[test]
    fn inventory_parses_tab_separated_lines() {
        let raw = "abc123\tnginx:latest\trunning\ndef456\tredis\texited\n";
        let containers = parse_inventory(raw);
        assert_eq!(containers.len(), 2);
        assert_eq!(containers[0].id.as_str(), "abc123");
        assert_eq!(containers[0].image, "nginx:latest");
        assert_eq!(containers[0].status, RuntimeStatus::Running);
        assert_eq!(containers[1].status, RuntimeStatus::Stopped);
    }

    #[test]
    fn inventory_skips_blank_lines() {
        assert!(parse_inventory("\n\n").is_empty());
    }
}
