//! POSIX rlimit-based resource limits for executor processes.
//!
//! On Unix the limits are applied inside a `pre_exec` hook, in the child after
//! `fork()` and right before `execve()`, so the worker never runs unrestricted.
//! Elsewhere a non-empty request is logged and ignored.
use tokio::process::Command;
#[cfg(not(unix))]
use tracing::warn;
use vigil_model::{ProcessConfig, RlimitSpec};

/// Limits to apply to one child process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessLimits {
    /// `RLIMIT_NOFILE`.
    pub max_open_files: Option<u64>,
    /// `RLIMIT_FSIZE`; exceeding it usually ends the process with `SIGXFSZ`.
    pub max_file_size_bytes: Option<u64>,
    /// `RLIMIT_CORE = 0`.
    pub disable_core_dumps: bool,
    /// `RLIMIT_AS`, derived from the config's memory limit.
    pub max_address_space_bytes: Option<u64>,
}

impl ProcessLimits {
    pub fn from_config(config: &ProcessConfig) -> Self {
        let RlimitSpec {
            max_open_files,
            max_file_size_bytes,
            disable_core_dumps,
        } = config.limits.clone();
        Self {
            max_open_files,
            max_file_size_bytes,
            disable_core_dumps,
            max_address_space_bytes: config
                .memory_limit_mb
                .map(|mb| mb.saturating_mul(1024 * 1024)),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max_open_files.is_none()
            && self.max_file_size_bytes.is_none()
            && !self.disable_core_dumps
            && self.max_address_space_bytes.is_none()
    }
}

/// Attach `limits` to `cmd`.
pub fn attach_rlimits(cmd: &mut Command, limits: &ProcessLimits) {
    if limits.is_empty() {
        return;
    }

    #[cfg(unix)]
    {
        unix_impl::attach_rlimits(cmd, *limits);
    }

    #[cfg(not(unix))]
    {
        let _ = cmd;
        warn!(
            target: "vigil_exec::limits",
            ?limits,
            "process limits requested on a non-Unix OS; ignored"
        );
    }
}

#[cfg(unix)]
mod unix_impl {
    use std::io;

    use tokio::process::Command;

    use super::ProcessLimits;

    cfg_if::cfg_if! {
        if #[cfg(all(target_os = "linux", target_env = "gnu"))] {
            type Resource = libc::__rlimit_resource_t;
        } else {
            type Resource = libc::c_int;
        }
    }

    pub fn attach_rlimits(cmd: &mut Command, limits: ProcessLimits) {
        unsafe {
            cmd.pre_exec(move || {
                if let Some(nofile) = limits.max_open_files {
                    apply_rlimit(libc::RLIMIT_NOFILE, nofile)?;
                }
                if let Some(fsize) = limits.max_file_size_bytes {
                    apply_rlimit(libc::RLIMIT_FSIZE, fsize)?;
                }
                if let Some(bytes) = limits.max_address_space_bytes {
                    apply_rlimit(libc::RLIMIT_AS, bytes)?;
                }
                if limits.disable_core_dumps {
                    apply_rlimit(libc::RLIMIT_CORE, 0)?;
                }
                Ok(())
            });
        }
    }

    // Async-signal-safe: only setrlimit and errno are touched.
    fn apply_rlimit(resource: Resource, value: u64) -> io::Result<()> {
        let rlim = libc::rlimit {
            rlim_cur: value as libc::rlim_t,
            rlim_max: value as libc::rlim_t,
        };
        let rc = unsafe { libc::setrlimit(resource, &rlim) };
        if rc != 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_has_no_limits() {
        let limits = ProcessLimits::from_config(&ProcessConfig::process("sh", [""; 0]));
        assert!(limits.is_empty());

        let mut cmd = Command::new("sh");
        attach_rlimits(&mut cmd, &limits);
    }

    #[test]
    fn memory_limit_becomes_address_space() {
        let mut config = ProcessConfig::process("sh", [""; 0]);
        config.memory_limit_mb = Some(512);
        config.limits.max_open_files = Some(1024);

        let limits = ProcessLimits::from_config(&config);
        assert_eq!(limits.max_address_space_bytes, Some(512 * 1024 * 1024));
        assert_eq!(limits.max_open_files, Some(1024));
        assert!(!limits.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn limited_child_still_runs() {
        let mut config = ProcessConfig::process("sh", ["-c", "exit 0"]);
        config.limits.max_open_files = Some(256);
        config.limits.disable_core_dumps = true;

        let mut cmd = Command::new("sh");
        cmd.args(["-c", "exit 0"]);
        attach_rlimits(&mut cmd, &ProcessLimits::from_config(&config));

        let status = cmd.status().await.unwrap();
        assert!(status.success());
    }
}
