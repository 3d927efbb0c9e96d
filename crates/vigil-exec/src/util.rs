use std::process::Stdio;

use tokio::process::{Child, Command};
use vigil_core::LaunchRequest;

use crate::limits::{ProcessLimits, attach_rlimits};

/// Command for `request` with environment, cwd and limits applied.
///
/// Output is piped so it can be forwarded to the log; the child dies with its
/// handle.
pub fn build_command(request: &LaunchRequest<'_>) -> Command {
    let config = request.config;
    let mut cmd = Command::new(&config.command);
    cmd.args(config.args.iter().map(|s| s.as_str()));
    cmd.envs(request.environment().effective());
    if let Some(cwd) = &config.cwd {
        cmd.current_dir(cwd);
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    attach_rlimits(&mut cmd, &ProcessLimits::from_config(config));
    cmd
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        /// Deliver `SIGTERM`; an already reaped child is not an error.
        pub fn terminate(child: &mut Child) -> std::io::Result<()> {
            let Some(pid) = child.id() else {
                return Ok(());
            };
            let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
            if rc != 0 {
                let err = std::io::Error::last_os_error();
                if err.raw_os_error() != Some(libc::ESRCH) {
                    return Err(err);
                }
            }
            Ok(())
        }
    } else {
        /// No graceful signal here; fall back to a hard kill.
        pub fn terminate(child: &mut Child) -> std::io::Result<()> {
            child.start_kill()
        }
    }
}
