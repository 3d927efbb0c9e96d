use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    net::TcpStream,
    process::Child,
    sync::Mutex,
};
use tracing::{debug, info, trace};
use vigil_core::{ExecutorAddress, ExecutorHandle, JobError, LaunchRequest, Launcher, ReadyPolicy};
use vigil_model::{ExecutorKind, Port, ProcessConfig};

use crate::{
    error::ExecError,
    util::{build_command, terminate},
};

const READY_HOST: &str = "127.0.0.1";
const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// Launcher for [`ExecutorKind::Process`]: one OS process per job.
pub struct ProcessLauncher {
    name: &'static str,
}

impl ProcessLauncher {
    pub fn new() -> Self {
        Self { name: "process" }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl Default for ProcessLauncher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Launcher for ProcessLauncher {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, config: &ProcessConfig) -> bool {
        config.kind == ExecutorKind::Process
    }

    async fn launch(&self, request: &LaunchRequest<'_>) -> Result<Box<dyn ExecutorHandle>, JobError> {
        let config = request.config;
        if config.kind != ExecutorKind::Process {
            return Err(ExecError::UnsupportedKind.into());
        }
        if config.command.trim().is_empty() {
            return Err(ExecError::MissingProgram.into());
        }

        trace!(target: "vigil.exec.proc", program = %config.command, args = ?config.args, "spawn");
        let mut child = build_command(request)
            .spawn()
            .map_err(|e| ExecError::Spawn(format!("{}: {e}", config.command)))?;

        forward_output(request.identifier, child.stdout.take(), "stdout");
        forward_output(request.identifier, child.stderr.take(), "stderr");

        debug!(target: "vigil.exec.proc", executor = request.identifier, pid = ?child.id(), "spawned");
        Ok(Box::new(ProcessHandle {
            identifier: request.identifier.to_string(),
            host: request.host.to_string(),
            port: config.executor_port,
            child: Mutex::new(child),
        }))
    }
}

fn forward_output<R>(identifier: &str, stream: Option<R>, stream_name: &'static str)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let Some(stream) = stream else {
        return;
    };
    let identifier = identifier.to_string();
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            info!(target: "vigil.exec.proc.out", executor = %identifier, stream = stream_name, "{line}");
        }
    });
}

struct ProcessHandle {
    identifier: String,
    host: String,
    port: Option<Port>,
    child: Mutex<Child>,
}

impl ProcessHandle {
    /// `None` while the process runs.
    async fn exit_status(&self) -> Result<Option<std::process::ExitStatus>, JobError> {
        let mut child = self.child.lock().await;
        Ok(child.try_wait()?)
    }

    fn address(&self, port: Port) -> ExecutorAddress {
        ExecutorAddress {
            host: self.host.clone(),
            port,
        }
    }
}

async fn accepts_connections(port: Port) -> bool {
    matches!(
        tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect((READY_HOST, port))).await,
        Ok(Ok(_))
    )
}

#[async_trait]
impl ExecutorHandle for ProcessHandle {
    async fn wait_ready(&self, policy: &ReadyPolicy) -> Result<ExecutorAddress, JobError> {
        let started = Instant::now();
        loop {
            if let Some(status) = self.exit_status().await? {
                return Err(ExecError::Exited(status.to_string()).into());
            }
            match self.port {
                None => return Ok(self.address(0)),
                Some(port) if accepts_connections(port).await => return Ok(self.address(port)),
                Some(port) => {
                    if started.elapsed() >= policy.timeout {
                        return Err(JobError::NotReady {
                            waited_ms: started.elapsed().as_millis() as u64,
                            reason: format!("port {port} is not accepting connections"),
                        });
                    }
                }
            }
            tokio::time::sleep(policy.poll_interval).await;
        }
    }

    async fn is_alive(&self) -> bool {
        matches!(self.exit_status().await, Ok(None))
    }

    async fn request_stop(&self) -> Result<(), JobError> {
        let mut child = self.child.lock().await;
        terminate(&mut child)?;
        debug!(target: "vigil.exec.proc", executor = %self.identifier, "terminate signal sent");
        Ok(())
    }

    async fn kill(&self) -> Result<(), JobError> {
        let mut child = self.child.lock().await;
        if child.try_wait()?.is_some() {
            return Ok(());
        }
        child.kill().await?;
        debug!(target: "vigil.exec.proc", executor = %self.identifier, "killed");
        Ok(())
    }
}
