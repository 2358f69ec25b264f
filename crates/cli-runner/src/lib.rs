//! Entrypoint for running async CLI commands on a tokio runtime.

use std::{future::Future, time::Duration};

use tokio::runtime::{Handle, Runtime};
use tracing::{debug, warn};

/// How long to wait for spawned tasks after a command finished.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Executes CLI commands.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct CliRunner;

impl CliRunner {
    /// Executes the given _async_ command on the tokio runtime until the command future resolves
    /// or until the process receives a `SIGINT` or `SIGTERM` signal.
    pub fn run_command_until_exit<F, E>(
        self,
        command: impl FnOnce(CliContext) -> F,
    ) -> Result<(), E>
    where
        F: Future<Output = Result<(), E>>,
        E: Send + Sync + From<std::io::Error> + 'static,
    {
        let runtime = tokio_runtime()?;
        let context = CliContext { handle: runtime.handle().clone() };

        let result = runtime.block_on(run_until_ctrl_c(command(context)));

        debug!(target: "safe-dump::cli", "shutting down runtime");
        runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);

        result
    }
}

/// Additional context provided by the [`CliRunner`] when executing commands.
#[derive(Debug, Clone)]
pub struct CliContext {
    handle: Handle,
}

impl CliContext {
    /// Handle of the runtime executing the command.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

/// Creates a new default tokio multi-thread [Runtime] with all features enabled.
pub fn tokio_runtime() -> Result<Runtime, std::io::Error> {
    tokio::runtime::Builder::new_multi_thread().enable_all().build()
}

/// Runs the future to completion or until a `ctrl_c` signal is received.
async fn run_until_ctrl_c<F, E>(fut: F) -> Result<(), E>
where
    F: Future<Output = Result<(), E>>,
    E: Send + Sync + From<std::io::Error> + 'static,
{
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut stream = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        let sigterm = stream.recv();

        tokio::select! {
            _ = ctrl_c => {
                warn!(target: "safe-dump::cli", "received ctrl-c");
            },
            _ = sigterm => {
                warn!(target: "safe-dump::cli", "received SIGTERM");
            },
            res = fut => res?,
        }
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            _ = ctrl_c => {
                warn!(target: "safe-dump::cli", "received ctrl-c");
            },
            res = fut => res?,
        }
    }

    Ok(())
}
