// src/exec/task_runner.rs

//! Individual command process runner.

use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{ChildStderr, ChildStdout, Command as ProcessCommand};
use tracing::debug;

use crate::errors::Result;
use crate::exec::backend::{CommandOutcome, OutputMode};
use crate::plan::Command;

/// Spawn `command`, wait for it to exit, and report its exit code.
///
/// The command's `env` is layered over the inherited environment. The child
/// is *not* killed if this future is dropped: nothing in this crate
/// terminates a running command.
pub async fn run_process(command: &Command, output: OutputMode) -> Result<CommandOutcome> {
    debug!(
        tag = %command.tag,
        cmd = %command.command_line(),
        ?output,
        "starting command process"
    );

    let mut cmd = ProcessCommand::new(&command.path);
    cmd.args(&command.args).envs(&command.env);

    match output {
        OutputMode::Inherit => {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }
        OutputMode::Capture => {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        }
    }

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process '{}' for '{}'", command.path, command.tag))?;

    let captured = match output {
        OutputMode::Capture => {
            let stdout = child.stdout.take();
            let stderr = child.stderr.take();
            read_combined(stdout, stderr)
                .await
                .with_context(|| format!("reading output of '{}'", command.tag))?
        }
        OutputMode::Inherit => Vec::new(),
    };

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of '{}'", command.tag))?;

    let exit_code = status.code().unwrap_or(-1);
    debug!(
        tag = %command.tag,
        exit_code,
        success = status.success(),
        captured_bytes = captured.len(),
        "command process exited"
    );

    Ok(CommandOutcome {
        exit_code,
        output: captured,
    })
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Drain both pipes into a single buffer, in whatever order chunks arrive.
async fn read_combined(
    mut stdout: Option<ChildStdout>,
    mut stderr: Option<ChildStderr>,
) -> std::io::Result<Vec<u8>> {
    let mut combined = Vec::new();
    let mut out_buf = [0u8; 8192];
    let mut err_buf = [0u8; 8192];

    while stdout.is_some() || stderr.is_some() {
        let (stream, n) = tokio::select! {
            res = read_some(stdout.as_mut(), &mut out_buf) => (Stream::Stdout, res?),
            res = read_some(stderr.as_mut(), &mut err_buf) => (Stream::Stderr, res?),
        };

        match (stream, n) {
            (Stream::Stdout, 0) => stdout = None,
            (Stream::Stderr, 0) => stderr = None,
            (Stream::Stdout, n) => combined.extend_from_slice(&out_buf[..n]),
            (Stream::Stderr, n) => combined.extend_from_slice(&err_buf[..n]),
        }
    }

    Ok(combined)
}

/// Read once from `reader`; a closed stream never completes.
async fn read_some<R: AsyncRead + Unpin>(
    reader: Option<&mut R>,
    buf: &mut [u8],
) -> std::io::Result<usize> {
    match reader {
        Some(r) => r.read(buf).await,
        None => std::future::pending().await,
    }
}
