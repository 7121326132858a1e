use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use multirun::errors::{MultirunError, Result};
use multirun::exec::{CommandOutcome, CommandRunner, OutputMode};
use multirun::plan::Command;

#[derive(Debug, Clone)]
struct Behaviour {
    exit_code: Option<i32>,
    output: Vec<u8>,
    delay: Duration,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            exit_code: Some(0),
            output: Vec::new(),
            delay: Duration::ZERO,
        }
    }
}

/// A fake runner that:
/// - records which commands were started and finished, by tag
/// - returns a scripted exit code / output per tag (default: exit 0)
/// - can hold a command "running" for a while to shape completion order.
///
/// Clones share state, so keep one clone for assertions and hand the other
/// to the engine.
#[derive(Debug, Clone, Default)]
pub struct FakeRunner {
    behaviours: Arc<Mutex<HashMap<String, Behaviour>>>,
    started: Arc<Mutex<Vec<String>>>,
    finished: Arc<Mutex<Vec<String>>>,
    modes: Arc<Mutex<Vec<(String, OutputMode)>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn update(self, tag: &str, f: impl FnOnce(&mut Behaviour)) -> Self {
        {
            let mut map = self.behaviours.lock().unwrap();
            f(map.entry(tag.to_string()).or_default());
        }
        self
    }

    pub fn exit(self, tag: &str, code: i32) -> Self {
        self.update(tag, |b| b.exit_code = Some(code))
    }

    /// Make `tag` fail to launch, as if its executable were missing.
    pub fn launch_error(self, tag: &str) -> Self {
        self.update(tag, |b| b.exit_code = None)
    }

    pub fn output(self, tag: &str, output: &str) -> Self {
        self.update(tag, |b| b.output = output.as_bytes().to_vec())
    }

    pub fn delay(self, tag: &str, delay: Duration) -> Self {
        self.update(tag, |b| b.delay = delay)
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    pub fn output_modes(&self) -> Vec<(String, OutputMode)> {
        self.modes.lock().unwrap().clone()
    }

    /// Highest number of commands that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(
        &'a self,
        command: &'a Command,
        output: OutputMode,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutcome>> + Send + 'a>> {
        Box::pin(async move {
            let behaviour = self
                .behaviours
                .lock()
                .unwrap()
                .get(&command.tag)
                .cloned()
                .unwrap_or_default();

            self.started.lock().unwrap().push(command.tag.clone());
            self.modes.lock().unwrap().push((command.tag.clone(), output));

            let Some(exit_code) = behaviour.exit_code else {
                return Err(MultirunError::Other(anyhow!(
                    "spawning process '{}': No such file or directory",
                    command.path
                )));
            };

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if !behaviour.delay.is_zero() {
                tokio::time::sleep(behaviour.delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.finished.lock().unwrap().push(command.tag.clone());

            let output = match output {
                OutputMode::Capture => behaviour.output,
                OutputMode::Inherit => Vec::new(),
            };
            Ok(CommandOutcome { exit_code, output })
        })
    }
}
