//! Boot sequence shown before the portfolio opens.
//!
//! `BootSequence` is the pure state machine; `spawn_boot` drives it with two
//! independent timers and reports each step through a callback.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};
use tracing::debug;

pub const BOOT_LINES: &[&str] = &[
    "Initializing kernel...",
    "Loading portfolio modules...",
    "Decrypting portfolio data...",
    "System Ready.",
];

#[derive(Debug, Clone)]
pub struct BootScript {
    pub lines: Vec<String>,
    pub line_interval: Duration,
    pub progress_step: u8,
    pub progress_interval: Duration,
    pub settle_delay: Duration,
}

impl Default for BootScript {
    fn default() -> Self {
        Self {
            lines: BOOT_LINES.iter().map(|l| l.to_string()).collect(),
            line_interval: Duration::from_millis(400),
            progress_step: 2,
            progress_interval: Duration::from_millis(30),
            settle_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPhase {
    Booting,
    /// Progress hit 100; waiting out the settle delay.
    Settling,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootEvent {
    Line(String),
    Progress(u8),
    Ready,
}

#[derive(Debug, Clone)]
pub struct BootSequence {
    script: BootScript,
    progress: u8,
    lines_shown: usize,
    phase: BootPhase,
}

impl BootSequence {
    pub fn new(script: BootScript) -> Self {
        Self {
            script,
            progress: 0,
            lines_shown: 0,
            phase: BootPhase::Booting,
        }
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    pub fn visible_lines(&self) -> &[String] {
        &self.script.lines[..self.lines_shown]
    }

    /// Reveals the next log line, if any remain and the boot is still running.
    pub fn tick_line(&mut self) -> Option<&str> {
        if self.phase != BootPhase::Booting || self.lines_shown >= self.script.lines.len() {
            return None;
        }
        self.lines_shown += 1;
        Some(&self.script.lines[self.lines_shown - 1])
    }

    /// Advances progress by one step, saturating at 100.
    pub fn tick_progress(&mut self) -> Option<u8> {
        if self.phase != BootPhase::Booting {
            return None;
        }
        self.progress = self.progress.saturating_add(self.script.progress_step.max(1)).min(100);
        if self.progress == 100 {
            self.phase = BootPhase::Settling;
        }
        Some(self.progress)
    }

    /// Returns true exactly once, on the transition to `Ready`.
    pub fn settle(&mut self) -> bool {
        if self.phase == BootPhase::Settling {
            self.phase = BootPhase::Ready;
            true
        } else {
            false
        }
    }
}

/// Owns the running boot timers. Dropping or cancelling it stops both.
pub struct BootHandle {
    task: JoinHandle<()>,
}

impl BootHandle {
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for BootHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Runs the boot sequence on the tokio runtime. `emit` receives every step
/// and returns false once nobody is listening, which stops the sequence.
pub fn spawn_boot<F>(script: BootScript, emit: F) -> BootHandle
where
    F: FnMut(BootEvent) -> bool + Send + 'static,
{
    BootHandle {
        task: tokio::spawn(drive(script, emit)),
    }
}

async fn drive<F>(script: BootScript, mut emit: F)
where
    F: FnMut(BootEvent) -> bool,
{
    let start = Instant::now();
    let mut line_timer = interval_at(start + script.line_interval, script.line_interval);
    let mut progress_timer = interval_at(start + script.progress_interval, script.progress_interval);
    let settle_delay = script.settle_delay;
    let mut sequence = BootSequence::new(script);

    while sequence.phase() == BootPhase::Booting {
        let event = tokio::select! {
            _ = line_timer.tick() => sequence.tick_line().map(|line| BootEvent::Line(line.to_string())),
            _ = progress_timer.tick() => sequence.tick_progress().map(BootEvent::Progress),
        };
        if let Some(event) = event {
            if !emit(event) {
                return;
            }
        }
    }

    sleep(settle_delay).await;
    if sequence.settle() {
        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "boot sequence ready");
        emit(BootEvent::Ready);
    }
}
