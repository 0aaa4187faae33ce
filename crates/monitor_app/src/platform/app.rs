use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use monitor_core::{update, AppState, Effect, JobId, Msg, Notification, Severity};
use monitor_logging::{level_for_verbosity, monitor_info, monitor_warn};

use super::effects::EffectRunner;
use super::logging;
use super::ui::Terminal;
use crate::cli::{Cli, Command};
use crate::config::MonitorConfig;

const RENDER_INTERVAL: Duration = Duration::from_millis(100);

/// Runs one CLI command to completion. Returns false if any error was shown.
pub fn run_app(cli: Cli) -> anyhow::Result<bool> {
    let mut config = MonitorConfig::load(cli.global.config.as_deref())?;
    config.apply_overrides(&cli.global);
    if let Command::Download { dir: Some(dir), .. } = &cli.command {
        config.download_dir = dir.clone();
    }
    config.validate()?;

    logging::initialize(
        cli.global.log_to,
        level_for_verbosity(cli.global.verbose),
        &config.log_file,
    );
    monitor_info!("Starting {:?} against {}", cli.command, config.server_url);

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(
        config.client_settings(),
        config.download_dir.clone(),
        msg_tx.clone(),
    )
    .context("failed to start the HTTP client")?;

    let mut session = Session::for_command(&cli.command);
    for msg in session.startup_messages(&cli.command) {
        let _ = msg_tx.send(msg);
    }

    // Background tick to throttle rendering.
    thread::spawn(move || {
        while msg_tx.send(Msg::Tick).is_ok() {
            thread::sleep(RENDER_INTERVAL);
        }
    });

    let mut state = AppState::with_settings(config.poll_policy(), config.form_defaults());
    let mut terminal = Terminal::stdout(session.shows_history());
    let mut clean = true;

    while let Ok(msg) = msg_rx.recv() {
        let redraw_due = matches!(msg, Msg::Tick);
        let step = session.step(state, msg);
        state = step.state;
        runner.run(step.effects);

        for notification in &step.notifications {
            if notification.severity == Severity::Error {
                clean = false;
            }
            if let Err(err) = terminal.notify(notification) {
                monitor_warn!("Failed to write notification: {}", err);
            }
        }

        if (redraw_due || step.finished) && state.consume_dirty() {
            if let Err(err) = terminal.draw(&state.view()) {
                monitor_warn!("Failed to render: {}", err);
            }
        }
        if step.finished {
            break;
        }
    }

    runner.shutdown();
    monitor_info!("Finished; clean={}", clean);
    Ok(clean)
}

/// Result of feeding one message through the controller.
struct Step {
    state: AppState,
    effects: Vec<Effect>,
    notifications: Vec<Notification>,
    /// Every startup message is handled and nothing is in flight or pending.
    finished: bool,
}

/// Per-command sequencing on top of the controller.
struct Session {
    /// Startup messages not yet dispatched through `update`.
    startup_remaining: usize,
    /// Job to download once the history snapshot has arrived.
    download_after_history: Option<JobId>,
    show_history: bool,
}

impl Session {
    fn for_command(command: &Command) -> Self {
        Self {
            startup_remaining: 0,
            download_after_history: match command {
                Command::Download { job_id, .. } => Some(*job_id),
                _ => None,
            },
            show_history: matches!(command, Command::Submit { .. } | Command::History),
        }
    }

    fn shows_history(&self) -> bool {
        self.show_history
    }

    fn startup_messages(&mut self, command: &Command) -> Vec<Msg> {
        let messages = match command {
            Command::Submit {
                files,
                source,
                target,
            } => {
                let mut messages = vec![Msg::Started];
                for file in files {
                    messages.push(Msg::FileSelected(file.clone()));
                    if let Some(source) = source {
                        messages.push(Msg::SourceLanguageChanged(source.clone()));
                    }
                    if let Some(target) = target {
                        messages.push(Msg::TargetLanguageChanged(target.clone()));
                    }
                    messages.push(Msg::UploadSubmitted);
                }
                messages
            }
            Command::History | Command::Download { .. } => vec![Msg::Started],
            Command::Health => vec![Msg::HealthCheckRequested],
        };
        self.startup_remaining = messages.len();
        messages
    }

    /// Applies `msg` and any follow-up it triggers.
    fn step(&mut self, state: AppState, msg: Msg) -> Step {
        if !matches!(msg, Msg::Tick) {
            self.startup_remaining = self.startup_remaining.saturating_sub(1);
        }
        let follow_up = self.follow_up(&msg);

        let (mut state, mut effects) = update(state, msg);
        let mut notifications = state.take_notifications();
        if let Some(follow_up) = follow_up {
            let (next, more) = update(state, follow_up);
            state = next;
            effects.extend(more);
            notifications.extend(state.take_notifications());
        }

        let finished = self.startup_remaining == 0 && state.is_idle();
        Step {
            state,
            effects,
            notifications,
            finished,
        }
    }

    /// Message to dispatch right after `msg`, if the command needs one.
    fn follow_up(&mut self, msg: &Msg) -> Option<Msg> {
        match msg {
            Msg::HistoryLoaded(_) | Msg::HistoryFailed(_) => self
                .download_after_history
                .take()
                .map(|job_id| Msg::DownloadRequested { job_id }),
            _ => None,
        }
    }
}
