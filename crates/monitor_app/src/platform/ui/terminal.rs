use std::io::{self, Write};

use monitor_core::{AppViewModel, Notification};

use super::render;

/// Line-oriented terminal output that only reprints a section when it changed.
pub struct Terminal<W: Write> {
    out: W,
    last_jobs: Vec<String>,
    last_history: Vec<String>,
    show_history: bool,
}

impl Terminal<io::Stdout> {
    pub fn stdout(show_history: bool) -> Self {
        Self::new(io::stdout(), show_history)
    }
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W, show_history: bool) -> Self {
        Self {
            out,
            last_jobs: Vec::new(),
            last_history: Vec::new(),
            show_history,
        }
    }

    pub fn draw(&mut self, view: &AppViewModel) -> io::Result<()> {
        let jobs = render::render_jobs(view);
        if jobs != self.last_jobs {
            write_lines(&mut self.out, &jobs)?;
            self.last_jobs = jobs;
        }
        if self.show_history {
            let history = render::render_local_history(view);
            if history != self.last_history {
                write_lines(&mut self.out, &history)?;
                self.last_history = history;
            }
        }
        self.out.flush()
    }

    pub fn notify(&mut self, notification: &Notification) -> io::Result<()> {
        writeln!(self.out, "{}", render::format_notification(notification))?;
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_core::{update, AppState, Msg, Severity, UploadOutcome};
    use std::path::PathBuf;

    #[test]
    fn unchanged_sections_are_not_reprinted() {
        let (state, _) = update(AppState::new(), Msg::FileSelected(PathBuf::from("doc.pdf")));
        let (state, _) = update(state, Msg::UploadSubmitted);
        let (state, _) = update(
            state,
            Msg::UploadFinished(UploadOutcome::Accepted { job_id: 42 }),
        );

        let mut terminal = Terminal::new(Vec::new(), false);
        terminal.draw(&state.view()).unwrap();
        terminal.draw(&state.view()).unwrap();
        terminal
            .notify(&Notification {
                severity: Severity::Success,
                message: "done".to_string(),
            })
            .unwrap();

        let output = String::from_utf8(terminal.into_inner()).unwrap();
        assert_eq!(output.matches("Job #42").count(), 1);
        assert!(output.contains("[Pending  ]"));
        assert!(output.ends_with("[ok] done\n"));
    }
}
