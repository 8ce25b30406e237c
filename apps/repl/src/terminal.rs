//! Line-mode terminal front-end for a console session.

use std::io::{self, Write};

use anyhow::Context;
use console_core::{
    render_entry, ConsoleSession, FocusChange, LineView, LiveInput, Outcome, PendingEvaluation,
    Tone,
};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::JoinHandle,
};
use tracing::{debug, info};

const QUIT_COMMAND: &str = ":quit";
const RESET_COMMAND: &str = ":reset";

pub struct Painter<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Painter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn paint(&mut self, view: &LineView<'_>) -> io::Result<()> {
        match *view {
            LineView::PastInput { text } => self.line(text, Color::DarkGrey),
            LineView::Output { tone, text } => self.line(text, tone_color(tone)),
            LineView::LiveInput { enabled: false, .. } => Ok(()),
            LineView::LiveInput { prompt, value, .. } => {
                write!(self.out, "{prompt}{value}")?;
                self.out.flush()
            }
        }
    }

    pub fn clear(&mut self) -> io::Result<()> {
        if self.color {
            queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        } else {
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str, color: Color) -> io::Result<()> {
        if self.color {
            queue!(
                self.out,
                SetForegroundColor(color),
                Print(text),
                ResetColor,
                Print("\n")
            )?;
        } else {
            writeln!(self.out, "{text}")?;
        }
        self.out.flush()
    }
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Error => Color::Red,
        Tone::Result => Color::Green,
        Tone::Neutral => Color::Grey,
    }
}

pub enum Step {
    Continue,
    Quit,
    Evaluate(PendingEvaluation),
}

pub struct Frontend<W: Write> {
    session: ConsoleSession,
    live: LiveInput,
    painter: Painter<W>,
    banners: Vec<String>,
    painted: usize,
    echoes_input: bool,
}

impl<W: Write> Frontend<W> {
    /// `echoes_input` is set when the terminal already shows typed lines, so
    /// past inputs are not painted a second time.
    pub fn new(
        session: ConsoleSession,
        live: LiveInput,
        painter: Painter<W>,
        banners: Vec<String>,
        echoes_input: bool,
    ) -> Self {
        Self {
            session,
            live,
            painter,
            banners,
            painted: 0,
            echoes_input,
        }
    }

    pub fn session(&self) -> &ConsoleSession {
        &self.session
    }

    pub fn start(&mut self) -> io::Result<()> {
        self.paint_new_entries()?;
        self.show_prompt()
    }

    pub fn handle_line(&mut self, line: &str) -> anyhow::Result<Step> {
        let Some(line) = self.live.submit(line) else {
            return Ok(Step::Continue);
        };
        match line.trim() {
            QUIT_COMMAND => Ok(Step::Quit),
            RESET_COMMAND => {
                self.session.reset(self.banners.clone())?;
                self.painted = 0;
                self.painter.clear()?;
                self.start()?;
                Ok(Step::Continue)
            }
            _ => {
                self.session.input_changed(line);
                let pending = self.session.begin_submit()?;
                self.sync_focus()?;
                Ok(Step::Evaluate(pending))
            }
        }
    }

    pub fn finish(&mut self, outcome: Outcome) -> anyhow::Result<()> {
        self.session.complete(outcome)?;
        self.paint_new_entries()?;
        self.sync_focus()?;
        Ok(())
    }

    pub fn into_painter(self) -> Painter<W> {
        self.painter
    }

    fn paint_new_entries(&mut self) -> io::Result<()> {
        let transcript = self.session.state().transcript();
        for entry in &transcript[self.painted.min(transcript.len())..] {
            if self.echoes_input && entry.is_input() {
                continue;
            }
            self.painter.paint(&render_entry(entry))?;
        }
        self.painted = transcript.len();
        Ok(())
    }

    fn sync_focus(&mut self) -> io::Result<()> {
        match self.live.sync(self.session.is_busy()) {
            Some(FocusChange::Focus) => self.show_prompt(),
            Some(FocusChange::Blur) | None => Ok(()),
        }
    }

    fn show_prompt(&mut self) -> io::Result<()> {
        let view = self.live.view(self.session.state().current_input());
        self.painter.paint(&view)
    }
}

/// Drive the front-end from stdin until `:quit` or end of input.
pub async fn run<W: Write>(mut frontend: Frontend<W>) -> anyhow::Result<()> {
    frontend.start()?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: Option<JoinHandle<Outcome>> = None;
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line.context("failed to read stdin")? {
                Some(line) => match frontend.handle_line(&line)? {
                    Step::Continue => {}
                    Step::Quit => break,
                    Step::Evaluate(pending) => {
                        debug!(input = %pending.input(), "evaluation started");
                        in_flight = Some(tokio::spawn(pending.run()));
                    }
                },
                None => {
                    stdin_open = false;
                    if in_flight.is_none() {
                        break;
                    }
                }
            },
            joined = wait_for(&mut in_flight), if in_flight.is_some() => {
                in_flight = None;
                frontend.finish(joined.context("evaluation task failed")?)?;
                if !stdin_open {
                    break;
                }
            }
        }
    }

    info!(
        lines = frontend.session().state().transcript().len(),
        "console session closed"
    );
    let mut out = frontend.into_painter().into_inner();
    writeln!(out)?;
    Ok(())
}

async fn wait_for(
    task: &mut Option<JoinHandle<Outcome>>,
) -> Result<Outcome, tokio::task::JoinError> {
    match task {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
