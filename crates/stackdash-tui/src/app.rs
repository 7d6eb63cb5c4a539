//! Terminal event loop.
//!
//! Every producer posts [`Msg`]s into one channel: a terminal input thread
//! (keys, resizes and ticks), a bridge thread relaying broker events, one
//! thread per asynchronous job, and anything holding a [`App::sender`]. The
//! loop drains the channel, hands each message to the navigator and redraws.

use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;

use stackdash_core::Broker;

use crate::cmd::{Cmd, Job};
use crate::messages::{ErrorMsg, Msg};
use crate::navigator::Navigator;
use crate::page::PageKind;

/// How long the input thread waits for a terminal event before sending a tick.
pub const TICK_RATE: Duration = Duration::from_millis(250);

pub struct App {
    navigator: Navigator,
    broker: Arc<Broker>,
    tx: Sender<Msg>,
    rx: Receiver<Msg>,
    dump: Option<File>,
}

impl App {
    #[must_use]
    pub fn new(navigator: Navigator, broker: Arc<Broker>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            navigator,
            broker,
            tx,
            rx,
            dump: None,
        }
    }

    /// Write every processed message to `file`.
    #[must_use]
    pub fn with_message_dump(mut self, file: File) -> Self {
        self.dump = Some(file);
        self
    }

    /// A handle for posting messages into the loop from elsewhere.
    #[must_use]
    pub fn sender(&self) -> Sender<Msg> {
        self.tx.clone()
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Run a command's jobs: messages are posted straight back, tasks run on
    /// their own thread and post their result, if any.
    pub fn dispatch(&self, cmd: Cmd) {
        for job in cmd.into_jobs() {
            let tx = self.tx.clone();
            match job {
                Job::Msg(msg) => {
                    let _ = tx.send(msg);
                }
                Job::Task(task) => {
                    thread::spawn(move || {
                        if let Some(msg) = task() {
                            let _ = tx.send(msg);
                        }
                    });
                }
            }
        }
    }

    /// Handle one message.
    pub fn process(&mut self, msg: Msg) {
        self.record(&msg);
        let cmd = self.navigator.handle_message(msg);
        self.dispatch(cmd);
    }

    /// Handle every queued message without blocking. Returns how many were
    /// handled.
    pub fn drain(&mut self) -> usize {
        let pending: Vec<Msg> = self.rx.try_iter().collect();
        let n = pending.len();
        for msg in pending {
            self.process(msg);
        }
        n
    }

    fn record(&mut self, msg: &Msg) {
        if let Some(file) = self.dump.as_mut() {
            if let Err(err) = writeln!(file, "{msg:?}") {
                tracing::warn!(error = %err, "writing message dump, disabling it");
                self.dump = None;
            }
        }
    }

    pub fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| self.navigator.render(frame))?;
        Ok(())
    }

    /// Take over the terminal and run until a quit message arrives.
    pub fn run(mut self, first: PageKind) -> io::Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.run_loop(&mut terminal, first);
        teardown_terminal(&mut terminal)?;
        result
    }

    fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>, first: PageKind) -> io::Result<()> {
        spawn_input(self.tx.clone());
        spawn_bridge(&self.broker, self.tx.clone());

        let size = terminal.size()?;
        self.process(Msg::Resize {
            width: size.width,
            height: size.height,
        });
        let init = self.navigator.init(first);
        self.dispatch(init);
        tracing::info!(page = %first, "dashboard started");

        loop {
            self.draw(terminal)?;
            if self.navigator.should_quit() {
                break;
            }
            // Ticks guarantee a message at least every TICK_RATE.
            let Ok(msg) = self.rx.recv() else {
                break;
            };
            self.process(msg);
            self.drain();
        }
        tracing::info!("dashboard stopped");
        Ok(())
    }
}

/// Forward terminal events, or a tick when none arrives in time.
fn spawn_input(tx: Sender<Msg>) {
    thread::spawn(move || loop {
        let msg = match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => Msg::Key(key),
                Ok(Event::Resize(width, height)) => Msg::Resize { width, height },
                Ok(_) => continue,
                Err(err) => ErrorMsg::new("reading terminal input", err).into(),
            },
            Ok(false) => Msg::Tick,
            Err(err) => ErrorMsg::new("polling terminal input", err).into(),
        };
        if tx.send(msg).is_err() {
            break;
        }
    });
}

/// Relay every domain event published on the broker.
fn spawn_bridge(broker: &Broker, tx: Sender<Msg>) {
    let events = broker.subscribe();
    thread::spawn(move || {
        for event in events {
            if tx.send(Msg::Resource(event)).is_err() {
                break;
            }
        }
    });
}

/// Set up the terminal for TUI mode.
pub fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Tear down the terminal, restoring normal mode.
pub fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Best effort restore for when the loop cannot tear down itself, e.g. from
/// a panic hook.
pub fn restore_terminal() {
    let _ = terminal::disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
}
