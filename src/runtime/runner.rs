use crate::runtime::command::Command;
use crate::runtime::effect::Effect;
use crate::runtime::event::AppEvent;
use crate::runtime::key_bindings::KeyBindings;
use crate::runtime::reducer::Reducer;
use crate::runtime::scheduler::Scheduler;
use crate::state::{App, NoticeKind};
use crate::task::TaskExecutor;
use crate::terminal::{Terminal, TerminalEvent};
use crate::ui::renderer::Renderer;
use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

/// Upper bound on how long the loop blocks on input; also the spinner rate.
const TICK: Duration = Duration::from_millis(100);

pub struct Runtime {
    state: App,
    terminal: Terminal,
    scheduler: Scheduler,
    key_bindings: KeyBindings,
    executor: TaskExecutor,
    renderer: Renderer,
}

impl Runtime {
    pub fn new(state: App, terminal: Terminal) -> Self {
        Self {
            state,
            terminal,
            scheduler: Scheduler::new(),
            key_bindings: KeyBindings::new(),
            executor: TaskExecutor::new(),
            renderer: Renderer::default(),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        self.terminal.enter()?;

        let run_result = (|| -> io::Result<()> {
            // Work queued before the loop started, e.g. a file given on the command line.
            let initial = self.state.take_pending_effects();
            self.apply_effects(initial)?;
            self.render()?;

            while !self.state.should_exit() {
                self.process_scheduled_events()?;
                self.process_job_outcomes()?;

                let timeout = self.scheduler.poll_timeout(Instant::now(), TICK);
                let event = self.terminal.poll_event(timeout)?;
                self.dispatch_app_event(AppEvent::Terminal(event))?;
            }

            Ok(())
        })();

        let exit_result = self.terminal.exit();
        run_result.and(exit_result)
    }

    fn process_scheduled_events(&mut self) -> io::Result<()> {
        for event in self.scheduler.drain_ready(Instant::now()) {
            self.dispatch_app_event(AppEvent::Timer(event))?;
        }
        Ok(())
    }

    fn process_job_outcomes(&mut self) -> io::Result<()> {
        for outcome in self.executor.drain_ready() {
            self.dispatch_app_event(AppEvent::Job(outcome))?;
        }
        Ok(())
    }

    fn dispatch_app_event(&mut self, event: AppEvent) -> io::Result<()> {
        let effects = match event {
            AppEvent::Terminal(TerminalEvent::Resize(size)) => {
                self.terminal.set_size(size);
                vec![Effect::RequestRender]
            }
            AppEvent::Terminal(TerminalEvent::Key(key)) => {
                let command = self.key_bindings.resolve(key);
                Reducer::reduce(&mut self.state, command)
            }
            AppEvent::Terminal(TerminalEvent::Tick) => {
                Reducer::reduce(&mut self.state, Command::Tick)
            }
            AppEvent::Job(outcome) => Reducer::on_job(&mut self.state, outcome),
            AppEvent::Timer(event) => Reducer::on_timer(&mut self.state, event),
        };
        self.apply_effects(effects)
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) -> io::Result<()> {
        let mut render_requested = false;
        let mut queue = VecDeque::from(effects);

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Spawn(job) => self.executor.spawn(job),
                Effect::Schedule(cmd) => self.scheduler.schedule(cmd, Instant::now()),
                Effect::OpenUrl(url) => {
                    if let Err(err) = open::that_detached(&url) {
                        tracing::warn!(%url, error = %err, "could not open url");
                        self.state
                            .notify(NoticeKind::Error, format!("Could not open {url}: {err}"));
                        queue.extend(self.state.take_pending_effects());
                    } else {
                        tracing::info!(%url, "opened url");
                    }
                    render_requested = true;
                }
                Effect::RequestRender => render_requested = true,
            }
        }

        if render_requested {
            self.render()?;
        }

        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let frame = self.renderer.render(&self.state, self.terminal.size());
        self.terminal.render_frame(&frame)
    }
}
