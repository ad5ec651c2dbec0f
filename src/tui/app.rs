//! Application loop: draw, read a key, act.

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;

use crate::gateway::AgentGateway;
use crate::storage::ProjectRecords;
use crate::workflow::{Engine, PendingStage, WorkflowError};

use super::review::{Action, ReviewScreen};
use super::view;

/// Runs the review screen until the user quits.
///
/// `gateway` may be absent; browsing still works and stages report that no
/// gateway is configured.
pub fn run(
    engine: Engine,
    gateway: Option<&dyn AgentGateway>,
    records: &dyn ProjectRecords,
) -> io::Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, engine, gateway, records);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    mut engine: Engine,
    gateway: Option<&dyn AgentGateway>,
    records: &dyn ProjectRecords,
) -> io::Result<()> {
    let mut screen = ReviewScreen::new();

    loop {
        let projected = view::project(&engine, &screen);
        terminal.draw(|frame| match &projected {
            Ok(view) => view.render(frame),
            Err(fault) => view::render_fault(frame, fault),
        })?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if let Err(fault) = &projected {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('r') => {
                    tracing::info!(%fault, "review view reset");
                    screen.reset();
                }
                _ => {}
            }
            continue;
        }

        let stages = Stages {
            gateway,
            records,
        };
        match screen.on_key(key, engine.session().files.len()) {
            Action::None => {}
            Action::Quit => return Ok(()),
            Action::ClearError => engine.clear_error(),
            Action::Refine(feedback) => {
                stages.run(terminal, &mut engine, &mut screen, |e| e.begin_refine(&feedback))?;
            }
            Action::Deliver(repo) => {
                stages.run(terminal, &mut engine, &mut screen, |e| {
                    e.begin_deliver(&repo, "", "")
                })?;
            }
            Action::Package => {
                stages.run(terminal, &mut engine, &mut screen, |e| e.begin_package(None))?;
            }
        }
    }
}

/// Where stage requests from the screen are sent.
struct Stages<'a> {
    gateway: Option<&'a dyn AgentGateway>,
    records: &'a dyn ProjectRecords,
}

impl Stages<'_> {
    /// Enters a stage, shows the busy state, blocks on the gateway, and
    /// finishes. Refusals become a notice on the screen.
    fn run(
        &self,
        terminal: &mut DefaultTerminal,
        engine: &mut Engine,
        screen: &mut ReviewScreen,
        begin: impl FnOnce(&mut Engine) -> Result<PendingStage, WorkflowError>,
    ) -> io::Result<()> {
        let Some(gateway) = self.gateway else {
            screen.set_notice("no gateway configured: set [gateway] in config.toml");
            return Ok(());
        };

        let pending = match begin(engine) {
            Ok(pending) => pending,
            Err(e) => {
                screen.set_notice(e.to_string());
                return Ok(());
            }
        };

        if let Ok(busy) = view::project(engine, screen) {
            if let Err(e) = terminal.draw(|frame| busy.render(frame)) {
                let _ = engine.abandon(pending);
                return Err(e);
            }
        }

        let outcome = gateway.call(pending.prompt(), pending.capability());
        if let Err(e) = engine.finish(pending, outcome, self.records) {
            screen.set_notice(e.to_string());
        }
        screen.sync(engine.session().files.len());
        Ok(())
    }
}
