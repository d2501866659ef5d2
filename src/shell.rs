//! Terminal presentation shell
//!
//! Owns the session controller for the life of the process. Each loop
//! iteration draws one frame, then waits on whichever comes first: a
//! terminal event, the outstanding gateway reply, or an animation tick
//! while a reply is pending.

mod markup;
mod view;

use crate::controller::{ReasoningGateway, SessionController};
use crate::dataset::{napic_2024, top_deficit};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::io;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use view::ShellView;

/// Canned questions bound to F1-F4
pub const QUICK_PROMPTS: [&str; 4] = [
    "Daerah mana paling defisit rumah pada 2024?",
    "Bandingkan Petaling dan Hulu Langat.",
    "Adakah Johor Bahru masih kekurangan rumah?",
    "Cadangkan daerah di Selangor yang penawarannya paling mencukupi.",
];

const DEFICIT_CARDS: usize = 4;
const TICK: Duration = Duration::from_millis(250);

/// What a key press asks the shell to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Insert(char),
    Backspace,
    Submit,
    QuickPrompt(usize),
    Reset,
    Quit,
}

fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('r') if ctrl => Some(Action::Reset),
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            Some(Action::Insert(c))
        }
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::F(n @ 1..=4) => Some(Action::QuickPrompt(usize::from(n - 1))),
        KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Apply one action. Returns `false` when the shell should exit.
fn perform<G>(controller: &mut SessionController<G>, action: Action) -> bool
where
    G: ReasoningGateway + 'static,
{
    match action {
        Action::Insert(c) => {
            let mut draft = controller.pending_input().to_string();
            draft.push(c);
            controller.update_draft(draft);
        }
        Action::Backspace => {
            let mut draft = controller.pending_input().to_string();
            if draft.pop().is_some() {
                controller.update_draft(draft);
            }
        }
        // Rejected submits (blank or busy) are already logged by the controller
        Action::Submit => {
            let _ = controller.submit_draft();
        }
        Action::QuickPrompt(index) => {
            if let Some(prompt) = QUICK_PROMPTS.get(index) {
                let _ = controller.submit(*prompt);
            }
        }
        Action::Reset => controller.reset_session(),
        Action::Quit => return false,
    }
    true
}

/// Run the interactive shell until the user quits.
///
/// Restores the terminal on every exit path, including I/O errors.
pub async fn run<G>(controller: &mut SessionController<G>) -> io::Result<()>
where
    G: ReasoningGateway + 'static,
{
    let mut terminal = ratatui::try_init()?;
    tracing::info!("Shell started");
    let result = event_loop(&mut terminal, controller).await;
    ratatui::restore();
    tracing::info!(ok = result.is_ok(), "Shell exited");
    result
}

async fn event_loop<G>(
    terminal: &mut DefaultTerminal,
    controller: &mut SessionController<G>,
) -> io::Result<()>
where
    G: ReasoningGateway + 'static,
{
    let records = napic_2024();
    let deficits = top_deficit(records, DEFICIT_CARDS);

    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut tick: usize = 0;

    loop {
        terminal.draw(|frame| {
            view::draw(
                frame,
                &ShellView {
                    log: controller.log(),
                    draft: controller.pending_input(),
                    busy: controller.is_busy(),
                    deficits: &deficits,
                    chart: records,
                    tick,
                },
            );
        })?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => {
                    if let Some(action) = action_for(key) {
                        if !perform(controller, action) {
                            return Ok(());
                        }
                    }
                }
                // Resize and focus changes only need a redraw
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => return Ok(()),
            },
            Some(reply) = controller.next_reply() => controller.apply_reply(reply),
            _ = ticker.tick(), if controller.is_busy() => tick = tick.wrapping_add(1),
        }
    }
}
