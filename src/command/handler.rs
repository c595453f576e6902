use std::time::Duration;

use tracing::info;

use crate::{
    command::command_model::{Command, CommandResult},
    gesture::{dispatcher::PendingOutcome, gesture_builder::ScrollDirection},
    platform::{gesture::GestureSink, node_tree::NodeTree, overlay::OverlaySurface},
    router::event_router::EventRouter,
};

/// What a command hands back to its caller. Gesture and text commands resolve
/// later; the others are answered immediately.
#[derive(Debug)]
pub enum CommandReply {
    Pending(PendingOutcome),
    Done(CommandResult),
}

impl CommandReply {
    /// Block until the final result. Call off the event thread.
    pub fn resolve(self) -> CommandResult {
        match self {
            CommandReply::Pending(pending) => CommandResult::Outcome(pending.wait()),
            CommandReply::Done(result) => result,
        }
    }

    pub fn resolve_timeout(self, timeout: Duration) -> Option<CommandResult> {
        match self {
            CommandReply::Pending(mut pending) => {
                pending.wait_timeout(timeout).map(CommandResult::Outcome)
            }
            CommandReply::Done(result) => Some(result),
        }
    }

    /// Result if already known, without blocking.
    pub fn poll(&mut self) -> Option<CommandResult> {
        match self {
            CommandReply::Pending(pending) => pending.poll().map(CommandResult::Outcome),
            CommandReply::Done(result) => Some(*result),
        }
    }
}

pub fn handle_command<P, S>(router: &mut EventRouter<P, S>, command: &Command) -> CommandReply
where
    P: NodeTree + GestureSink,
    S: OverlaySurface,
{
    info!(method = command.method(), "command");

    match command {
        Command::PerformVirtualTouch { x, y } => {
            CommandReply::Pending(router.perform_touch(*x, *y))
        }
        Command::PerformScroll {
            direction,
            scroll_amount,
        } => {
            let direction = ScrollDirection::parse(direction);
            CommandReply::Pending(router.perform_scroll(direction, *scroll_amount))
        }
        Command::PerformTextInput { text } => {
            CommandReply::Pending(router.perform_text_input(text))
        }
        Command::CheckAccessibilityServiceStatus => {
            CommandReply::Done(CommandResult::Status(router.is_active()))
        }
        Command::SetHintEnabled { enabled } => {
            router.set_hint_enabled(*enabled);
            CommandReply::Done(CommandResult::Ack)
        }
    }
}
