//! The event-processing thread.
//!
//! Platform notifications and commands arrive as messages on one channel and
//! are handled in order by a single loop that owns the `EventRouter`. While a
//! refresh is pending the loop waits with a timeout ending at the refresh
//! deadline, so the debounced refresh runs on the same thread as everything
//! else.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Instant;

use tracing::{debug, info};

use crate::{
    command::{
        command_model::Command,
        handler::{CommandReply, handle_command},
    },
    error::EngineError,
    platform::{gesture::GestureSink, node_tree::NodeTree, overlay::OverlaySurface},
    router::{event_router::EventRouter, router_model::UiEvent},
};

pub enum ServiceMessage {
    Ui(UiEvent),
    Command {
        command: Command,
        reply: Sender<CommandReply>,
    },
    Interrupt,
    Shutdown,
}

/// Cloneable entry point handed to whoever needs to reach the engine: the
/// platform event pump, the command channel, the host lifecycle.
#[derive(Clone)]
pub struct ServiceHandle {
    tx: Sender<ServiceMessage>,
}

impl ServiceHandle {
    pub fn notify(&self, event: UiEvent) -> Result<(), EngineError> {
        self.tx
            .send(ServiceMessage::Ui(event))
            .map_err(|_| EngineError::ServiceStopped)
    }

    /// Send a command and wait for the event thread to accept it. Gesture
    /// commands come back as `CommandReply::Pending`.
    pub fn invoke(&self, command: Command) -> Result<CommandReply, EngineError> {
        let (reply, rx) = mpsc::channel();
        self.tx
            .send(ServiceMessage::Command { command, reply })
            .map_err(|_| EngineError::ServiceStopped)?;
        rx.recv().map_err(|_| EngineError::ServiceStopped)
    }

    pub fn interrupt(&self) -> Result<(), EngineError> {
        self.tx
            .send(ServiceMessage::Interrupt)
            .map_err(|_| EngineError::ServiceStopped)
    }

    pub fn shutdown(&self) -> Result<(), EngineError> {
        self.tx
            .send(ServiceMessage::Shutdown)
            .map_err(|_| EngineError::ServiceStopped)
    }
}

pub struct AutomationService<P, S: OverlaySurface> {
    router: EventRouter<P, S>,
    rx: Receiver<ServiceMessage>,
}

impl<P, S> AutomationService<P, S>
where
    P: NodeTree + GestureSink,
    S: OverlaySurface,
{
    /// Build the service and the handle used to talk to it.
    pub fn new(router: EventRouter<P, S>) -> (Self, ServiceHandle) {
        let (tx, rx) = mpsc::channel();
        (Self { router, rx }, ServiceHandle { tx })
    }

    /// Process messages until shutdown or until every handle is dropped.
    /// The router is torn down and handed back.
    pub fn run(mut self) -> EventRouter<P, S> {
        info!("automation service started");

        loop {
            let message = match self.router.next_deadline() {
                Some(deadline) => {
                    let now = Instant::now();
                    if deadline <= now {
                        self.router.tick(now);
                        continue;
                    }
                    match self.rx.recv_timeout(deadline - now) {
                        Ok(message) => message,
                        Err(RecvTimeoutError::Timeout) => {
                            self.router.tick(Instant::now());
                            continue;
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match self.rx.recv() {
                    Ok(message) => message,
                    Err(_) => break,
                },
            };

            match message {
                ServiceMessage::Ui(event) => {
                    debug!(kind = ?event.kind, "ui event");
                    self.router.on_event(&event, Instant::now());
                }
                ServiceMessage::Command { command, reply } => {
                    let result = handle_command(&mut self.router, &command);
                    // The caller may have given up waiting.
                    let _ = reply.send(result);
                }
                ServiceMessage::Interrupt => self.router.on_interrupt(),
                ServiceMessage::Shutdown => break,
            }
        }

        self.router.shutdown();
        self.router
    }
}
