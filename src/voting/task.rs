use log::{debug, info};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;

use super::{VotingController, VotingSnapshot};
use crate::api::SessionGateway;
use crate::models::user::LoggedInUser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(LoggedInUser),
    Choose { name: String, is_positive: bool },
    Refresh,
}

/// Owning handle for a running controller. Shutting it down, or dropping it,
/// stops the task together with any in-flight request and pending re-poll.
pub struct ControllerHandle {
    commands: mpsc::UnboundedSender<Command>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ControllerHandle {
    /// Returns `false` once the task has stopped.
    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            info!("Shutting down voting controller");
            let _ = shutdown_tx.send(());
        }
    }
}

impl Drop for ControllerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Moves `controller` onto its own task. Must be called within a tokio
/// runtime.
pub fn spawn_controller<G>(
    controller: VotingController<G>,
) -> (ControllerHandle, watch::Receiver<VotingSnapshot>)
where
    G: SessionGateway + 'static,
{
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

    tokio::spawn(run(controller, command_rx, shutdown_rx, snapshot_tx));

    (
        ControllerHandle {
            commands: command_tx,
            shutdown_tx: Some(shutdown_tx),
        },
        snapshot_rx,
    )
}

impl<G: SessionGateway> VotingController<G> {
    pub async fn apply(&mut self, command: Command) {
        match command {
            Command::Login(user) => self.login(user).await,
            Command::Choose { name, is_positive } => self.make_choice(&name, is_positive).await,
            Command::Refresh => self.refresh().await,
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

enum Step {
    Command(Command),
    Poll,
    Stop,
}

async fn run<G: SessionGateway>(
    mut controller: VotingController<G>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    mut shutdown_rx: oneshot::Receiver<()>,
    snapshots: watch::Sender<VotingSnapshot>,
) {
    loop {
        let step = tokio::select! {
            _ = &mut shutdown_rx => Step::Stop,
            command = commands.recv() => command.map_or(Step::Stop, Step::Command),
            _ = wait_until(controller.poll_deadline()) => Step::Poll,
        };

        if !matches!(step, Step::Stop) {
            // Voting stays disabled until the step below is applied.
            let mut busy = controller.snapshot();
            busy.loading = true;
            snapshots.send_replace(busy);
        }

        // One step at a time; shutdown abandons whatever is in flight.
        let stopped = match step {
            Step::Stop => true,
            Step::Command(command) => {
                debug!("Applying {:?}", command);
                tokio::select! {
                    _ = &mut shutdown_rx => true,
                    _ = controller.apply(command) => false,
                }
            }
            Step::Poll => {
                tokio::select! {
                    _ = &mut shutdown_rx => true,
                    _ = controller.on_poll_timer() => false,
                }
            }
        };
        if stopped {
            break;
        }

        snapshots.send_replace(controller.snapshot());
    }
    info!("Voting controller for {} stopped", controller.session_id());
}
