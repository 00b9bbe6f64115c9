//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::reducer::FormState;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    state: &mut FormState,
) {
    let cmd_name = cmd.name();
    let seq = cmd.seq();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, %seq, "queued ui->backend command"),
        Err(TrySendError::Full(cmd)) => {
            state.abandon(&cmd);
            state.set_status("UI command queue is full; please retry");
        }
        Err(TrySendError::Disconnected(cmd)) => {
            state.abandon(&cmd);
            state.set_status(
                "Backend worker disconnected (possible startup/runtime failure); restart the form",
            );
        }
    }
}
