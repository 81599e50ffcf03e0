mod presence_registry;

use axum::extract::ws::Message;
use tokio::sync::mpsc;

/// Outbound queue pair as the upgrade handlers create it.
pub(crate) fn frame_queue() -> (mpsc::Sender<Message>, mpsc::Receiver<Message>) {
    mpsc::channel(16)
}
