use tokio::{sync::watch, task::JoinHandle};
use tracing::error;

pub type ShutdownSender = watch::Sender<bool>;
pub type ShutdownReceiver = watch::Receiver<bool>;

pub fn channel() -> (ShutdownSender, ShutdownReceiver) {
    watch::channel(false)
}

pub fn trigger(sender: &ShutdownSender) {
    let _ = sender.send(true);
}

pub async fn wait(mut receiver: ShutdownReceiver) {
    if *receiver.borrow() {
        return;
    }

    while receiver.changed().await.is_ok() {
        if *receiver.borrow() {
            break;
        }
    }
}

/// Triggers `sender` once ctrl-c is received. Abort the handle to stop listening.
pub fn on_ctrl_c(sender: ShutdownSender, service_name: &'static str) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, service = service_name, "cannot listen for ctrl_c");
        }
        trigger(&sender);
    })
}
