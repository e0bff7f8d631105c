use tokio::sync::broadcast;

pub(crate) type ShutdownSender = broadcast::Sender<()>;
pub(crate) type ShutdownReceiver = broadcast::Receiver<()>;
