use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum EventSyncError {
    #[error("broadcast signature verification failed")]
    AuthError,
    #[error("local queue exceeded its high-water mark")]
    QueueOverflow,
}
