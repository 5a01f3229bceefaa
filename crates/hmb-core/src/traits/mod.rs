//! Seams between the session logic and its collaborators.

mod observer;
mod transport;

pub use observer::{
    AttemptFailure, CloseReason, FailureSeverity, NoopObserver, Operation, SessionObserver,
};
pub use transport::{HttpResponse, Transport};
