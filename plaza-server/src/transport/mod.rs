mod outbox;
mod session;

pub use outbox::*;
pub use session::*;
