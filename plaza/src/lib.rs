pub use plaza_core::model::{Participant, ParticipantId, Position};

pub mod model {
    pub use plaza_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use plaza_server::*;
}
