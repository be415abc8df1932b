mod registry;
mod registry_command;
mod registry_handle;

pub use registry::*;
pub use registry_command::*;
pub use registry_handle::*;
