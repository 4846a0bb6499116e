mod basic;
mod builtins;
mod descriptors;
mod executable;
mod logic;
mod pipeline;
mod redirect;
mod runnable;
mod status;
mod terminal;

pub use builtins::Builtins;
#[cfg(test)]
pub use descriptors::lock_descriptors;
pub use runnable::{Context, Runnable};
pub use status::StatusCode;
