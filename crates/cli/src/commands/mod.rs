//! Command handlers for the docchat CLI.

pub mod ask;
pub mod check;

pub use ask::AskCommand;
pub use check::CheckCommand;
