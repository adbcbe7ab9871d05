pub mod runner;

pub use runner::{argv, CommandError, CommandOutcome, CommandRunner, SystemCommandRunner};
