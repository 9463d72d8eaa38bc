pub mod repl;
pub mod table;

pub use repl::{LineSource, LoopExit, LoopHooks, run, split_command};
pub use table::{CommandTable, Flow, Handler};
