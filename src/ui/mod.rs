pub mod console;
pub mod render;

pub use console::{Console, Selection};
