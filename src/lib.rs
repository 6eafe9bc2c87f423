pub use crate::errors::{ErrorKind, MuplError, SourceContext};

pub mod ast;
pub mod cli;
pub mod encoding;
pub mod errors;
pub mod pipeline;
pub mod syntax;
