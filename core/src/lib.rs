mod ast;
mod commands;
mod history;
mod interner;
pub mod markup;
mod media;
mod selection;
mod style;
mod surface;
pub mod table;

pub use ast::*;
pub use commands::*;
pub use history::*;
pub use interner::*;
pub use media::*;
pub use selection::*;
pub use style::*;
pub use surface::*;
