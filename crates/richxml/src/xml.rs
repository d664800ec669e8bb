//! Generic, order-preserving XML parsing

pub mod cursor;
pub mod model;
pub mod parser;

pub use cursor::Cursor;
pub use model::{Content, Element};
pub use parser::Parser;
