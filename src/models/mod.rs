pub mod document;
pub mod record;
pub mod speech;

pub use document::*;
pub use record::*;
pub use speech::*;
