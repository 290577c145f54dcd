pub mod bigrams;
pub mod entities;
pub mod frequency;

pub use bigrams::{Bigram, BigramCounter};
pub use entities::EntityCounter;
pub use frequency::FrequencyTable;
