//! Word-cloud images drawn with a built-in bitmap font.

pub mod font;
pub mod wordcloud;

pub use wordcloud::{save_png, PlacedWord, WordCloud, WordCloudConfig};
