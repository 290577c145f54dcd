pub mod stage0_clean;
pub mod stage1_corpus;
pub mod stage2_annotate;
pub mod stage3_speeches;
pub mod stage4_statistics;
pub mod stage5_topics;
pub mod stage6_wordclouds;

pub use stage0_clean::*;
pub use stage1_corpus::*;
pub use stage2_annotate::*;
pub use stage3_speeches::*;
pub use stage4_statistics::*;
pub use stage5_topics::*;
pub use stage6_wordclouds::*;
