// DraftScope Core Services

pub mod config_store;
pub mod detection;
pub mod text_processor;

pub use config_store::*;
pub use text_processor::*;

// Re-export detection entry points
pub use detection::{
    analyze,
    classify_sentences,
    detect,
    detect_batch,
    neutral_result,
    DetectError,
    DetectResult,
};
