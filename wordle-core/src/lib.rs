pub mod evaluator;
pub mod session;
pub mod word_validation;
pub mod result_codec;
pub mod policy;
pub mod daily_word;

// Re-export main components
pub use evaluator::*;
pub use session::*;
pub use word_validation::*;
pub use result_codec::*;
pub use policy::*;
pub use daily_word::*;
