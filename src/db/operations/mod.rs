pub mod folders;
pub mod word_sets;
pub mod words;

pub use folders::*;
pub use word_sets::*;
pub use words::*;
