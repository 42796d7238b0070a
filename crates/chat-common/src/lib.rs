pub mod catalog;
pub mod error;
pub mod knowledge;
pub mod markdown;
pub mod openai;
