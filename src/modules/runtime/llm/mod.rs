//! Language-model and embedding backends

mod openai;
mod traits;

pub use openai::OpenAiClient;
pub use traits::{Embedder, LanguageModel};
