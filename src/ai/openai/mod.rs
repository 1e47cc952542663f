pub mod chat;
pub mod client;
pub mod responses;
pub mod types;

pub use chat::{ChatCompletionsReader, ChatProfile};
pub use responses::OpenAiResponsesReader;
