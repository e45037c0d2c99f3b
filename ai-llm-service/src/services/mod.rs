pub mod chat_completion_service;
pub mod stream_decoder;
