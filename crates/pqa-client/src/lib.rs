//! RPC client bridging the desktop UI to the PaperQA analysis server.

pub mod client;
pub mod method;
pub mod replies;

pub use client::RpcClient;
pub use replies::{Ack, AnswerContext, AskReply, PresetNames, StatusReply};
