//! AI chat: message model, canned reply routing, conversation state and the
//! session sidebar

pub mod conversation;
pub mod message;
pub mod router;
pub mod service;
pub mod sessions;

pub use conversation::{ChatEntry, Conversation, MessageState};
pub use message::{Anomaly, Message, Role, VideoRef};
pub use router::{CannedReply, ResponseRouter, Route, WELCOME_MESSAGE};
pub use service::{CannedChatService, ChatService};
pub use sessions::{SESSIONS_KEY, SessionList};
