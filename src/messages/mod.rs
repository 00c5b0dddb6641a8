pub mod attachment;
pub mod storage;
pub mod types;

pub use attachment::ImageAttachment;
pub use storage::ConversationLog;
pub use types::{Message, Role};
