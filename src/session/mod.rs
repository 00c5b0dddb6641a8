pub mod data;
pub mod patient;
#[allow(clippy::module_inception)]
pub mod session;

pub use data::DataCategory;
pub use patient::PatientInfo;
pub use session::ConversationSession;
