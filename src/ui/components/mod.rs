//! Reusable interface components.

pub mod input_bar;
pub mod message_list;
pub mod patient_form;
pub mod start_screen;

pub use input_bar::InputBar;
pub use message_list::MessageList;
pub use patient_form::PatientFormView;
pub use start_screen::StartScreen;
