pub mod chat;
pub mod inquiry;
pub mod summary;
pub mod therapist;

pub use chat::{ChatMessage, Role};
pub use inquiry::{Inquiry, InquiryStatus, NewInquiry};
pub use summary::IntakeSummary;
pub use therapist::Therapist;
