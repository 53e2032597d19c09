pub mod admin_helpers;
pub mod chat_helpers;
pub mod public_helpers;
pub mod sanitization_helpers;
