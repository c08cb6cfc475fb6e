pub mod prelude;

pub mod comment;
pub mod enums;
pub mod history_item;
pub mod project;
pub mod score_entry;
pub mod user;
pub mod user_notification;
