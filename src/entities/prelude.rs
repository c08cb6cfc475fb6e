pub use super::comment::Entity as Comment;
pub use super::history_item::Entity as HistoryItem;
pub use super::project::Entity as Project;
pub use super::score_entry::Entity as ScoreEntry;
pub use super::user::Entity as User;
pub use super::user_notification::Entity as UserNotification;
