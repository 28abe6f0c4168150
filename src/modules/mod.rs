pub mod notifications;
pub mod uploads;
pub mod videos;
