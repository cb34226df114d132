pub mod calls;
pub mod chats;
pub mod events;
pub mod i18n;
pub mod models;
pub mod notification;
pub mod search;

// User preferences backed by a JSON settings file
pub mod config;

pub mod fixture;
