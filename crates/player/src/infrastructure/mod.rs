pub mod fragment;
pub mod platform;
pub mod reply_client;
