pub mod listener;
pub mod notification;
pub mod reminder;
pub mod reservation;
pub mod template;
