pub mod id;
pub mod notification;
pub mod reservation;
