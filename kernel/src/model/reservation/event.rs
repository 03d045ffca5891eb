use crate::model::{id::ReservationId, reservation::NotificationChannel};
use chrono::{DateTime, Utc};
use derive_new::new;

#[derive(new, Debug)]
pub struct CreateReservation {
    pub customer_name: String,
    pub phone_number: String,
    pub email: String,
    pub reservation_date_time: DateTime<Utc>,
    pub number_of_guests: i32,
    pub notification_channel: NotificationChannel,
}

#[derive(new, Debug)]
pub struct UpdateReservation {
    pub reservation_id: ReservationId,
    pub reservation_date_time: DateTime<Utc>,
    pub number_of_guests: i32,
}

// リマインド対象を検索する半開区間 [from, until)
#[derive(new, Debug, Clone, Copy)]
pub struct ReminderWindow {
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
}
