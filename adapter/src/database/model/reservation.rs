use std::str::FromStr;

use kernel::model::{
    id::ReservationId,
    reservation::{NotificationChannel, Reservation, ReservationStatus},
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};

// reservations テーブルの 1 行。status と notification_channel は
// TEXT 列のため、ドメイン型への変換時に検証する
#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub customer_name: String,
    pub phone_number: String,
    pub email: String,
    pub reservation_date_time: DateTime<Utc>,
    pub number_of_guests: i32,
    pub status: String,
    pub notification_channel: String,
    pub reminder_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let ReservationRow {
            reservation_id,
            customer_name,
            phone_number,
            email,
            reservation_date_time,
            number_of_guests,
            status,
            notification_channel,
            reminder_sent,
            created_at,
            updated_at,
        } = value;

        let status = ReservationStatus::from_str(&status).map_err(|_| {
            AppError::ConversionEntityError(format!("不正な予約ステータスです: {status}"))
        })?;
        let notification_channel =
            NotificationChannel::from_str(&notification_channel).map_err(|_| {
                AppError::ConversionEntityError(format!(
                    "不正な通知チャネルです: {notification_channel}"
                ))
            })?;

        Ok(Reservation {
            id: reservation_id,
            customer_name,
            phone_number,
            email,
            reservation_date_time,
            number_of_guests,
            status,
            notification_channel,
            reminder_sent,
            created_at,
            updated_at,
        })
    }
}
