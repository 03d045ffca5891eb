use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::ReservationId,
    reservation::{
        event::{CreateReservation, UpdateReservation},
        NotificationChannel, Reservation, ReservationStatus,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(length(min = 2, max = 100))]
    pub customer_name: String,
    #[garde(pattern(r"^[+]?[0-9]{10,15}$"))]
    pub phone_number: String,
    #[garde(email)]
    pub email: String,
    // 未来日時であることの検証はサービス側で操作時点の時計に対して行う
    #[garde(skip)]
    pub reservation_date_time: DateTime<Utc>,
    #[garde(range(min = 1, max = 50))]
    pub number_of_guests: i32,
    #[garde(skip)]
    pub notification_channel: NotificationChannel,
}

impl From<CreateReservationRequest> for CreateReservation {
    fn from(value: CreateReservationRequest) -> Self {
        let CreateReservationRequest {
            customer_name,
            phone_number,
            email,
            reservation_date_time,
            number_of_guests,
            notification_channel,
        } = value;
        CreateReservation::new(
            customer_name,
            phone_number,
            email,
            reservation_date_time,
            number_of_guests,
            notification_channel,
        )
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    #[garde(skip)]
    pub reservation_date_time: DateTime<Utc>,
    #[garde(range(min = 1, max = 50))]
    pub number_of_guests: i32,
}

#[derive(new)]
pub struct UpdateReservationRequestWithId(ReservationId, UpdateReservationRequest);

impl From<UpdateReservationRequestWithId> for UpdateReservation {
    fn from(value: UpdateReservationRequestWithId) -> Self {
        let UpdateReservationRequestWithId(reservation_id, request) = value;
        UpdateReservation::new(
            reservation_id,
            request.reservation_date_time,
            request.number_of_guests,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct UpcomingReservationsQuery {
    pub email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub customer_name: String,
    pub phone_number: String,
    pub email: String,
    pub reservation_date_time: DateTime<Utc>,
    pub number_of_guests: i32,
    pub status: ReservationStatus,
    pub notification_channel: NotificationChannel,
    pub reminder_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            id,
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
        Self {
            reservation_id: id,
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
        }
    }
}
