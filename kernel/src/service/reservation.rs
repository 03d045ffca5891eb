use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::error::{AppError, AppResult};

use crate::{
    event::{
        EventBus, ReservationCancelled, ReservationCreated, ReservationEvent, ReservationUpdated,
    },
    model::{
        id::ReservationId,
        reservation::{
            event::{CreateReservation, UpdateReservation},
            Reservation,
        },
    },
    repository::reservation::ReservationRepository,
};

// 予約のライフサイクルを司るサービス。各更新操作はストアへの書き込み 1 回と
// イベント発行 1 回をこの順で行い、書き込みが確定するまでイベントは発行しない
pub struct ReservationService {
    repository: Arc<dyn ReservationRepository>,
    event_bus: Arc<EventBus>,
}

impl ReservationService {
    pub fn new(repository: Arc<dyn ReservationRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            repository,
            event_bus,
        }
    }

    pub async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        tracing::info!(email = %event.email, "予約を作成します");

        validate_reservation_date_time(event.reservation_date_time)?;

        let reservation = self.repository.create(event).await?;
        tracing::info!(reservation_id = %reservation.id, "予約を作成しました");

        self.event_bus
            .publish(&ReservationEvent::Created(ReservationCreated::new(
                reservation.id,
                reservation.customer_name.clone(),
                reservation.email.clone(),
                reservation.phone_number.clone(),
                reservation.reservation_date_time,
                reservation.number_of_guests,
                reservation.notification_channel,
            )))
            .await;

        Ok(reservation)
    }

    pub async fn cancel(&self, reservation_id: ReservationId) -> AppResult<()> {
        tracing::info!(%reservation_id, "予約をキャンセルします");

        let reservation = self.repository.cancel(reservation_id).await?;
        tracing::info!(%reservation_id, "予約をキャンセルしました");

        self.event_bus
            .publish(&ReservationEvent::Cancelled(ReservationCancelled::new(
                reservation.id,
                reservation.customer_name.clone(),
                reservation.email.clone(),
                reservation.phone_number.clone(),
                reservation.notification_channel,
            )))
            .await;

        Ok(())
    }

    pub async fn update(&self, event: UpdateReservation) -> AppResult<Reservation> {
        tracing::info!(reservation_id = %event.reservation_id, "予約を変更します");

        // 存在確認とキャンセル済みチェック。同じ検査はストア側の
        // トランザクション内でも行われる
        let current = self.get_by_id(event.reservation_id).await?;
        if current.is_cancelled() {
            return Err(AppError::InvalidReservation(
                "Cannot update a cancelled reservation".into(),
            ));
        }
        validate_reservation_date_time(event.reservation_date_time)?;

        let reservation = self.repository.update(event).await?;
        tracing::info!(reservation_id = %reservation.id, "予約を変更しました");

        self.event_bus
            .publish(&ReservationEvent::Updated(ReservationUpdated::new(
                reservation.id,
                reservation.customer_name.clone(),
                reservation.email.clone(),
                reservation.phone_number.clone(),
                reservation.reservation_date_time,
                reservation.number_of_guests,
                reservation.notification_channel,
            )))
            .await;

        Ok(reservation)
    }

    pub async fn get_by_id(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        self.repository
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!(
                    "予約（{reservation_id}）が見つかりませんでした。"
                ))
            })
    }

    pub async fn list_upcoming(&self, email: &str) -> AppResult<Vec<Reservation>> {
        self.repository
            .find_upcoming_by_email(email, Utc::now())
            .await
    }
}

// 予約日時が操作時点の時計で厳密に未来であることを検証する
fn validate_reservation_date_time(date_time: DateTime<Utc>) -> AppResult<()> {
    if date_time <= Utc::now() {
        return Err(AppError::InvalidReservation(
            "Reservation date and time must be in the future".into(),
        ));
    }
    Ok(())
}
