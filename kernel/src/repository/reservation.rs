use crate::model::{
    id::ReservationId,
    reservation::{
        event::{CreateReservation, ReminderWindow, UpdateReservation},
        Reservation,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::AppResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // 予約を新規作成する。ステータスは CONFIRMED、reminder_sent は false で永続化される
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation>;
    // 予約日時と人数を更新する。キャンセル済みの予約は InvalidReservation
    async fn update(&self, event: UpdateReservation) -> AppResult<Reservation>;
    // 予約をキャンセルする。二重キャンセルは InvalidReservation
    async fn cancel(&self, reservation_id: ReservationId) -> AppResult<Reservation>;
    // reservation_id から予約を取得する
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>>;
    // メールアドレスに紐づく、指定時刻より後の CONFIRMED な予約一覧を取得する
    async fn find_upcoming_by_email(
        &self,
        email: &str,
        after: DateTime<Utc>,
    ) -> AppResult<Vec<Reservation>>;
    // リマインド対象（CONFIRMED かつ未送信かつウィンドウ内）を取得する
    async fn find_reminder_targets(&self, window: ReminderWindow) -> AppResult<Vec<Reservation>>;
    // reminder_sent を true にする。CONFIRMED かつ未送信の行だけが更新され、
    // 実際に更新されたかどうかを返す
    async fn mark_reminder_sent(&self, reservation_id: ReservationId) -> AppResult<bool>;
}
