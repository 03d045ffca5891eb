use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;
use kernel::model::{
    id::ReservationId,
    reservation::{
        event::{CreateReservation, ReminderWindow, UpdateReservation},
        Reservation, ReservationStatus,
    },
};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::reservation::ReservationRow, ConnectionPool};

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

impl ReservationRepositoryImpl {
    // トランザクション分離レベルを SERIALIZABLE に設定する
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    // トランザクション内で予約 1 件を取得する。存在しなければ EntityNotFound
    async fn find_for_update(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        reservation_id: ReservationId,
    ) -> AppResult<Reservation> {
        let row: Option<ReservationRow> = sqlx::query_as(
            r#"
            SELECT reservation_id, customer_name, phone_number, email,
                   reservation_date_time, number_of_guests, status,
                   notification_channel, reminder_sent, created_at, updated_at
            FROM reservations
            WHERE reservation_id = $1
            "#,
        )
        .bind(reservation_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        match row {
            None => Err(AppError::EntityNotFound(format!(
                "予約（{reservation_id}）が見つかりませんでした。"
            ))),
            Some(row) => row.try_into(),
        }
    }
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    // 予約操作を行う。reservations テーブルにレコードを追加する
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        let reservation_id = ReservationId::new();
        let row: ReservationRow = sqlx::query_as(
            r#"
            INSERT INTO reservations
            (reservation_id, customer_name, phone_number, email,
             reservation_date_time, number_of_guests, status,
             notification_channel, reminder_sent, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, NOW(), NOW())
            RETURNING reservation_id, customer_name, phone_number, email,
                      reservation_date_time, number_of_guests, status,
                      notification_channel, reminder_sent, created_at, updated_at
            "#,
        )
        .bind(reservation_id)
        .bind(&event.customer_name)
        .bind(&event.phone_number)
        .bind(&event.email)
        .bind(event.reservation_date_time)
        .bind(event.number_of_guests)
        .bind(ReservationStatus::Confirmed.as_ref())
        .bind(event.notification_channel.as_ref())
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.try_into()
    }

    // 予約日時と人数の更新を行う
    async fn update(&self, event: UpdateReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        // 事前のチェックとして、以下を調べる。
        // - 指定の予約 ID をもつ予約が存在するか
        // - 存在した場合、キャンセル済みではないか
        let mut reservation = self.find_for_update(&mut tx, event.reservation_id).await?;

        if reservation.is_cancelled() {
            return Err(AppError::InvalidReservation(
                "Cannot update a cancelled reservation".into(),
            ));
        }

        let res = sqlx::query(
            r#"
            UPDATE reservations
            SET reservation_date_time = $2,
                number_of_guests = $3,
                updated_at = NOW()
            WHERE reservation_id = $1
            "#,
        )
        .bind(event.reservation_id)
        .bind(event.reservation_date_time)
        .bind(event.number_of_guests)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        reservation.reservation_date_time = event.reservation_date_time;
        reservation.number_of_guests = event.number_of_guests;
        Ok(reservation)
    }

    // 予約のキャンセル操作を行う。二重キャンセルは拒否する
    async fn cancel(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let mut reservation = self.find_for_update(&mut tx, reservation_id).await?;

        if reservation.is_cancelled() {
            return Err(AppError::InvalidReservation(
                "Reservation is already cancelled".into(),
            ));
        }

        let res = sqlx::query(
            r#"
            UPDATE reservations
            SET status = $2, updated_at = NOW()
            WHERE reservation_id = $1
            "#,
        )
        .bind(reservation_id)
        .bind(ReservationStatus::Cancelled.as_ref())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        reservation.status = ReservationStatus::Cancelled;
        Ok(reservation)
    }

    // reservation_id から Reservation 型のデータを渡す
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        let row: Option<ReservationRow> = sqlx::query_as(
            r#"
            SELECT reservation_id, customer_name, phone_number, email,
                   reservation_date_time, number_of_guests, status,
                   notification_channel, reminder_sent, created_at, updated_at
            FROM reservations
            WHERE reservation_id = $1
            "#,
        )
        .bind(reservation_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Reservation::try_from).transpose()
    }

    // メールアドレスに紐づく、これからの CONFIRMED な予約一覧を取得する
    async fn find_upcoming_by_email(
        &self,
        email: &str,
        after: DateTime<Utc>,
    ) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(
            r#"
            SELECT reservation_id, customer_name, phone_number, email,
                   reservation_date_time, number_of_guests, status,
                   notification_channel, reminder_sent, created_at, updated_at
            FROM reservations
            WHERE email = $1
              AND status = $2
              AND reservation_date_time > $3
            ORDER BY reservation_date_time
            "#,
        )
        .bind(email)
        .bind(ReservationStatus::Confirmed.as_ref())
        .bind(after)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Reservation::try_from).collect()
    }

    // リマインド対象（CONFIRMED・未送信・ウィンドウ内）を取得する
    async fn find_reminder_targets(&self, window: ReminderWindow) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(
            r#"
            SELECT reservation_id, customer_name, phone_number, email,
                   reservation_date_time, number_of_guests, status,
                   notification_channel, reminder_sent, created_at, updated_at
            FROM reservations
            WHERE status = $1
              AND reminder_sent = FALSE
              AND reservation_date_time >= $2
              AND reservation_date_time < $3
            ORDER BY reservation_date_time
            "#,
        )
        .bind(ReservationStatus::Confirmed.as_ref())
        .bind(window.from)
        .bind(window.until)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Reservation::try_from).collect()
    }

    // reminder_sent を更新する。CONFIRMED かつ未送信の行だけが対象になるため、
    // キャンセル済みの予約に後からフラグが立つことはない
    async fn mark_reminder_sent(&self, reservation_id: ReservationId) -> AppResult<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reservations
            SET reminder_sent = TRUE, updated_at = NOW()
            WHERE reservation_id = $1
              AND status = $2
              AND reminder_sent = FALSE
            "#,
        )
        .bind(reservation_id)
        .bind(ReservationStatus::Confirmed.as_ref())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(res.rows_affected() > 0)
    }
}
