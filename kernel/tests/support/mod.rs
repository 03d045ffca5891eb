#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kernel::model::id::ReservationId;
use kernel::model::reservation::event::{CreateReservation, ReminderWindow, UpdateReservation};
use kernel::model::reservation::{NotificationChannel, Reservation, ReservationStatus};
use kernel::notifier::{EmailSender, SmsSender};
use kernel::repository::reservation::ReservationRepository;
use kernel::service::notification::NotificationDispatcher;
use kernel::service::template::TemplateRenderer;
use shared::config::NotificationTemplates;
use shared::error::{AppError, AppResult};

// テスト用のインメモリ実装。Postgres 実装と同じ状態遷移規則を持つ
#[derive(Default)]
pub struct InMemoryReservationRepository {
    rows: Mutex<HashMap<ReservationId, Reservation>>,
}

impl InMemoryReservationRepository {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        let now = Utc::now();
        let reservation = Reservation {
            id: ReservationId::new(),
            customer_name: event.customer_name,
            phone_number: event.phone_number,
            email: event.email,
            reservation_date_time: event.reservation_date_time,
            number_of_guests: event.number_of_guests,
            status: ReservationStatus::Confirmed,
            notification_channel: event.notification_channel,
            reminder_sent: false,
            created_at: now,
            updated_at: now,
        };
        self.rows
            .lock()
            .unwrap()
            .insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn update(&self, event: UpdateReservation) -> AppResult<Reservation> {
        let mut rows = self.rows.lock().unwrap();
        let reservation = rows.get_mut(&event.reservation_id).ok_or_else(|| {
            AppError::EntityNotFound(format!(
                "予約（{}）が見つかりませんでした。",
                event.reservation_id
            ))
        })?;
        if reservation.is_cancelled() {
            return Err(AppError::InvalidReservation(
                "Cannot update a cancelled reservation".into(),
            ));
        }
        reservation.reservation_date_time = event.reservation_date_time;
        reservation.number_of_guests = event.number_of_guests;
        reservation.updated_at = Utc::now();
        Ok(reservation.clone())
    }

    async fn cancel(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        let mut rows = self.rows.lock().unwrap();
        let reservation = rows.get_mut(&reservation_id).ok_or_else(|| {
            AppError::EntityNotFound(format!("予約（{reservation_id}）が見つかりませんでした。"))
        })?;
        if reservation.is_cancelled() {
            return Err(AppError::InvalidReservation(
                "Reservation is already cancelled".into(),
            ));
        }
        reservation.status = ReservationStatus::Cancelled;
        reservation.updated_at = Utc::now();
        Ok(reservation.clone())
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        Ok(self.rows.lock().unwrap().get(&reservation_id).cloned())
    }

    async fn find_upcoming_by_email(
        &self,
        email: &str,
        after: DateTime<Utc>,
    ) -> AppResult<Vec<Reservation>> {
        let rows = self.rows.lock().unwrap();
        let mut items: Vec<Reservation> = rows
            .values()
            .filter(|r| {
                r.email == email
                    && r.status == ReservationStatus::Confirmed
                    && r.reservation_date_time > after
            })
            .cloned()
            .collect();
        items.sort_by_key(|r| r.reservation_date_time);
        Ok(items)
    }

    async fn find_reminder_targets(&self, window: ReminderWindow) -> AppResult<Vec<Reservation>> {
        let rows = self.rows.lock().unwrap();
        let mut items: Vec<Reservation> = rows
            .values()
            .filter(|r| {
                r.status == ReservationStatus::Confirmed
                    && !r.reminder_sent
                    && r.reservation_date_time >= window.from
                    && r.reservation_date_time < window.until
            })
            .cloned()
            .collect();
        items.sort_by_key(|r| r.reservation_date_time);
        Ok(items)
    }

    async fn mark_reminder_sent(&self, reservation_id: ReservationId) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&reservation_id) {
            Some(r) if r.status == ReservationStatus::Confirmed && !r.reminder_sent => {
                r.reminder_sent = true;
                r.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// 送信内容を記録するテスト用の送信口。fail を立てると配送失敗を再現できる
#[derive(Default)]
pub struct RecordingEmailSender {
    pub sent: Mutex<Vec<(String, String, String)>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::DeliveryFailure("email down".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.into(), subject.into(), body.into()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSmsSender {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl SmsSender for RecordingSmsSender {
    async fn send(&self, to: &str, body: &str) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::DeliveryFailure("sms down".into()));
        }
        self.sent.lock().unwrap().push((to.into(), body.into()));
        Ok(())
    }
}

pub fn dispatcher_with(
    email: Arc<RecordingEmailSender>,
    sms: Arc<RecordingSmsSender>,
) -> Arc<NotificationDispatcher> {
    Arc::new(NotificationDispatcher::new(email, sms))
}

pub fn renderer() -> Arc<TemplateRenderer> {
    Arc::new(TemplateRenderer::new(NotificationTemplates::default()))
}

pub fn create_event(
    email: &str,
    channel: NotificationChannel,
    date_time: DateTime<Utc>,
) -> CreateReservation {
    CreateReservation::new(
        "Taro Yamada".into(),
        "+818012345678".into(),
        email.into(),
        date_time,
        2,
        channel,
    )
}
