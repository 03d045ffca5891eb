use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;
use shared::error::AppResult;

use crate::model::{id::ReservationId, reservation::NotificationChannel};

#[derive(new, Debug, Clone)]
pub struct ReservationCreated {
    pub reservation_id: ReservationId,
    pub customer_name: String,
    pub email: String,
    pub phone_number: String,
    pub reservation_date_time: DateTime<Utc>,
    pub number_of_guests: i32,
    pub notification_channel: NotificationChannel,
}

#[derive(new, Debug, Clone)]
pub struct ReservationUpdated {
    pub reservation_id: ReservationId,
    pub customer_name: String,
    pub email: String,
    pub phone_number: String,
    pub new_reservation_date_time: DateTime<Utc>,
    pub new_number_of_guests: i32,
    pub notification_channel: NotificationChannel,
}

#[derive(new, Debug, Clone)]
pub struct ReservationCancelled {
    pub reservation_id: ReservationId,
    pub customer_name: String,
    pub email: String,
    pub phone_number: String,
    pub notification_channel: NotificationChannel,
}

// 予約のライフサイクルイベント。ストアへの書き込みが確定した後にだけ発行される
#[derive(Debug, Clone)]
pub enum ReservationEvent {
    Created(ReservationCreated),
    Updated(ReservationUpdated),
    Cancelled(ReservationCancelled),
}

impl ReservationEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ReservationEvent::Created(_) => EventKind::Created,
            ReservationEvent::Updated(_) => EventKind::Updated,
            ReservationEvent::Cancelled(_) => EventKind::Cancelled,
        }
    }

    pub fn reservation_id(&self) -> ReservationId {
        match self {
            ReservationEvent::Created(event) => event.reservation_id,
            ReservationEvent::Updated(event) => event.reservation_id,
            ReservationEvent::Cancelled(event) => event.reservation_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Created,
    Updated,
    Cancelled,
}

#[async_trait]
pub trait EventSubscriber: Send + Sync {
    async fn handle(&self, event: &ReservationEvent) -> AppResult<()>;
}

// プロセス内の同期 pub/sub。配信は登録順で、購読側のエラーは発行側へ伝播させず
// ログに残して残りの購読者への配信を続ける。永続化・再送は行わない（at-most-once）
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<HashMap<EventKind, Vec<Arc<dyn EventSubscriber>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    // 指定のイベント種別に購読者を登録する。登録はプロセスの生存期間中有効
    pub fn subscribe(&self, kind: EventKind, subscriber: Arc<dyn EventSubscriber>) {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subscribers.entry(kind).or_default().push(subscriber);
    }

    pub async fn publish(&self, event: &ReservationEvent) {
        let targets = {
            let subscribers = self
                .subscribers
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            subscribers.get(&event.kind()).cloned().unwrap_or_default()
        };

        for subscriber in targets {
            if let Err(e) = subscriber.handle(event).await {
                tracing::error!(
                    error = %e,
                    reservation_id = %event.reservation_id(),
                    "イベント購読側の処理に失敗しました"
                );
            }
        }
    }
}
