use std::sync::Arc;

use async_trait::async_trait;
use shared::error::AppResult;

use crate::{
    event::{EventSubscriber, ReservationEvent},
    model::notification::NotificationRequest,
    service::{notification::NotificationDispatcher, template::TemplateRenderer},
};

// ライフサイクルイベントを受けて顧客への通知を送る購読者。
// 送信失敗はバス側で握りつぶされるため、元の予約操作が失敗することはない
pub struct ReservationEventListener {
    renderer: Arc<TemplateRenderer>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl ReservationEventListener {
    pub fn new(renderer: Arc<TemplateRenderer>, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self {
            renderer,
            dispatcher,
        }
    }
}

#[async_trait]
impl EventSubscriber for ReservationEventListener {
    async fn handle(&self, event: &ReservationEvent) -> AppResult<()> {
        let request = match event {
            ReservationEvent::Created(event) => {
                tracing::info!(reservation_id = %event.reservation_id, "予約確定通知を送信します");
                let (subject, message) = self.renderer.confirmation(
                    &event.customer_name,
                    event.reservation_id,
                    event.reservation_date_time,
                    event.number_of_guests,
                );
                NotificationRequest::new(
                    event.notification_channel,
                    event.email.clone(),
                    event.phone_number.clone(),
                    subject,
                    message,
                )
            }
            ReservationEvent::Updated(event) => {
                tracing::info!(reservation_id = %event.reservation_id, "予約変更通知を送信します");
                let (subject, message) = self.renderer.update(
                    &event.customer_name,
                    event.reservation_id,
                    event.new_reservation_date_time,
                    event.new_number_of_guests,
                );
                NotificationRequest::new(
                    event.notification_channel,
                    event.email.clone(),
                    event.phone_number.clone(),
                    subject,
                    message,
                )
            }
            ReservationEvent::Cancelled(event) => {
                tracing::info!(reservation_id = %event.reservation_id, "キャンセル通知を送信します");
                let (subject, message) = self
                    .renderer
                    .cancellation(&event.customer_name, event.reservation_id);
                NotificationRequest::new(
                    event.notification_channel,
                    event.email.clone(),
                    event.phone_number.clone(),
                    subject,
                    message,
                )
            }
        };

        self.dispatcher.send(&request).await
    }
}
