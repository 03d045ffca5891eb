use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use shared::config::ReminderConfig;
use shared::error::AppResult;
use tokio::time::MissedTickBehavior;

use crate::{
    model::{
        notification::NotificationRequest,
        reservation::{event::ReminderWindow, Reservation, ReservationStatus},
    },
    repository::reservation::ReservationRepository,
    service::{notification::NotificationDispatcher, template::TemplateRenderer},
};

// 予約開始の一定時間前（既定 4 時間）に一度だけリマインドを送る常駐タスク。
// 単一タスクが 1 回のスキャンを await し切ってから次の tick へ進むため、
// 同一ウィンドウに対するスキャンが並走することはない
pub struct ReminderScheduler {
    repository: Arc<dyn ReservationRepository>,
    renderer: Arc<TemplateRenderer>,
    dispatcher: Arc<NotificationDispatcher>,
    lead: chrono::Duration,
    window_width: chrono::Duration,
    tick_interval: Duration,
}

impl ReminderScheduler {
    pub fn new(
        repository: Arc<dyn ReservationRepository>,
        renderer: Arc<TemplateRenderer>,
        dispatcher: Arc<NotificationDispatcher>,
        config: &ReminderConfig,
    ) -> Self {
        Self {
            repository,
            renderer,
            dispatcher,
            lead: chrono::Duration::minutes(config.lead_minutes),
            window_width: chrono::Duration::seconds(config.tick_interval_seconds as i64),
            tick_interval: Duration::from_secs(config.tick_interval_seconds),
        }
    }

    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.tick_interval);
        // スキャンが長引いて tick を取り逃した場合は、終了後に間隔を取り直す
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.scan(Utc::now()).await;
        }
    }

    // 1 tick 分のスキャン。対象 1 件ごとに独立して処理し、
    // 失敗してもログに残して残りの処理を続行する
    pub async fn scan(&self, now: DateTime<Utc>) {
        let from = now + self.lead;
        let window = ReminderWindow::new(from, from + self.window_width);

        let targets = match self.repository.find_reminder_targets(window).await {
            Ok(targets) => targets,
            Err(e) => {
                tracing::error!(error = %e, "リマインド対象の取得に失敗しました");
                return;
            }
        };

        if targets.is_empty() {
            tracing::debug!("リマインド対象の予約はありません");
            return;
        }

        tracing::info!(count = targets.len(), "リマインドを送信します");

        for reservation in targets {
            if let Err(e) = self.remind(&reservation).await {
                // reminder_sent は false のままなので、ウィンドウ内に留まる限り
                // 次の tick で再試行される
                tracing::error!(
                    error = %e,
                    reservation_id = %reservation.id,
                    "リマインド送信に失敗しました"
                );
            }
        }
    }

    async fn remind(&self, reservation: &Reservation) -> AppResult<()> {
        // 送信直前の再確認。スキャン開始後にキャンセル・送信済みへ
        // 変わった予約はスキップする
        let current = match self.repository.find_by_id(reservation.id).await? {
            Some(current) => current,
            None => return Ok(()),
        };
        if current.status != ReservationStatus::Confirmed || current.reminder_sent {
            return Ok(());
        }

        let (subject, message) = self.renderer.reminder(
            &current.customer_name,
            current.reservation_date_time,
            current.number_of_guests,
        );
        let request = NotificationRequest::new(
            current.notification_channel,
            current.email.clone(),
            current.phone_number.clone(),
            subject,
            message,
        );
        self.dispatcher.send(&request).await?;

        // 送信に成功した場合のみフラグを立てる。条件付き更新なので、
        // 送信とフラグ更新の間にキャンセルされた行は更新されない
        let marked = self.repository.mark_reminder_sent(current.id).await?;
        if !marked {
            tracing::warn!(
                reservation_id = %current.id,
                "reminder_sent を更新できませんでした（予約の状態が変化しています）"
            );
        } else {
            tracing::info!(reservation_id = %current.id, "リマインドを送信しました");
        }
        Ok(())
    }
}
