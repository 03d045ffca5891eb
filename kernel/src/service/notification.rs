use std::sync::Arc;

use shared::error::{AppError, AppResult};

use crate::{
    model::{notification::NotificationRequest, reservation::NotificationChannel},
    notifier::{EmailSender, SmsSender},
};

// 通知リクエストをチャネル希望に応じて各送信口へ振り分ける。
// チャネルは閉じた列挙型なので、ここで網羅的に match する
pub struct NotificationDispatcher {
    email_sender: Arc<dyn EmailSender>,
    sms_sender: Arc<dyn SmsSender>,
}

impl NotificationDispatcher {
    pub fn new(email_sender: Arc<dyn EmailSender>, sms_sender: Arc<dyn SmsSender>) -> Self {
        Self {
            email_sender,
            sms_sender,
        }
    }

    pub async fn send(&self, request: &NotificationRequest) -> AppResult<()> {
        match request.channel {
            NotificationChannel::Email => self.send_email(request).await,
            NotificationChannel::Sms => self.send_sms(request).await,
            NotificationChannel::Both => {
                // 片方が失敗してももう片方は必ず試す
                let email = self.send_email(request).await;
                let sms = self.send_sms(request).await;
                match (email, sms) {
                    (Ok(()), Ok(())) => Ok(()),
                    (email, sms) => {
                        let mut failures = Vec::new();
                        if let Err(e) = email {
                            failures.push(format!("email: {e}"));
                        }
                        if let Err(e) = sms {
                            failures.push(format!("sms: {e}"));
                        }
                        Err(AppError::DeliveryFailure(failures.join(", ")))
                    }
                }
            }
        }
    }

    async fn send_email(&self, request: &NotificationRequest) -> AppResult<()> {
        self.email_sender
            .send(&request.email, &request.subject, &request.message)
            .await
    }

    async fn send_sms(&self, request: &NotificationRequest) -> AppResult<()> {
        // SMS に件名は無い
        self.sms_sender.send(&request.phone_number, &request.message).await
    }
}
