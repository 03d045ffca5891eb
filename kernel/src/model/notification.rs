use crate::model::reservation::NotificationChannel;
use derive_new::new;

// 通知 1 件分のリクエスト。ディスパッチャに渡して消費する値で、永続化はしない
#[derive(new, Debug, Clone)]
pub struct NotificationRequest {
    pub channel: NotificationChannel,
    pub email: String,
    pub phone_number: String,
    pub subject: String,
    pub message: String,
}
