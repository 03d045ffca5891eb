use async_trait::async_trait;
use shared::error::AppResult;

// 通知チャネルの送信口。配送に失敗した場合はエラーを返すのみで、
// 再送はここでは行わない（必要なら送信側の実装の責務）

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> AppResult<()>;
}
