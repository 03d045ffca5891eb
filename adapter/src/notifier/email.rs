use async_trait::async_trait;
use derive_new::new;
use kernel::notifier::EmailSender;
use shared::error::AppResult;

// 送信内容をログへ書き出すメール送信口。実際の配送基盤へつなぐ場合は
// この実装を置き換える
#[derive(new)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        tracing::info!(%to, %subject, %body, "SENT EMAIL");
        Ok(())
    }
}
