use async_trait::async_trait;
use derive_new::new;
use kernel::notifier::SmsSender;
use shared::error::AppResult;

// 送信内容をログへ書き出す SMS 送信口
#[derive(new)]
pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send(&self, to: &str, body: &str) -> AppResult<()> {
        tracing::info!(%to, %body, "SENT SMS");
        Ok(())
    }
}
