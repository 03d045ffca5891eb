use anyhow::Result;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub reminder: ReminderConfig,
    pub templates: NotificationTemplates,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Ok(Self {
            database: DatabaseConfig::from_env()?,
            reminder: ReminderConfig::from_env()?,
            templates: NotificationTemplates::from_env(),
        })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl DatabaseConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env_or("DATABASE_HOST", "localhost"),
            port: env_or("DATABASE_PORT", "5432").parse()?,
            username: env_or("DATABASE_USERNAME", "app"),
            password: env_or("DATABASE_PASSWORD", "passwd"),
            database: env_or("DATABASE_NAME", "app"),
        })
    }
}

// リマインド送信の設定。tick_interval はスキャンのウィンドウ幅を兼ねるため、
// リード時間より長い値を設定してはならない
#[derive(Clone)]
pub struct ReminderConfig {
    pub lead_minutes: i64,
    pub tick_interval_seconds: u64,
}

impl ReminderConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            lead_minutes: env_or("REMINDER_LEAD_MINUTES", "240").parse()?,
            tick_interval_seconds: env_or("REMINDER_TICK_INTERVAL_SECONDS", "300").parse()?,
        })
    }
}

#[derive(Clone)]
pub struct MessageTemplate {
    pub subject: String,
    pub body: String,
}

// 通知メッセージのテンプレート。本文・件名中の {customerName} のような
// 名前付きプレースホルダが送信時に実値へ置換される
#[derive(Clone)]
pub struct NotificationTemplates {
    pub confirmation: MessageTemplate,
    pub cancellation: MessageTemplate,
    pub update: MessageTemplate,
    pub reminder: MessageTemplate,
    pub date_time_format: String,
    pub time_format: String,
}

impl NotificationTemplates {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            confirmation: MessageTemplate {
                subject: env_or(
                    "NOTIFICATION_TEMPLATE_CONFIRMATION_SUBJECT",
                    &defaults.confirmation.subject,
                ),
                body: env_or(
                    "NOTIFICATION_TEMPLATE_CONFIRMATION_BODY",
                    &defaults.confirmation.body,
                ),
            },
            cancellation: MessageTemplate {
                subject: env_or(
                    "NOTIFICATION_TEMPLATE_CANCELLATION_SUBJECT",
                    &defaults.cancellation.subject,
                ),
                body: env_or(
                    "NOTIFICATION_TEMPLATE_CANCELLATION_BODY",
                    &defaults.cancellation.body,
                ),
            },
            update: MessageTemplate {
                subject: env_or(
                    "NOTIFICATION_TEMPLATE_UPDATE_SUBJECT",
                    &defaults.update.subject,
                ),
                body: env_or("NOTIFICATION_TEMPLATE_UPDATE_BODY", &defaults.update.body),
            },
            reminder: MessageTemplate {
                subject: env_or(
                    "NOTIFICATION_TEMPLATE_REMINDER_SUBJECT",
                    &defaults.reminder.subject,
                ),
                body: env_or(
                    "NOTIFICATION_TEMPLATE_REMINDER_BODY",
                    &defaults.reminder.body,
                ),
            },
            date_time_format: env_or(
                "NOTIFICATION_DATE_TIME_FORMAT",
                &defaults.date_time_format,
            ),
            time_format: env_or("NOTIFICATION_TIME_FORMAT", &defaults.time_format),
        }
    }
}

impl Default for NotificationTemplates {
    fn default() -> Self {
        Self {
            confirmation: MessageTemplate {
                subject: "Reservation Confirmed - {reservationId}".into(),
                body: "Hi {customerName}, your reservation {reservationId} for \
                       {numberOfGuests} guest(s) on {dateTime} has been confirmed. \
                       We look forward to seeing you!"
                    .into(),
            },
            cancellation: MessageTemplate {
                subject: "Reservation Cancelled - {reservationId}".into(),
                body: "Hi {customerName}, your reservation {reservationId} has been \
                       cancelled. We hope to see you again soon."
                    .into(),
            },
            update: MessageTemplate {
                subject: "Reservation Updated - {reservationId}".into(),
                body: "Hi {customerName}, your reservation {reservationId} has been \
                       updated to {dateTime} for {numberOfGuests} guest(s)."
                    .into(),
            },
            reminder: MessageTemplate {
                subject: "Reminder: your reservation at {time}".into(),
                body: "Hi {customerName}, this is a reminder of your reservation on \
                       {dateTime} for {numberOfGuests} guest(s). See you soon!"
                    .into(),
            },
            date_time_format: "%A, %B %d, %Y at %I:%M %p".into(),
            time_format: "%I:%M %p".into(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
