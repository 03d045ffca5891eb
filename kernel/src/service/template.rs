use chrono::{DateTime, Utc};
use shared::config::NotificationTemplates;

use crate::model::id::ReservationId;

// 通知メッセージの組み立て。テンプレート中の {name} プレースホルダを実値へ
// 置換した (件名, 本文) の組を返す。未知のプレースホルダはそのまま残す
pub struct TemplateRenderer {
    templates: NotificationTemplates,
}

impl TemplateRenderer {
    pub fn new(templates: NotificationTemplates) -> Self {
        Self { templates }
    }

    pub fn confirmation(
        &self,
        customer_name: &str,
        reservation_id: ReservationId,
        date_time: DateTime<Utc>,
        number_of_guests: i32,
    ) -> (String, String) {
        let placeholders = [
            ("customerName", customer_name.to_string()),
            ("reservationId", reservation_id.to_string()),
            ("dateTime", self.format_date_time(date_time)),
            ("numberOfGuests", number_of_guests.to_string()),
        ];
        self.render(&self.templates.confirmation.subject, &self.templates.confirmation.body, &placeholders)
    }

    pub fn cancellation(
        &self,
        customer_name: &str,
        reservation_id: ReservationId,
    ) -> (String, String) {
        let placeholders = [
            ("customerName", customer_name.to_string()),
            ("reservationId", reservation_id.to_string()),
        ];
        self.render(&self.templates.cancellation.subject, &self.templates.cancellation.body, &placeholders)
    }

    pub fn update(
        &self,
        customer_name: &str,
        reservation_id: ReservationId,
        new_date_time: DateTime<Utc>,
        new_number_of_guests: i32,
    ) -> (String, String) {
        let placeholders = [
            ("customerName", customer_name.to_string()),
            ("reservationId", reservation_id.to_string()),
            ("dateTime", self.format_date_time(new_date_time)),
            ("numberOfGuests", new_number_of_guests.to_string()),
        ];
        self.render(&self.templates.update.subject, &self.templates.update.body, &placeholders)
    }

    pub fn reminder(
        &self,
        customer_name: &str,
        date_time: DateTime<Utc>,
        number_of_guests: i32,
    ) -> (String, String) {
        let placeholders = [
            ("customerName", customer_name.to_string()),
            ("dateTime", self.format_date_time(date_time)),
            ("numberOfGuests", number_of_guests.to_string()),
            // 件名用の短い時刻表記
            ("time", date_time.format(&self.templates.time_format).to_string()),
        ];
        self.render(&self.templates.reminder.subject, &self.templates.reminder.body, &placeholders)
    }

    fn render(
        &self,
        subject: &str,
        body: &str,
        placeholders: &[(&str, String)],
    ) -> (String, String) {
        (
            replace_placeholders(subject, placeholders),
            replace_placeholders(body, placeholders),
        )
    }

    fn format_date_time(&self, date_time: DateTime<Utc>) -> String {
        date_time.format(&self.templates.date_time_format).to_string()
    }
}

// {name} 形式のトークンを単純な文字列置換で埋める
fn replace_placeholders(template: &str, placeholders: &[(&str, String)]) -> String {
    placeholders
        .iter()
        .fold(template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{name}}}"), value)
        })
}
