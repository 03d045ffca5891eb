use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::notifier::{email::LogEmailSender, sms::LogSmsSender};
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::reservation::ReservationRepositoryImpl;
use kernel::event::{EventBus, EventKind};
use kernel::notifier::{EmailSender, SmsSender};
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::reservation::ReservationRepository;
use kernel::service::listener::ReservationEventListener;
use kernel::service::notification::NotificationDispatcher;
use kernel::service::reminder::ReminderScheduler;
use kernel::service::reservation::ReservationService;
use kernel::service::template::TemplateRenderer;
use shared::config::{AppConfig, ReminderConfig};

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    reservation_service: Arc<ReservationService>,
    template_renderer: Arc<TemplateRenderer>,
    notification_dispatcher: Arc<NotificationDispatcher>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, app_config: &AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let reservation_repository: Arc<dyn ReservationRepository> =
            Arc::new(ReservationRepositoryImpl::new(pool.clone()));

        let email_sender: Arc<dyn EmailSender> = Arc::new(LogEmailSender::new());
        let sms_sender: Arc<dyn SmsSender> = Arc::new(LogSmsSender::new());
        let template_renderer = Arc::new(TemplateRenderer::new(app_config.templates.clone()));
        let notification_dispatcher =
            Arc::new(NotificationDispatcher::new(email_sender, sms_sender));

        // 通知リスナーは起動時に各イベント種別へ登録する
        let event_bus = Arc::new(EventBus::new());
        let listener = Arc::new(ReservationEventListener::new(
            template_renderer.clone(),
            notification_dispatcher.clone(),
        ));
        event_bus.subscribe(EventKind::Created, listener.clone());
        event_bus.subscribe(EventKind::Updated, listener.clone());
        event_bus.subscribe(EventKind::Cancelled, listener);

        let reservation_service = Arc::new(ReservationService::new(
            reservation_repository.clone(),
            event_bus,
        ));

        Self {
            health_check_repository,
            reservation_repository,
            reservation_service,
            template_renderer,
            notification_dispatcher,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    pub fn reservation_service(&self) -> Arc<ReservationService> {
        self.reservation_service.clone()
    }

    // リマインドスケジューラは呼び出し側で常駐タスクとして spawn する
    pub fn reminder_scheduler(&self, config: &ReminderConfig) -> ReminderScheduler {
        ReminderScheduler::new(
            self.reservation_repository.clone(),
            self.template_renderer.clone(),
            self.notification_dispatcher.clone(),
            config,
        )
    }
}
