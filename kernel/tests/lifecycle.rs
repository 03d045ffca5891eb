mod support;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use kernel::event::{EventBus, EventKind, EventSubscriber, ReservationEvent};
use kernel::model::reservation::event::UpdateReservation;
use kernel::model::reservation::{NotificationChannel, ReservationStatus};
use kernel::service::listener::ReservationEventListener;
use kernel::service::reservation::ReservationService;
use shared::error::{AppError, AppResult};
use support::{
    create_event, dispatcher_with, renderer, InMemoryReservationRepository, RecordingEmailSender,
    RecordingSmsSender,
};

// 発行されたイベントを記録する購読者
#[derive(Default)]
struct CollectingSubscriber {
    events: Mutex<Vec<ReservationEvent>>,
}

impl CollectingSubscriber {
    fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().unwrap().iter().map(|e| e.kind()).collect()
    }
}

#[async_trait]
impl EventSubscriber for CollectingSubscriber {
    async fn handle(&self, event: &ReservationEvent) -> AppResult<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

fn service_with_collector() -> (
    ReservationService,
    Arc<InMemoryReservationRepository>,
    Arc<CollectingSubscriber>,
) {
    let repository = Arc::new(InMemoryReservationRepository::default());
    let collector = Arc::new(CollectingSubscriber::default());
    let event_bus = Arc::new(EventBus::new());
    for kind in [EventKind::Created, EventKind::Updated, EventKind::Cancelled] {
        event_bus.subscribe(kind, collector.clone());
    }
    (
        ReservationService::new(repository.clone(), event_bus),
        repository,
        collector,
    )
}

#[tokio::test]
async fn create_persists_confirmed_reservation_and_publishes_created_event() {
    let (service, _repository, collector) = service_with_collector();
    let date_time = Utc::now() + Duration::hours(6);

    let created = service
        .create(create_event("taro@example.com", NotificationChannel::Email, date_time))
        .await
        .unwrap();

    assert_eq!(created.status, ReservationStatus::Confirmed);
    assert!(!created.reminder_sent);
    assert_eq!(created.email, "taro@example.com");
    assert_eq!(created.reservation_date_time, date_time);

    // 作成直後の取得結果は作成時の返り値と一致する
    let fetched = service.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let events = collector.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    match &events[0] {
        ReservationEvent::Created(event) => {
            assert_eq!(event.reservation_id, created.id);
            assert_eq!(event.number_of_guests, 2);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn create_with_past_date_time_writes_nothing_and_publishes_nothing() {
    let (service, repository, collector) = service_with_collector();
    let date_time = Utc::now() - Duration::minutes(1);

    let result = service
        .create(create_event("taro@example.com", NotificationChannel::Email, date_time))
        .await;

    assert!(matches!(result, Err(AppError::InvalidReservation(_))));
    assert_eq!(repository.count(), 0);
    assert!(collector.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cancel_publishes_once_and_double_cancel_is_rejected() {
    let (service, _repository, collector) = service_with_collector();
    let created = service
        .create(create_event(
            "taro@example.com",
            NotificationChannel::Email,
            Utc::now() + Duration::hours(6),
        ))
        .await
        .unwrap();

    service.cancel(created.id).await.unwrap();
    assert_eq!(collector.kinds(), vec![EventKind::Created, EventKind::Cancelled]);

    // 2 回目のキャンセルは拒否され、イベントも増えない
    let second = service.cancel(created.id).await;
    assert!(matches!(second, Err(AppError::InvalidReservation(_))));
    assert_eq!(collector.kinds(), vec![EventKind::Created, EventKind::Cancelled]);

    let stored = service.get_by_id(created.id).await.unwrap();
    assert_eq!(stored.status, ReservationStatus::Cancelled);
}

#[tokio::test]
async fn update_overwrites_schedule_and_publishes_new_values() {
    let (service, _repository, collector) = service_with_collector();
    let created = service
        .create(create_event(
            "taro@example.com",
            NotificationChannel::Email,
            Utc::now() + Duration::hours(6),
        ))
        .await
        .unwrap();

    let new_date_time = Utc::now() + Duration::hours(8);
    let updated = service
        .update(UpdateReservation::new(created.id, new_date_time, 5))
        .await
        .unwrap();

    assert_eq!(updated.reservation_date_time, new_date_time);
    assert_eq!(updated.number_of_guests, 5);

    let events = collector.events.lock().unwrap();
    match events.last().unwrap() {
        ReservationEvent::Updated(event) => {
            assert_eq!(event.new_reservation_date_time, new_date_time);
            assert_eq!(event.new_number_of_guests, 5);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn update_of_cancelled_reservation_is_rejected() {
    let (service, _repository, collector) = service_with_collector();
    let created = service
        .create(create_event(
            "taro@example.com",
            NotificationChannel::Email,
            Utc::now() + Duration::hours(6),
        ))
        .await
        .unwrap();
    service.cancel(created.id).await.unwrap();

    let result = service
        .update(UpdateReservation::new(
            created.id,
            Utc::now() + Duration::hours(8),
            4,
        ))
        .await;

    assert!(matches!(result, Err(AppError::InvalidReservation(_))));
    assert_eq!(collector.kinds(), vec![EventKind::Created, EventKind::Cancelled]);
}

#[tokio::test]
async fn update_with_past_date_time_is_rejected() {
    let (service, _repository, _collector) = service_with_collector();
    let created = service
        .create(create_event(
            "taro@example.com",
            NotificationChannel::Email,
            Utc::now() + Duration::hours(6),
        ))
        .await
        .unwrap();

    let result = service
        .update(UpdateReservation::new(
            created.id,
            Utc::now() - Duration::minutes(1),
            4,
        ))
        .await;

    assert!(matches!(result, Err(AppError::InvalidReservation(_))));

    // 予約は変更されていない
    let stored = service.get_by_id(created.id).await.unwrap();
    assert_eq!(stored.number_of_guests, 2);
}

#[tokio::test]
async fn operations_on_missing_reservation_return_not_found() {
    let (service, _repository, _collector) = service_with_collector();
    let missing = kernel::model::id::ReservationId::new();

    assert!(matches!(
        service.get_by_id(missing).await,
        Err(AppError::EntityNotFound(_))
    ));
    assert!(matches!(
        service.cancel(missing).await,
        Err(AppError::EntityNotFound(_))
    ));
    assert!(matches!(
        service
            .update(UpdateReservation::new(
                missing,
                Utc::now() + Duration::hours(8),
                4
            ))
            .await,
        Err(AppError::EntityNotFound(_))
    ));
}

#[tokio::test]
async fn list_upcoming_returns_only_confirmed_future_reservations_for_email() {
    let (service, _repository, _collector) = service_with_collector();
    let email = "hanako@example.com";

    let kept = service
        .create(create_event(email, NotificationChannel::Email, Utc::now() + Duration::hours(6)))
        .await
        .unwrap();
    let cancelled = service
        .create(create_event(email, NotificationChannel::Email, Utc::now() + Duration::hours(7)))
        .await
        .unwrap();
    service.cancel(cancelled.id).await.unwrap();
    service
        .create(create_event(
            "someone-else@example.com",
            NotificationChannel::Email,
            Utc::now() + Duration::hours(6),
        ))
        .await
        .unwrap();

    let upcoming = service.list_upcoming(email).await.unwrap();

    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].id, kept.id);
}

#[tokio::test]
async fn events_for_one_reservation_are_published_in_commit_order() {
    let (service, _repository, collector) = service_with_collector();
    let created = service
        .create(create_event(
            "taro@example.com",
            NotificationChannel::Email,
            Utc::now() + Duration::hours(6),
        ))
        .await
        .unwrap();

    service
        .update(UpdateReservation::new(created.id, Utc::now() + Duration::hours(7), 3))
        .await
        .unwrap();
    service
        .update(UpdateReservation::new(created.id, Utc::now() + Duration::hours(8), 4))
        .await
        .unwrap();
    service.cancel(created.id).await.unwrap();

    assert_eq!(
        collector.kinds(),
        vec![
            EventKind::Created,
            EventKind::Updated,
            EventKind::Updated,
            EventKind::Cancelled,
        ]
    );
}

#[tokio::test]
async fn delivery_failure_does_not_fail_the_mutation() {
    let repository = Arc::new(InMemoryReservationRepository::default());
    let email = Arc::new(RecordingEmailSender::default());
    let sms = Arc::new(RecordingSmsSender::default());
    email.fail.store(true, std::sync::atomic::Ordering::SeqCst);

    let event_bus = Arc::new(EventBus::new());
    let listener = Arc::new(ReservationEventListener::new(
        renderer(),
        dispatcher_with(email, sms),
    ));
    event_bus.subscribe(EventKind::Created, listener);
    let service = ReservationService::new(repository, event_bus);

    // 確定通知の配送が失敗しても、予約作成そのものは成功する
    let created = service
        .create(create_event(
            "taro@example.com",
            NotificationChannel::Email,
            Utc::now() + Duration::hours(6),
        ))
        .await
        .unwrap();

    assert_eq!(created.status, ReservationStatus::Confirmed);
}

#[tokio::test]
async fn create_with_both_channel_sends_confirmation_to_both_senders() {
    let repository = Arc::new(InMemoryReservationRepository::default());
    let email = Arc::new(RecordingEmailSender::default());
    let sms = Arc::new(RecordingSmsSender::default());

    let event_bus = Arc::new(EventBus::new());
    let listener = Arc::new(ReservationEventListener::new(
        renderer(),
        dispatcher_with(email.clone(), sms.clone()),
    ));
    event_bus.subscribe(EventKind::Created, listener);
    let service = ReservationService::new(repository, event_bus);

    service
        .create(create_event(
            "taro@example.com",
            NotificationChannel::Both,
            Utc::now() + Duration::hours(6),
        ))
        .await
        .unwrap();

    let emails = email.sent.lock().unwrap();
    let smses = sms.sent.lock().unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(smses.len(), 1);
    assert_eq!(emails[0].0, "taro@example.com");
    assert_eq!(smses[0].0, "+818012345678");
}
