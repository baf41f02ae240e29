//! Tests for the planner module.

use serde_json::json;
use tempfile::TempDir;

use super::*;
use crate::error::VoyageError;
use crate::models::{EventState, TripStatus, Visibility};
use crate::params::{
    CreateDay, CreateEvents, CreateTrip, DeleteEvent, GetProgress, GetSchedule, Id,
    ReorderEvents, UpdateEvent, UpdateTrip,
};

/// Helper function to create a test planner
async fn create_test_planner() -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

async fn create_test_trip(planner: &Planner, user_id: &str) -> crate::models::Trip {
    planner
        .create_trip(&CreateTrip {
            user_id: user_id.to_string(),
            title: "Hangzhou Weekend".to_string(),
            start_date: Some("2026-03-07".to_string()),
            end_date: Some("2026-03-08".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to create trip")
}

async fn create_test_day(planner: &Planner, trip_id: &str, date: &str) -> String {
    let created = planner
        .create_day(&CreateDay {
            trip_id: trip_id.to_string(),
            user_id: "u1".to_string(),
            day: json!({"date": date}),
            position: None,
        })
        .await
        .expect("Failed to create day");
    created.day.id
}

#[tokio::test]
async fn test_create_trip_defaults() {
    let (_temp_dir, planner) = create_test_planner().await;

    let trip = create_test_trip(&planner, "u1").await;
    assert_eq!(trip.status, TripStatus::Draft);
    assert_eq!(trip.visibility, Visibility::Private);
    assert_eq!(trip.completed, 0);
    assert_eq!(trip.id.len(), 13);

    let fetched = planner
        .get_trip(&trip.id, Some("u1"))
        .await
        .expect("Failed to get trip");
    assert_eq!(fetched.title, "Hangzhou Weekend");
}

#[tokio::test]
async fn test_private_trip_is_hidden_from_strangers() {
    let (_temp_dir, planner) = create_test_planner().await;
    let trip = create_test_trip(&planner, "u1").await;

    let err = planner.get_trip(&trip.id, Some("u2")).await.unwrap_err();
    assert!(matches!(err, VoyageError::PermissionDenied { .. }));

    // Publishing publicly opens it up.
    planner
        .update_trip(&UpdateTrip {
            trip_id: trip.id.clone(),
            user_id: "u1".to_string(),
            status: Some("published".to_string()),
            visibility: Some("public".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to publish trip");

    let fetched = planner.get_trip(&trip.id, Some("u2")).await.unwrap();
    assert!(fetched.is_publicly_readable());
}

#[tokio::test]
async fn test_deleted_trip_disappears() {
    let (_temp_dir, planner) = create_test_planner().await;
    let trip = create_test_trip(&planner, "u1").await;

    planner
        .delete_trip(&Id {
            id: trip.id.clone(),
            user_id: "u1".to_string(),
        })
        .await
        .expect("Failed to delete trip");

    let err = planner.get_trip(&trip.id, Some("u1")).await.unwrap_err();
    assert!(matches!(err, VoyageError::TripNotFound { .. }));
}

#[tokio::test]
async fn test_only_the_owner_can_write() {
    let (_temp_dir, planner) = create_test_planner().await;
    let trip = create_test_trip(&planner, "u1").await;

    let err = planner
        .create_day(&CreateDay {
            trip_id: trip.id.clone(),
            user_id: "intruder".to_string(),
            day: json!({"date": "2026-03-07"}),
            position: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, VoyageError::PermissionDenied { .. }));
}

#[tokio::test]
async fn test_create_day_is_idempotent() {
    let (_temp_dir, planner) = create_test_planner().await;
    let trip = create_test_trip(&planner, "u1").await;

    let first = planner
        .create_day(&CreateDay {
            trip_id: trip.id.clone(),
            user_id: "u1".to_string(),
            day: json!({"id": "D1", "date": "2026-03-07"}),
            position: None,
        })
        .await
        .unwrap();
    assert!(!first.existed);
    assert_eq!(first.day.short_date.as_deref(), Some("3月7日"));

    let again = planner
        .create_day(&CreateDay {
            trip_id: trip.id.clone(),
            user_id: "u1".to_string(),
            day: json!({"id": "D1", "date": "2026-03-07"}),
            position: None,
        })
        .await
        .unwrap();
    assert!(again.existed);

    let days = planner.list_days(&trip.id, Some("u1")).await.unwrap();
    assert_eq!(days.len(), 1);
}

#[tokio::test]
async fn test_day_insert_at_position_shifts_order() {
    let (_temp_dir, planner) = create_test_planner().await;
    let trip = create_test_trip(&planner, "u1").await;

    create_test_day(&planner, &trip.id, "2026-03-07").await;
    create_test_day(&planner, &trip.id, "2026-03-09").await;

    planner
        .create_day(&CreateDay {
            trip_id: trip.id.clone(),
            user_id: "u1".to_string(),
            day: json!({"date": "2026-03-08"}),
            position: Some(1),
        })
        .await
        .unwrap();

    let days = planner.list_days(&trip.id, Some("u1")).await.unwrap();
    let dates: Vec<_> = days.iter().filter_map(|d| d.date.as_deref()).collect();
    assert_eq!(dates, vec!["2026-03-07", "2026-03-08", "2026-03-09"]);
    let orders: Vec<_> = days.iter().map(|d| d.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_events_insert_at_clamped_position() {
    let (_temp_dir, planner) = create_test_planner().await;
    let trip = create_test_trip(&planner, "u1").await;
    let day_id = create_test_day(&planner, &trip.id, "2026-03-07").await;

    for title in ["First", "Second"] {
        planner
            .create_events(&CreateEvents {
                trip_id: trip.id.clone(),
                user_id: "u1".to_string(),
                day_id: day_id.clone(),
                events: vec![json!({"title": title})],
                position: None,
            })
            .await
            .unwrap();
    }

    // Insert two more at position 1; the tail shifts by two.
    let inserted = planner
        .create_events(&CreateEvents {
            trip_id: trip.id.clone(),
            user_id: "u1".to_string(),
            day_id: day_id.clone(),
            events: vec![json!({"title": "Mid A"}), json!({"title": "Mid B"})],
            position: Some(1),
        })
        .await
        .unwrap();
    assert_eq!(inserted.len(), 2);
    assert_eq!(inserted[0].order, 1);
    assert_eq!(inserted[1].order, 2);

    let schedule = planner
        .get_schedule(&GetSchedule {
            trip_id: trip.id.clone(),
            user_id: Some("u1".to_string()),
            template: Some("edit".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let events = schedule.days[0]["events"].as_array().unwrap();
    let titles: Vec<_> = events
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["First", "Mid A", "Mid B", "Second"]);
    let orders: Vec<_> = events
        .iter()
        .map(|e| e["eventOrder"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);

    // A wildly out-of-range position clamps to the end.
    let tail = planner
        .create_events(&CreateEvents {
            trip_id: trip.id.clone(),
            user_id: "u1".to_string(),
            day_id: day_id.clone(),
            events: vec![json!({"title": "Last"})],
            position: Some(999),
        })
        .await
        .unwrap();
    assert_eq!(tail[0].order, 4);
}

#[tokio::test]
async fn test_events_address_day_by_date() {
    let (_temp_dir, planner) = create_test_planner().await;
    let trip = create_test_trip(&planner, "u1").await;
    let day_id = create_test_day(&planner, &trip.id, "2026-03-07").await;

    let created = planner
        .create_events(&CreateEvents {
            trip_id: trip.id.clone(),
            user_id: "u1".to_string(),
            day_id: "2026-03-07".to_string(),
            events: vec![json!({"title": "Lunch"})],
            position: None,
        })
        .await
        .unwrap();
    assert_eq!(created[0].day_id, day_id);

    let err = planner
        .create_events(&CreateEvents {
            trip_id: trip.id.clone(),
            user_id: "u1".to_string(),
            day_id: "2030-01-01".to_string(),
            events: vec![json!({"title": "Nowhere"})],
            position: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, VoyageError::DayNotFound { .. }));
}

#[tokio::test]
async fn test_update_event_merges_partial_payload() {
    let (_temp_dir, planner) = create_test_planner().await;
    let trip = create_test_trip(&planner, "u1").await;
    let day_id = create_test_day(&planner, &trip.id, "2026-03-07").await;

    let created = planner
        .create_events(&CreateEvents {
            trip_id: trip.id.clone(),
            user_id: "u1".to_string(),
            day_id,
            events: vec![json!({
                "title": "Museum",
                "startTime": "10:00",
                "cost": 60,
                "tags": ["culture"]
            })],
            position: None,
        })
        .await
        .unwrap();
    let event_id = created[0].id.clone();

    let updated = planner
        .update_event(&UpdateEvent {
            trip_id: trip.id.clone(),
            user_id: "u1".to_string(),
            event_id: event_id.clone(),
            event: json!({"state": "completed", "cost": "80"}),
        })
        .await
        .unwrap();

    assert_eq!(updated.id, event_id);
    assert_eq!(updated.state, EventState::Completed);
    assert_eq!(updated.cost, Some(80.0));
    // Untouched fields survive the merge.
    assert_eq!(updated.title.as_deref(), Some("Museum"));
    assert_eq!(updated.start_time.as_deref(), Some("10:00"));
    assert_eq!(updated.tags, json!(["culture"]));
}

#[tokio::test]
async fn test_multi_card_options_replace_wholesale() {
    let (_temp_dir, planner) = create_test_planner().await;
    let trip = create_test_trip(&planner, "u1").await;
    let day_id = create_test_day(&planner, &trip.id, "2026-03-07").await;

    let created = planner
        .create_events(&CreateEvents {
            trip_id: trip.id.clone(),
            user_id: "u1".to_string(),
            day_id,
            events: vec![json!({
                "title": "Dinner",
                "options": [
                    {"title": "Hotpot"},
                    {"title": "Noodles"}
                ]
            })],
            position: None,
        })
        .await
        .unwrap();

    let card = &created[0];
    assert!(card.is_multi());
    assert_eq!(card.options.len(), 2);

    let replaced = planner
        .update_event(&UpdateEvent {
            trip_id: trip.id.clone(),
            user_id: "u1".to_string(),
            event_id: card.id.clone(),
            event: json!({"options": [{"title": "Dumplings"}]}),
        })
        .await
        .unwrap();

    assert_eq!(replaced.options.len(), 1);
    assert_eq!(replaced.options[0].title.as_deref(), Some("Dumplings"));
    assert_eq!(replaced.options[0].parent_event_id.as_deref(), Some(card.id.as_str()));
}

#[tokio::test]
async fn test_delete_event_closes_gap_once() {
    let (_temp_dir, planner) = create_test_planner().await;
    let trip = create_test_trip(&planner, "u1").await;
    let day_id = create_test_day(&planner, &trip.id, "2026-03-07").await;

    let mut ids = Vec::new();
    for title in ["A", "B", "C"] {
        let created = planner
            .create_events(&CreateEvents {
                trip_id: trip.id.clone(),
                user_id: "u1".to_string(),
                day_id: day_id.clone(),
                events: vec![json!({"title": title})],
                position: None,
            })
            .await
            .unwrap();
        ids.push(created[0].id.clone());
    }

    let delete = DeleteEvent {
        trip_id: trip.id.clone(),
        user_id: "u1".to_string(),
        event_id: ids[1].clone(),
    };
    planner.delete_event(&delete).await.unwrap();
    // Deleting again finds no live row and must not shift the order a
    // second time.
    let err = planner.delete_event(&delete).await.unwrap_err();
    assert!(matches!(err, VoyageError::EventNotFound { .. }));

    let remaining = [
        planner.get_event(&trip.id, &ids[0], Some("u1")).await.unwrap(),
        planner.get_event(&trip.id, &ids[2], Some("u1")).await.unwrap(),
    ];
    assert_eq!(remaining[0].order, 0);
    assert_eq!(remaining[1].order, 1);

    let err = planner
        .get_event(&trip.id, &ids[1], Some("u1"))
        .await
        .unwrap_err();
    assert!(matches!(err, VoyageError::EventNotFound { .. }));
}

#[tokio::test]
async fn test_reorder_overwrites_event_order() {
    let (_temp_dir, planner) = create_test_planner().await;
    let trip = create_test_trip(&planner, "u1").await;
    let day_id = create_test_day(&planner, &trip.id, "2026-03-07").await;

    let created = planner
        .create_events(&CreateEvents {
            trip_id: trip.id.clone(),
            user_id: "u1".to_string(),
            day_id: day_id.clone(),
            events: vec![json!({"title": "A"}), json!({"title": "B"}), json!({"title": "C"})],
            position: None,
        })
        .await
        .unwrap();

    let mut order: Vec<String> = created.iter().map(|e| e.id.clone()).collect();
    order.reverse();
    planner
        .reorder_events(&ReorderEvents {
            trip_id: trip.id.clone(),
            user_id: "u1".to_string(),
            day_id,
            order: order.clone(),
        })
        .await
        .unwrap();

    for (expected, id) in order.iter().enumerate() {
        let event = planner.get_event(&trip.id, id, Some("u1")).await.unwrap();
        assert_eq!(event.order as usize, expected);
    }
}

#[tokio::test]
async fn test_progress_counts_children_not_parents() {
    let (_temp_dir, planner) = create_test_planner().await;
    let trip = create_test_trip(&planner, "u1").await;
    let day_id = create_test_day(&planner, &trip.id, "2026-03-07").await;

    planner
        .create_events(&CreateEvents {
            trip_id: trip.id.clone(),
            user_id: "u1".to_string(),
            day_id,
            events: vec![
                json!({"title": "Done", "state": "completed"}),
                json!({"title": "Open"}),
                json!({
                    "title": "Card",
                    "options": [
                        {"title": "Picked", "state": "completed"},
                        {"title": "Dropped", "state": "inactive"}
                    ]
                }),
            ],
            position: None,
        })
        .await
        .unwrap();

    // Countable: Done, Open, Picked, Dropped. Settled: Done, Picked,
    // Dropped (inactive children count; the card itself never does).
    let progress = planner
        .get_progress(&GetProgress {
            trip_id: trip.id.clone(),
            user_id: Some("u1".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(progress, 75);

    let fetched = planner.get_trip(&trip.id, Some("u1")).await.unwrap();
    assert_eq!(fetched.completed, 75);
}
