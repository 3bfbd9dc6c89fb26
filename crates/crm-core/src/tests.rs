//! Unit tests for the codec and the pure projections.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::json;

use crate::{
  Error, codec,
  event::CalendarEvent,
  projection::{self, TaskFilter},
  session::Session,
  task::{Task, TaskStatus},
  user::Role,
};

fn at(secs: i64) -> DateTime<Utc> {
  DateTime::from_timestamp(secs, 0).expect("in range")
}

fn task(title: &str, due: i64, status: TaskStatus) -> Task {
  Task {
    id: None,
    title: title.into(),
    description: String::new(),
    due_date: at(due),
    status,
    assigned_user_ids: Vec::new(),
  }
}

// ─── Codec ───────────────────────────────────────────────────────────────────

#[test]
fn decode_injects_collection_key_as_task_id() {
  let snapshot = json!({
    "-k1": {
      "title": "Ship report",
      "description": "Quarterly numbers",
      "dueDate": 1_700_000_000.0,
      "status": "active",
      "assignedUserIds": ["u1"]
    }
  });

  let decoded = codec::decode_tasks(&snapshot);
  assert_eq!(decoded.dropped, 0);
  assert_eq!(decoded.items.len(), 1);
  assert_eq!(decoded.items[0].id.as_deref(), Some("-k1"));
  assert_eq!(decoded.items[0].due_date, at(1_700_000_000));
}

#[test]
fn decode_drops_malformed_members_keeps_wellformed() {
  let snapshot = json!({
    "a": {
      "title": "ok",
      "description": "",
      "dueDate": 1_700_000_000,
      "status": "active",
      "assignedUserIds": []
    },
    "b": { "title": "missing everything else" },
    "c": { "title": 42, "description": "", "dueDate": 0, "status": "active",
           "assignedUserIds": [] },
    "d": {
      "title": "also ok",
      "description": "",
      "dueDate": 1_700_000_100,
      "status": "completed",
      "assignedUserIds": []
    }
  });

  let decoded = codec::decode_tasks(&snapshot);
  assert_eq!(decoded.items.len(), 2);
  assert_eq!(decoded.dropped, 2);
}

#[test]
fn decode_non_object_snapshot_is_empty() {
  let decoded = codec::decode_tasks(&serde_json::Value::Null);
  assert!(decoded.items.is_empty());
  assert_eq!(decoded.dropped, 0);
}

#[test]
fn encode_after_decode_preserves_wire_fields() {
  let wire = json!({
    "title": "Ship report",
    "description": "Quarterly numbers",
    "dueDate": 1_700_000_000.5,
    "status": "active",
    "assignedUserIds": ["u1", "u2"]
  });
  let snapshot = json!({ "-k1": wire.clone() });

  let decoded = codec::decode_tasks(&snapshot);
  let re = codec::encode_task(&decoded.items[0]).unwrap();

  assert_eq!(re["title"], wire["title"]);
  assert_eq!(re["description"], wire["description"]);
  assert_eq!(re["status"], wire["status"]);
  assert_eq!(re["assignedUserIds"], wire["assignedUserIds"]);
  // Timestamps tolerate sub-second truncation only.
  let original = wire["dueDate"].as_f64().unwrap();
  let round_tripped = re["dueDate"].as_f64().unwrap();
  assert!((original - round_tripped).abs() < 1e-6);
  // The id stays in the path, never the payload.
  assert!(re.get("id").is_none());
}

#[test]
fn epoch_seconds_accepts_integer_and_fractional() {
  let integral = json!({ "id": "e1", "title": "t", "date": 1_700_000_000 });
  let fractional =
    json!({ "id": "e2", "title": "t", "date": 1_700_000_000.25 });

  let a: CalendarEvent = serde_json::from_value(integral).unwrap();
  let b: CalendarEvent = serde_json::from_value(fractional).unwrap();
  assert_eq!(a.date.timestamp(), 1_700_000_000);
  assert_eq!(b.date.timestamp_micros(), 1_700_000_000_250_000);
}

#[test]
fn decode_user_requires_all_fields() {
  let good = json!({ "name": "Ann", "email": "ann@x.io", "role": "manager" });
  let user = codec::decode_user("u1", &good).unwrap();
  assert_eq!(user.id, "u1");
  assert_eq!(user.role, Role::Manager);

  let bad = json!({ "name": "Ann", "email": "ann@x.io" });
  let err = codec::decode_user("u1", &bad).unwrap_err();
  assert!(matches!(err, Error::ProfileUnavailable(uid) if uid == "u1"));
}

// ─── Overdue predicate ───────────────────────────────────────────────────────

#[test]
fn overdue_is_strictly_past_due_and_active_only() {
  let now = at(1_000_000);
  let due_then = task("t", 1_000_000, TaskStatus::Active);
  let due_before = task("t", 999_999, TaskStatus::Active);
  let completed = task("t", 999_999, TaskStatus::Completed);

  // Due exactly at `now` is not yet overdue.
  assert!(!due_then.is_overdue(now));
  assert!(due_before.is_overdue(now));
  assert!(!completed.is_overdue(now));
}

#[test]
fn completing_a_task_clears_overdue() {
  let now = at(2_000_000);
  let mut t = task("Ship report", 1_000_000, TaskStatus::Active);
  assert!(t.is_overdue(now));
  t.status = TaskStatus::Completed;
  assert!(!t.is_overdue(now));
}

// ─── Task projection ─────────────────────────────────────────────────────────

#[test]
fn projection_filters_and_sorts_ascending_by_due_date() {
  let now = at(500);
  let tasks = vec![
    task("write minutes", 300, TaskStatus::Active),
    task("ship build", 100, TaskStatus::Completed),
    task("call supplier", 200, TaskStatus::Active),
  ];

  let all = projection::project_tasks(&tasks, "", TaskFilter::All, now);
  let due: Vec<i64> = all.iter().map(|t| t.due_date.timestamp()).collect();
  assert_eq!(due, vec![100, 200, 300]);

  let active =
    projection::project_tasks(&tasks, "", TaskFilter::Active, now);
  assert_eq!(active.len(), 2);
  assert!(active.iter().all(|t| t.status == TaskStatus::Active));

  let overdue =
    projection::project_tasks(&tasks, "", TaskFilter::Overdue, now);
  assert_eq!(overdue.len(), 2);
}

#[test]
fn projection_search_is_case_insensitive_over_title_and_description() {
  let now = at(0);
  let mut with_desc = task("untitled", 100, TaskStatus::Active);
  with_desc.description = "Send the REPORT to finance".into();
  let tasks = vec![
    task("Ship Report", 200, TaskStatus::Active),
    with_desc,
    task("unrelated", 300, TaskStatus::Active),
  ];

  let hits = projection::project_tasks(&tasks, "report", TaskFilter::All, now);
  assert_eq!(hits.len(), 2);
}

#[test]
fn projection_sort_is_stable_on_due_date_ties() {
  let now = at(0);
  let tasks = vec![
    task("first", 100, TaskStatus::Active),
    task("second", 100, TaskStatus::Active),
    task("third", 100, TaskStatus::Active),
  ];

  let out = projection::project_tasks(&tasks, "", TaskFilter::All, now);
  let titles: Vec<&str> = out.iter().map(|t| t.title.as_str()).collect();
  assert_eq!(titles, vec!["first", "second", "third"]);
}

// ─── User filter ─────────────────────────────────────────────────────────────

#[test]
fn user_filter_matches_name_or_email() {
  let users = vec![
    crate::user::User {
      id:    "u1".into(),
      name:  "Anna Petrova".into(),
      email: "anna@corp.io".into(),
      role:  Role::Employee,
    },
    crate::user::User {
      id:    "u2".into(),
      name:  "Boris".into(),
      email: "b.petrov@corp.io".into(),
      role:  Role::Manager,
    },
  ];

  assert_eq!(projection::filter_users(&users, "petro").len(), 2);
  assert_eq!(projection::filter_users(&users, "ANNA").len(), 1);
  assert_eq!(projection::filter_users(&users, "").len(), 2);
}

// ─── Calendar grouping ───────────────────────────────────────────────────────

#[test]
fn events_group_by_utc_calendar_day() {
  let morning = Utc.with_ymd_and_hms(2025, 5, 1, 0, 30, 0).unwrap();
  let night = Utc.with_ymd_and_hms(2025, 5, 1, 23, 30, 0).unwrap();
  let next_day = Utc.with_ymd_and_hms(2025, 5, 2, 0, 0, 0).unwrap();

  let events = vec![
    CalendarEvent { id: "a".into(), title: "standup".into(), date: morning },
    CalendarEvent { id: "b".into(), title: "retro".into(), date: night },
    CalendarEvent { id: "c".into(), title: "kickoff".into(), date: next_day },
  ];

  let grouped = projection::group_by_day(events);
  assert_eq!(grouped.len(), 2);
  let may_first = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
  let may_second = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
  assert_eq!(grouped[&may_first].len(), 2);
  assert_eq!(grouped[&may_second].len(), 1);
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[test]
fn display_name_is_email_local_part() {
  let session =
    Session { uid: "u1".into(), email: "nikita@corp.io".into() };
  assert_eq!(session.display_name(), "nikita");

  let odd = Session { uid: "u2".into(), email: "no-at-sign".into() };
  assert_eq!(odd.display_name(), "no-at-sign");
}
