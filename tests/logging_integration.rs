//! Integration tests for filtering under an installed subscriber.

use pretty_assertions::assert_eq;
use tracing::Level;

use sift::prelude::*;

#[derive(Debug, Clone)]
struct Event {
    id: i64,
    kind: String,
}

sift::entity! {
    Event as "Events" {
        "Id" => id: Int,
        "Kind" => kind: String,
    }
}

fn events() -> MemoryQuery<Event> {
    MemoryQuery::from(vec![
        Event { id: 1, kind: "login".into() },
        Event { id: 2, kind: "logout".into() },
        Event { id: 3, kind: "login".into() },
    ])
}

#[test]
fn test_filtering_with_trace_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_test_writer()
        .finish();

    let config = SiftConfig::from_str("[debug]\nlog_filters = true").unwrap();
    let query = EntityQuery::<Event, _>::with_config(AllowAll, &config);
    let who = Principal::new("t", "u");

    let ids: Vec<i64> = tracing::subscriber::with_default(subscriber, || {
        query
            .find_many(
                &who,
                &events(),
                Some(r#"[{"Property":"Kind","Operator":"=","Value":"login"}]"#),
            )
            .map(|q| q.iter().map(|e| e.id).collect())
    })
    .unwrap();

    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn test_errors_are_unaffected_by_logging() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .finish();

    let query = EntityQuery::<Event, _>::new(RoleEntitlements::new());
    let err = tracing::subscriber::with_default(subscriber, || {
        query.find_many(&Principal::new("t", "u"), &events(), None)
    })
    .unwrap_err();

    assert_eq!(err.code, ErrorCode::AccessDenied);
    assert_eq!(err.to_string(), "[P3001] Missing Read entitlement on Events");
}
