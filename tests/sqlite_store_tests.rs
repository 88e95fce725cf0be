mod common;

use common::{at, setup_test_db};
use rworkclock::core::engine::{Engine, EngineConfig};
use rworkclock::core::store::SessionStore;
use rworkclock::db::pool::DbPool;
use rworkclock::errors::{AppError, StateError};
use rworkclock::models::performance::PerformanceStatus;

fn open(path: &str) -> Engine<DbPool> {
    Engine::new(DbPool::open_initialized(path).unwrap(), EngineConfig::default()).unwrap()
}

#[test]
fn worked_time_survives_reconnect() {
    let db = setup_test_db("reconnect");

    let before = {
        let e = open(&db);
        e.check_in("emp-1", at(2, 9, 5)).unwrap();
        e.start_break("emp-1", at(2, 12, 0)).unwrap();
        e.end_break("emp-1", at(2, 12, 30)).unwrap();
        e.start_break("emp-1", at(2, 14, 0)).unwrap();
        e.live_state("emp-1", at(2, 14, 10)).unwrap().unwrap()
    };

    let e = open(&db);
    let after = e.live_state("emp-1", at(2, 14, 10)).unwrap().unwrap();
    assert_eq!(after, before);
    assert!(after.is_on_break);
    assert_eq!(after.worked_seconds, (4 * 60 + 25) * 60);

    e.end_break("emp-1", at(2, 14, 15)).unwrap();
    let closed = e.check_out("emp-1", at(2, 16, 20)).unwrap();
    assert_eq!(closed.session.breaks.len(), 2);
    assert!((closed.outcome.worked_hours - 6.5).abs() < 1e-9);
}

#[test]
fn monthly_record_is_persisted() {
    let db = setup_test_db("record_persisted");

    let record = {
        let e = open(&db);
        for d in 2..5 {
            e.check_in("emp-1", at(d, 9, 0)).unwrap();
            e.check_out("emp-1", at(d, 16, 0)).unwrap();
        }
        e.record("emp-1", "2025-06").unwrap().unwrap()
    };

    let e = open(&db);
    let reloaded = e.record("emp-1", "2025-06").unwrap().unwrap();
    assert_eq!(reloaded, record);
    assert_eq!(reloaded.total_working_days, 3);
    assert_eq!(reloaded.average_performance_score, 90.0);
    assert_eq!(reloaded.performance_status, PerformanceStatus::Excellent);

    assert_eq!(e.replay_month("emp-1", "2025-06").unwrap(), record);
}

#[test]
fn one_open_session_across_connections() {
    let db = setup_test_db("one_open");

    let first = open(&db);
    let second = open(&db);

    first.check_in("emp-1", at(2, 9, 0)).unwrap();
    let err = second.check_in("emp-1", at(2, 9, 1)).unwrap_err();
    assert!(matches!(
        err,
        AppError::State(StateError::AlreadyCheckedIn(ref e)) if e == "emp-1"
    ));

    let store = second.into_store().unwrap();
    assert_eq!(store.open_sessions().unwrap().len(), 1);
}

#[test]
fn boundary_close_is_persisted() {
    let db = setup_test_db("boundary_persisted");

    {
        let e = open(&db);
        e.check_in("night", at(2, 20, 0)).unwrap();
        assert_eq!(e.run_boundary(at(3, 5, 0)).unwrap().len(), 1);
    }

    let e = open(&db);
    assert!(e.open_session("night").unwrap().is_none());
    let store = e.into_store().unwrap();
    assert!(store.unscored_sessions("night").unwrap().is_empty());
    let s = store.session(1).unwrap().unwrap();
    assert_eq!(s.check_out, Some(at(3, 4, 0)));
}
