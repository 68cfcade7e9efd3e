use super::*;
use crate::clock::FakeClock;

const IDLE: Duration = Duration::from_secs(60);

#[test]
fn connection_starts_authenticating() {
    let connection = Connection::new(IDLE);
    assert_eq!(connection.state, ConnectionState::Authenticating);
    assert!(!connection.is_open());
    assert!(connection.idle_deadline().is_none());
}

#[test]
fn open_transitions_from_authenticating() {
    let clock = FakeClock::new();
    let mut connection = Connection::new(IDLE);
    connection.open(&clock);
    assert!(connection.is_open());
    assert_eq!(connection.opened_at, Some(clock.now()));
}

#[test]
fn open_is_ignored_once_closed() {
    let clock = FakeClock::new();
    let mut connection = Connection::new(IDLE);
    connection.close(CloseReason::AuthFailed);
    connection.open(&clock);
    assert_eq!(
        connection.state,
        ConnectionState::Closed { reason: CloseReason::AuthFailed }
    );
}

#[test]
fn activity_pushes_idle_deadline_forward() {
    let clock = FakeClock::new();
    let mut connection = Connection::new(IDLE);
    connection.open(&clock);
    let first_deadline = connection.idle_deadline().unwrap();

    clock.advance(Duration::from_secs(30));
    connection.record_activity(clock.now());
    let second_deadline = connection.idle_deadline().unwrap();
    assert_eq!(second_deadline.duration_since(first_deadline), Duration::from_secs(30));
}

#[test]
fn connection_goes_idle_after_timeout_without_activity() {
    let clock = FakeClock::new();
    let mut connection = Connection::new(IDLE);
    connection.open(&clock);
    assert!(!connection.is_idle(clock.now()));

    clock.advance(Duration::from_secs(59));
    assert!(!connection.is_idle(clock.now()));

    clock.advance(Duration::from_secs(1));
    assert!(connection.is_idle(clock.now()));
}

#[test]
fn keepalive_prevents_idle() {
    let clock = FakeClock::new();
    let mut connection = Connection::new(IDLE);
    connection.open(&clock);

    for _ in 0..10 {
        clock.advance(Duration::from_secs(45));
        connection.record_activity(clock.now());
    }
    assert!(!connection.is_idle(clock.now()));
}

#[test]
fn close_is_terminal_and_keeps_first_reason() {
    let clock = FakeClock::new();
    let mut connection = Connection::new(IDLE);
    connection.open(&clock);
    connection.close(CloseReason::IdleTimeout);
    connection.close(CloseReason::ClientGone);
    assert_eq!(
        connection.state,
        ConnectionState::Closed { reason: CloseReason::IdleTimeout }
    );
    assert!(!connection.is_open());
    assert!(!connection.is_idle(clock.now()));
}

#[test]
fn activity_on_closed_connection_is_ignored() {
    let clock = FakeClock::new();
    let mut connection = Connection::new(IDLE);
    connection.open(&clock);
    connection.close(CloseReason::ClientGone);
    connection.record_activity(clock.now());
    assert!(connection.idle_deadline().is_none());
}
