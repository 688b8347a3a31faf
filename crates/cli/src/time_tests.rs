// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

#[test]
fn system_clock_reports_recent_time() {
    // After 2023-11-14
    assert!(SystemClock.now_millis() > 1_700_000_000_000);
}

#[test]
fn fake_clock_advances_manually() {
    let clock = FakeClock::new(1_000);
    clock.advance_ms(250);
    clock.advance(Duration::from_millis(50));
    assert_eq!(clock.now_millis(), 1_300);

    clock.set(10);
    assert_eq!(clock.now_millis(), 10);
}

#[test]
fn fake_clock_clones_share_time() {
    let clock = FakeClock::at_epoch();
    let other = clock.clone();
    other.advance_ms(400);
    assert_eq!(clock.now_millis(), 400);
}

#[test]
fn elapsed_since_saturates() {
    let clock = FakeClock::new(100);
    assert_eq!(clock.elapsed_since(40), 60);
    assert_eq!(clock.elapsed_since(500), 0);
}

#[tokio::test]
async fn fake_sleep_auto_advances() {
    let clock = FakeClock::new(0);
    clock.sleep(Duration::from_millis(75)).await;
    assert_eq!(clock.now_millis(), 75);
}

#[tokio::test]
async fn fake_sleep_without_auto_advance_keeps_time() {
    let clock = FakeClock::new(0);
    clock.set_auto_advance(false);
    clock.clone().sleep(Duration::from_millis(75)).await;
    assert_eq!(clock.now_millis(), 0);
}

#[test]
fn handle_exposes_fake() {
    let handle = ClockHandle::fake_at(5);
    assert_eq!(handle.now_millis(), 5);
    handle.as_fake().unwrap().advance_ms(5);
    assert_eq!(handle.now_millis(), 10);
    assert!(ClockHandle::system().as_fake().is_none());
}
