//! Tests for error types

use parking_allocator::core::ParkingError;

#[test]
fn test_not_found_error() {
    let err = ParkingError::NotFound("slot `S42`".to_string());
    assert_eq!(format!("{}", err), "not found: slot `S42`");
}

#[test]
fn test_slot_unavailable_error() {
    let err = ParkingError::SlotUnavailable("slot `S1` is Booked".to_string());
    assert_eq!(format!("{}", err), "slot unavailable: slot `S1` is Booked");
}

#[test]
fn test_invalid_time_window_error() {
    let err = ParkingError::InvalidTimeWindow {
        end_ms: 100,
        now_ms: 200,
    };
    assert_eq!(format!("{}", err), "invalid time window: end 100 is not after 200");
}

#[test]
fn test_unauthorized_error() {
    assert_eq!(format!("{}", ParkingError::Unauthorized), "unauthorized credential");
}

#[test]
fn test_persistence_failure_error() {
    let err = ParkingError::PersistenceFailure("disk full".to_string());
    assert_eq!(format!("{}", err), "persistence failure: disk full");
}

#[test]
fn test_unreachable_error() {
    let err = ParkingError::Unreachable {
        from: "ENTRANCE".to_string(),
        to: "S9".to_string(),
    };
    assert_eq!(format!("{}", err), "unreachable: no path from ENTRANCE to S9");
}

#[test]
fn test_invalid_booking_error() {
    let err = ParkingError::InvalidBooking("cost NaN must be a finite non-negative amount".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid booking: cost NaN must be a finite non-negative amount"
    );
}
