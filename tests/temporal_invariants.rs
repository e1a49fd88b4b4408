//! Temporal Codec Invariant Tests
//!
//! Tests for the wire time format:
//! - Every offset in [-23:59, +23:59] round-trips
//! - Zero offset is always `Z`
//! - Fractional epoch seconds decode without drift
//! - Malformed time objects fail as malformed temporal values

use aerodb_driver::protocol::ScriptedTransport;
use aerodb_driver::temporal::{
    decode_unzoned, decode_zoned, encode_zoned, epoch_to_instant, format_offset_minutes,
    parse_offset_minutes, TemporalError, MAX_OFFSET_MINUTES,
};
use aerodb_driver::{Dispatcher, DriverConfig, DriverError, Query, Response, TemporalValue};
use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde_json::json;
use std::sync::Arc;

// =============================================================================
// Timezone Tests
// =============================================================================

/// Encoding then decoding any minute offset yields the same offset.
#[test]
fn test_timezone_round_trip() {
    assert_eq!(MAX_OFFSET_MINUTES, 1439);
    for offset in -1439..=1439 {
        let encoded = format_offset_minutes(offset);
        assert_eq!(parse_offset_minutes(&encoded), Ok(offset), "{}", encoded);
    }
}

/// Zero decodes from and encodes to the literal `Z`.
#[test]
fn test_zero_offset_is_z() {
    assert_eq!(parse_offset_minutes("Z"), Ok(0));
    assert_eq!(format_offset_minutes(0), "Z");

    let utc = FixedOffset::east_opt(0).unwrap();
    let instant = epoch_to_instant(0.0).unwrap().with_timezone(&utc);
    assert_eq!(encode_zoned(&instant)["timezone"], "Z");
}

// =============================================================================
// Epoch Precision Tests
// =============================================================================

/// 1147162826.5 has a sub-second component of exactly .5.
#[test]
fn test_epoch_half_second_exact() {
    let instant = decode_unzoned(&json!({"epoch_time": 1147162826.5, "timezone": "Z"})).unwrap();
    assert_eq!(instant.timestamp(), 1147162826);
    assert_eq!(instant.nanosecond(), 500_000_000);
}

/// Millisecond fractions survive without changing the apparent second.
#[test]
fn test_epoch_millisecond_fractions() {
    for (epoch, secs, millis) in [
        (1.001, 1, 1),
        (1375147296.999, 1375147296, 999),
        (1609459199.9, 1609459199, 900),
    ] {
        let instant = epoch_to_instant(epoch).unwrap();
        assert_eq!(instant.timestamp(), secs, "{}", epoch);
        assert_eq!(instant.timestamp_subsec_millis(), millis, "{}", epoch);
    }
}

// =============================================================================
// Decode Error Tests
// =============================================================================

#[test]
fn test_malformed_temporal_shapes() {
    assert_eq!(
        decode_zoned(&json!({"epoch_time": 0})),
        Err(TemporalError::MissingField("timezone"))
    );
    assert!(matches!(
        decode_zoned(&json!({"epoch_time": 0, "timezone": "EST"})),
        Err(TemporalError::InvalidTimezone(_))
    ));
    assert!(matches!(
        decode_unzoned(&json!({"epoch_time": null})),
        Err(TemporalError::WrongFieldType { .. })
    ));
}

// =============================================================================
// End-to-End Tests
// =============================================================================

/// Temporal fields decode through the dispatcher.
#[tokio::test]
async fn test_times_through_dispatcher() {
    let transport = Arc::new(ScriptedTransport::new());
    let dispatcher = Dispatcher::new(transport.clone(), DriverConfig::default());

    let wire_time = json!({"$reql_type$": "TIME", "epoch_time": 1147162826.5, "timezone": "+02:00"});
    transport.script_one(Response::batch(vec![wire_time.clone(), wire_time], false));

    let zoned: Vec<DateTime<FixedOffset>> =
        dispatcher.run_sequence(Query::new(json!("now")), &[]).await.unwrap();
    assert_eq!(zoned.len(), 2);
    assert_eq!(zoned[0].offset().local_minus_utc(), 7200);
    assert_eq!(zoned[0].nanosecond(), 500_000_000);

    transport.script_one(Response::atom(json!({"epoch_time": 0, "timezone": "Z"})));
    let value: Option<TemporalValue> =
        dispatcher.run_optional(Query::new(json!("epoch")), &[]).await.unwrap();
    assert_eq!(
        value.map(|v| v.to_utc()),
        DateTime::<Utc>::from_timestamp(0, 0)
    );
}

/// A malformed time item fails that pull with a malformed temporal error.
#[tokio::test]
async fn test_malformed_time_through_cursor() {
    let transport = Arc::new(ScriptedTransport::new());
    let dispatcher = Dispatcher::new(transport.clone(), DriverConfig::default());
    transport.script_one(Response::batch(
        vec![json!({"epoch_time": 5}), json!({"timezone": "Z"})],
        false,
    ));

    let mut cursor = dispatcher
        .run_cursor::<DateTime<Utc>>(Query::new(json!("times")), &[])
        .await
        .unwrap();
    assert_eq!(cursor.next().await.unwrap().map(|t| t.timestamp()), Some(5));
    assert_eq!(
        cursor.next().await.unwrap_err(),
        DriverError::MalformedTemporal(TemporalError::MissingField("epoch_time"))
    );
}
