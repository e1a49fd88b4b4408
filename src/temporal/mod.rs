//! Temporal codec
//!
//! Bridges the wire time object (`epoch_time` + `timezone`) and chrono
//! instants:
//!
//! - `DateTime<Utc>` is the unzoned instant; any wire timezone is dropped
//! - `DateTime<FixedOffset>` is the zoned instant, shown at the wire offset
//!
//! Decoding failures are `TemporalError`s, surfaced by the driver as
//! malformed temporal values.

mod codec;
mod errors;
mod timezone;

pub use codec::{
    decode_unzoned, decode_zoned, encode_unzoned, encode_zoned, epoch_to_instant,
    instant_to_epoch, TemporalValue, EPOCH_TIME_FIELD, PSEUDO_TYPE_FIELD, TIMEZONE_FIELD,
    TIME_PSEUDO_TYPE,
};
pub use errors::{TemporalError, TemporalResult};
pub use timezone::{
    format_offset, format_offset_minutes, parse_offset, parse_offset_minutes, MAX_OFFSET_MINUTES,
};
