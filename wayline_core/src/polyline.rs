use thiserror::Error;

use crate::latlng::LatLng;

/// Fixed-point precision of the encoding, 5 decimal places.
const PRECISION: f64 = 1e5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolylineError {
    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },

    #[error("polyline truncated inside a coordinate group")]
    Truncated,

    #[error("coordinate group at offset {offset} overruns the widest valid delta")]
    OverlongGroup { offset: usize },

    #[error("polyline ends after a latitude delta with no longitude delta")]
    MissingLongitude,
}

/// Decodes a delta/zig-zag encoded polyline into coordinates.
///
/// Latitude and longitude accumulators start at zero; each pair of 5-bit
/// group sequences carries a signed delta in 1e-5 degree units. Malformed
/// input fails closed rather than emitting a partial geometry.
pub fn decode(encoded: &str) -> Result<Vec<LatLng>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut offset = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while offset < bytes.len() {
        lat += next_delta(bytes, &mut offset)?;

        if offset >= bytes.len() {
            return Err(PolylineError::MissingLongitude);
        }
        lng += next_delta(bytes, &mut offset)?;

        points.push(LatLng {
            lat: lat as f64 / PRECISION,
            lng: lng as f64 / PRECISION,
        });
    }

    Ok(points)
}

/// Consumes one 5-bit group sequence and returns its un-zig-zagged delta.
fn next_delta(bytes: &[u8], offset: &mut usize) -> Result<i64, PolylineError> {
    let mut value: i64 = 0;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(*offset) else {
            return Err(PolylineError::Truncated);
        };
        // Every group byte is offset by 63 ('?') and caps at 126 ('~').
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidByte {
                byte,
                offset: *offset,
            });
        }
        // Seven 5-bit groups already cover any zig-zagged 1e-5 degree
        // delta; a longer run can only come from corrupt input.
        if shift > 30 {
            return Err(PolylineError::OverlongGroup { offset: *offset });
        }
        *offset += 1;

        let group = i64::from(byte - 63);
        value |= (group & 0x1f) << shift;
        shift += 5;

        if group & 0x20 == 0 {
            break;
        }
    }

    if value & 1 == 1 {
        Ok(!(value >> 1))
    } else {
        Ok(value >> 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_single_point() {
        let points = decode("_p~iF~ps|U").unwrap();
        assert_eq!(points, vec![LatLng::new(38.5, -120.2)]);
    }

    #[test]
    fn decodes_reference_three_point_path() {
        let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(
            points,
            vec![
                LatLng::new(38.5, -120.2),
                LatLng::new(40.7, -120.95),
                LatLng::new(43.252, -126.453),
            ]
        );
    }

    #[test]
    fn empty_input_decodes_to_empty_geometry() {
        assert_eq!(decode("").unwrap(), vec![]);
    }

    #[test]
    fn truncated_group_fails_closed() {
        // '_' has the continuation bit set, so the stream ends mid-group.
        assert_eq!(decode("_"), Err(PolylineError::Truncated));
    }

    #[test]
    fn latitude_without_longitude_fails_closed() {
        // "_p~iF" is exactly one complete delta.
        assert_eq!(decode("_p~iF"), Err(PolylineError::MissingLongitude));
    }

    #[test]
    fn unbounded_continuation_run_fails_closed() {
        // Every '_' keeps the continuation bit set; a run longer than any
        // valid delta must error out instead of shifting past 64 bits.
        let encoded = "_".repeat(20);
        assert_eq!(
            decode(&encoded),
            Err(PolylineError::OverlongGroup { offset: 7 })
        );
    }

    #[test]
    fn out_of_range_byte_fails_closed() {
        assert_eq!(
            decode("_p~iF~ps|U!"),
            Err(PolylineError::InvalidByte {
                byte: b'!',
                offset: 10
            })
        );
    }
}
