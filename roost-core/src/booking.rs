use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{RoomError, RoomResult};

/// One guest's reserved stay, embedded in its owning room document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub room_id: Uuid,
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
}

impl Booking {
    /// Mints a booking entry with a fresh id for the given room.
    pub fn new(room_id: Uuid, name: String, email: String, date: DateTime<Utc>) -> Self {
        Booking {
            id: Uuid::new_v4(),
            room_id,
            name,
            email,
            date,
        }
    }
}

/// Coerces an inbound stay date: RFC 3339 first, then a bare `YYYY-MM-DD`
/// which lands on midnight UTC.
pub fn parse_stay_date(raw: &str) -> RoomResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| RoomError::InvalidDate)
}

/// Parses the room/booking id pair supplied by booking mutations; both
/// must be well-formed before the store is consulted.
pub fn parse_id_pair(room_id: &str, booking_id: &str) -> RoomResult<(Uuid, Uuid)> {
    match (Uuid::parse_str(room_id), Uuid::parse_str(booking_id)) {
        (Ok(room), Ok(booking)) => Ok((room, booking)),
        _ => Err(RoomError::InvalidId(
            "Invalid roomId or bookingId".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_plain_dates_as_midnight_utc() {
        let parsed = parse_stay_date("2024-01-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let parsed = parse_stay_date("2024-06-15T10:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 6, 15, 8, 30, 0).unwrap());
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(matches!(
            parse_stay_date("next tuesday"),
            Err(RoomError::InvalidDate)
        ));
        assert!(matches!(
            parse_stay_date("2024-13-45"),
            Err(RoomError::InvalidDate)
        ));
    }

    #[test]
    fn id_pair_requires_both_ids_well_formed() {
        let room = Uuid::new_v4().to_string();
        let booking = Uuid::new_v4().to_string();
        assert!(parse_id_pair(&room, &booking).is_ok());
        assert!(matches!(
            parse_id_pair(&room, "nope"),
            Err(RoomError::InvalidId(_))
        ));
        assert!(matches!(
            parse_id_pair("nope", &booking),
            Err(RoomError::InvalidId(_))
        ));
    }
}
