use super::model::Record;

// ---------------------------------------------------------------------------
// Coordinate resolver – best-effort "lat, lon" parsing
// ---------------------------------------------------------------------------

/// Parse a combined GPS cell of the shape `"<lat>, <lon>"`.
///
/// Splits on the first comma, trims both halves and parses them as `f64`.
/// Returns `None` on any failure: no comma, a non-numeric half, or a
/// non-finite value. Never errors; a bad cell only means the record gets
/// no marker.
pub fn parse_gps(raw: &str) -> Option<(f64, f64)> {
    let (lat_part, lon_part) = raw.split_once(',')?;
    let lat: f64 = lat_part.trim().parse().ok()?;
    let lon: f64 = lon_part.trim().parse().ok()?;
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    Some((lat, lon))
}

/// Populate `latitude`/`longitude` from `gps_raw`, or clear both.
///
/// Per-record and best-effort: a malformed cell never aborts the batch.
/// Idempotent — re-resolving leaves the record unchanged.
pub fn resolve(record: &mut Record) {
    match record.gps_raw.as_deref().and_then(parse_gps) {
        Some((lat, lon)) => {
            record.latitude = Some(lat);
            record.longitude = Some(lon);
        }
        None => {
            record.latitude = None;
            record.longitude = None;
        }
    }
}

/// Run the resolver over every record. Called once per load, before any
/// filtering.
pub fn resolve_all(records: &mut [Record]) {
    for record in records {
        resolve(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_gps(raw: Option<&str>) -> Record {
        Record {
            gps_raw: raw.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn parses_plain_pair() {
        assert_eq!(parse_gps("12.5, -33.1"), Some((12.5, -33.1)));
    }

    #[test]
    fn tolerates_flexible_whitespace() {
        assert_eq!(parse_gps("  12.5 ,   -33.1  "), Some((12.5, -33.1)));
        assert_eq!(parse_gps("12.5,-33.1"), Some((12.5, -33.1)));
    }

    #[test]
    fn missing_comma_yields_none() {
        assert_eq!(parse_gps("12.5"), None);
    }

    #[test]
    fn non_numeric_halves_yield_none() {
        assert_eq!(parse_gps("north, 33.1"), None);
        assert_eq!(parse_gps("12.5, east"), None);
        assert_eq!(parse_gps(","), None);
    }

    #[test]
    fn non_finite_values_rejected() {
        assert_eq!(parse_gps("NaN, 3.0"), None);
        assert_eq!(parse_gps("1.0, inf"), None);
    }

    #[test]
    fn resolve_sets_both_or_neither() {
        let mut good = record_with_gps(Some("1.0, 2.0"));
        resolve(&mut good);
        assert_eq!(good.latitude, Some(1.0));
        assert_eq!(good.longitude, Some(2.0));

        let mut bad = record_with_gps(Some("1.0"));
        resolve(&mut bad);
        assert!(bad.latitude.is_none() && bad.longitude.is_none());

        let mut absent = record_with_gps(None);
        resolve(&mut absent);
        assert!(absent.latitude.is_none() && absent.longitude.is_none());
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut rec = record_with_gps(Some("4.25, -9.5"));
        resolve(&mut rec);
        let once = rec.clone();
        resolve(&mut rec);
        assert_eq!(rec.latitude, once.latitude);
        assert_eq!(rec.longitude, once.longitude);

        let mut empty = record_with_gps(None);
        resolve(&mut empty);
        resolve(&mut empty);
        assert!(empty.latitude.is_none() && empty.longitude.is_none());
    }
}
