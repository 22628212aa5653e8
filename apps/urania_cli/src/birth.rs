//! Command-line birth specs: `YYYY-MM-DDTHH:MM[:SS][OFFSET]@LAT,LON`.
//!
//! `OFFSET` is `Z`, `+3`, `-03:30` or `+0530`; it defaults to UTC.

use regex::Regex;
use std::str::FromStr;
use urania::BirthData;

lazy_static::lazy_static! {
    static ref BIRTH_SPEC: Regex = Regex::new(
        r"^(\d{4})-(\d{1,2})-(\d{1,2})[T ](\d{1,2}):(\d{2})(?::(\d{2}))?\s*(Z|[+-]\d{1,2}(?::?\d{2})?)?@\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)$"
    )
    .expect("birth spec pattern");
    static ref OFFSET: Regex =
        Regex::new(r"^([+-])(\d{1,2})(?::?(\d{2}))?$").expect("offset pattern");
}

#[derive(Debug, Clone, Copy)]
pub struct BirthArg(pub BirthData);

impl FromStr for BirthArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = BIRTH_SPEC.captures(s.trim()).ok_or_else(|| {
            format!(
                "expected YYYY-MM-DDTHH:MM[:SS][+HH:MM]@LAT,LON, got {:?}",
                s
            )
        })?;
        let num = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("0");

        let birth = BirthData {
            year: parse(num(1), "year")?,
            month: parse(num(2), "month")?,
            day: parse(num(3), "day")?,
            hour: parse(num(4), "hour")?,
            minute: parse(num(5), "minute")?,
            second: parse(num(6), "second")?,
            timezone: caps.get(7).map_or(Ok(0.0), |m| parse_offset(m.as_str()))?,
            latitude: parse(num(8), "latitude")?,
            longitude: parse(num(9), "longitude")?,
        };
        birth.validate().map_err(|e| e.to_string())?;
        Ok(BirthArg(birth))
    }
}

fn parse<T: FromStr>(text: &str, field: &str) -> Result<T, String> {
    text.parse()
        .map_err(|_| format!("invalid {}: {:?}", field, text))
}

/// UTC offset in hours.
pub fn parse_offset(text: &str) -> Result<f64, String> {
    if text.eq_ignore_ascii_case("z") {
        return Ok(0.0);
    }
    let caps = OFFSET
        .captures(text)
        .ok_or_else(|| format!("invalid UTC offset: {:?}", text))?;
    let hours: f64 = parse(&caps[2], "offset hours")?;
    let minutes: f64 = caps.get(3).map_or(Ok(0.0), |m| parse(m.as_str(), "offset minutes"))?;
    if minutes >= 60.0 {
        return Err(format!("invalid UTC offset: {:?}", text));
    }
    let sign = if &caps[1] == "-" { -1.0 } else { 1.0 };
    Ok(sign * (hours + minutes / 60.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_spec() {
        let BirthArg(b) = "1990-05-15T14:30:20+03:00@55.7558,37.6173".parse().unwrap();
        assert_eq!((b.year, b.month, b.day), (1990, 5, 15));
        assert_eq!((b.hour, b.minute, b.second), (14, 30, 20));
        assert_eq!(b.timezone, 3.0);
        assert_eq!(b.latitude, 55.7558);
        assert_eq!(b.longitude, 37.6173);
    }

    #[test]
    fn test_parse_defaults_to_utc() {
        let BirthArg(b) = "2001-1-9 07:05@-33.87, 151.21".parse().unwrap();
        assert_eq!(b.timezone, 0.0);
        assert_eq!(b.second, 0);
        assert_eq!(b.latitude, -33.87);
    }

    #[test]
    fn test_parse_offsets() {
        assert_eq!(parse_offset("Z").unwrap(), 0.0);
        assert_eq!(parse_offset("+0530").unwrap(), 5.5);
        assert_eq!(parse_offset("-03:30").unwrap(), -3.5);
        assert_eq!(parse_offset("-8").unwrap(), -8.0);
        assert!(parse_offset("+05:75").is_err());
    }

    #[test]
    fn test_rejects_bad_specs() {
        assert!("1990-05-15@55,37".parse::<BirthArg>().is_err());
        assert!("1990-13-15T10:00@55,37".parse::<BirthArg>().is_err());
        assert!("1990-05-15T10:00@95,37".parse::<BirthArg>().is_err());
    }
}
