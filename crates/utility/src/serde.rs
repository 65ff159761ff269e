pub mod date_time {
    use core::fmt;

    use chrono::NaiveDate;
    use serde::de::{self, Error, Unexpected, Visitor};
    use serde::Deserializer;

    pub fn deserialize_yyyymmdd<'de, D>(
        deserializer: D,
    ) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DateVisitor;

        impl<'de> Visitor<'de> for DateVisitor {
            type Value = NaiveDate;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string in the format YYYYMMDD")
            }

            fn visit_str<E>(self, value: &str) -> Result<NaiveDate, E>
            where
                E: de::Error,
            {
                NaiveDate::parse_from_str(value, "%Y%m%d").map_err(|_| {
                    de::Error::invalid_value(Unexpected::Str(value), &self)
                })
            }
        }

        deserializer.deserialize_str(DateVisitor)
    }
}

pub mod duration {
    use chrono::Duration;
    use schemars::gen::SchemaGenerator;
    use schemars::schema::{InstanceType, Schema, SchemaObject};
    use serde::de::{Error as DeError, IntoDeserializer};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Parses a GTFS `HH:MM:SS` time-of-day as a duration since midnight.
    /// Hours may exceed 23 to express a post-midnight continuation of the
    /// service day.
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_hms(duration))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_hms(&s).map_err(D::Error::custom)
    }

    pub fn serialize_option<S>(
        option_duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match option_duration {
            Some(d) => serialize(d, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        match s {
            Some(s) if !s.is_empty() => {
                let duration = deserialize(s.as_str().into_deserializer())?;
                Ok(Some(duration))
            }
            _ => Ok(None),
        }
    }

    pub fn schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            format: Some("hh:mm:ss".to_owned()),
            ..Default::default()
        }
        .into()
    }

    pub fn schema_option(_gen: &mut SchemaGenerator) -> Schema {
        schema(_gen)
    }

    /// Renders an optional duration as `HH:MM:SS`, or an empty string when
    /// absent, for callers that need the raw GTFS text representation
    /// rather than a `serde` serializer.
    pub fn format_option(duration: &Option<Duration>) -> String {
        duration.as_ref().map(format_hms).unwrap_or_default()
    }

    fn format_hms(duration: &Duration) -> String {
        let total_seconds = duration.num_seconds();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }

    fn parse_hms(s: &str) -> Result<Duration, String> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 3 {
            return Err(format!("expected format hh:mm:ss, got '{s}'"));
        }
        let hours: i64 = parts[0].parse().map_err(|_| format!("bad hour in '{s}'"))?;
        let minutes: i64 = parts[1]
            .parse()
            .map_err(|_| format!("bad minute in '{s}'"))?;
        let seconds: i64 = parts[2]
            .parse()
            .map_err(|_| format!("bad second in '{s}'"))?;
        Ok(Duration::hours(hours) + Duration::minutes(minutes) + Duration::seconds(seconds))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn parses_hours_past_24() {
            let d = parse_hms("25:35:00").unwrap();
            assert_eq!(d.num_seconds(), 25 * 3600 + 35 * 60);
        }

        #[test]
        fn round_trips() {
            let d = Duration::seconds(3600 + 120 + 5);
            assert_eq!(format_hms(&d), "01:02:05");
        }
    }
}
