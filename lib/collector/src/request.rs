use mcu::SensorKind;
use serde::Serialize;
use serde_repr::Serialize_repr;

#[derive(Debug, Serialize)]
pub struct CreateReading<'a> {
    #[serde(rename = "sensorName")]
    pub sensor_name: &'a str,
    pub reading_type: ReadingType,
    pub reading_value: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize_repr)]
#[repr(u8)]
pub enum ReadingType {
    Temperature = 1,
    Humidity = 2,
    Lux = 3,
}

impl From<SensorKind> for ReadingType {
    fn from(kind: SensorKind) -> Self {
        match kind {
            SensorKind::Temperature => Self::Temperature,
            SensorKind::Humidity => Self::Humidity,
            SensorKind::Lux => Self::Lux,
        }
    }
}

impl<'a> CreateReading<'a> {
    pub fn new(sensor_name: &'a str, kind: SensorKind, value: f64) -> Self {
        Self {
            sensor_name,
            reading_type: kind.into(),
            reading_value: value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialization() {
        let request = CreateReading::new("greenhouse", SensorKind::Temperature, 72.5);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "sensorName": "greenhouse",
                "reading_type": 1,
                "reading_value": 72.5
            })
        );

        let request = CreateReading::new("greenhouse", SensorKind::Lux, 800.0);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "sensorName": "greenhouse",
                "reading_type": 3,
                "reading_value": 800.0
            })
        );
    }

    #[test]
    fn test_reading_type_matches_kind_code() {
        for kind in SensorKind::ALL {
            assert_eq!(ReadingType::from(kind) as u8, kind.code());
        }
    }
}
