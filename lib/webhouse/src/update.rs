use log::trace;
use serde_json::{Map, Value as JsonValue};

use crate::{DeviceId, Domain, Error, Result, Value};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Tv,
    Lamp,
    Chandelier,
    Setpoint,
    Actual,
    Heating,
    Burglar,
    Alarm,
}

impl Field {
    pub const ORDER: [Field; 8] = [
        Field::Tv,
        Field::Lamp,
        Field::Chandelier,
        Field::Setpoint,
        Field::Actual,
        Field::Heating,
        Field::Burglar,
        Field::Alarm,
    ];

    pub const fn keys(self) -> &'static [&'static str] {
        match self {
            Field::Tv => &["TV"],
            Field::Lamp => &["Lampe"],
            Field::Chandelier => &["Leuchter"],
            Field::Setpoint => &["TempSoll"],
            Field::Actual => &["TempIst"],
            Field::Heating => &["Heizung"],
            Field::Burglar => &["Burglar", "Lichtschranke"],
            Field::Alarm => &["Alarm"],
        }
    }

    pub const fn device(self) -> Option<DeviceId> {
        match self {
            Field::Tv => Some(DeviceId::Tv),
            Field::Lamp => Some(DeviceId::Lamp),
            Field::Chandelier => Some(DeviceId::Chandelier),
            Field::Setpoint => Some(DeviceId::HeatingSetpoint),
            Field::Actual | Field::Heating => Some(DeviceId::HeatingActual),
            Field::Burglar => None,
            Field::Alarm => Some(DeviceId::Alarm),
        }
    }

    pub fn key(self) -> &'static str {
        self.keys()[0]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InboundUpdate {
    fields: Vec<(Field, JsonValue)>,
}

impl InboundUpdate {
    pub fn parse(raw: &str) -> Result<InboundUpdate> {
        let json: JsonValue =
            serde_json::from_str(raw).map_err(|err| Error::MalformedMessage(err.to_string()))?;

        match json {
            JsonValue::Object(object) => Ok(Self::from_object(object)),
            other => Err(Error::MalformedMessage(format!(
                "expected an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    fn from_object(mut object: Map<String, JsonValue>) -> InboundUpdate {
        let mut fields = Vec::new();

        for field in Field::ORDER {
            let mut present = field
                .keys()
                .iter()
                .filter_map(|key| object.remove(*key))
                .collect::<Vec<_>>();

            if present.is_empty() {
                continue;
            }

            let value = match field {
                Field::Burglar => match present.iter().position(is_truthy) {
                    Some(index) => present.swap_remove(index),
                    None => present.swap_remove(0),
                },
                _ => present.swap_remove(0),
            };

            fields.push((field, value));
        }

        for key in object.keys() {
            trace!("ignoring unknown field {key}");
        }

        InboundUpdate { fields }
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, &JsonValue)> {
        self.fields.iter().map(|(field, value)| (*field, value))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// the controller sends numbers as strings
pub fn decode(device: DeviceId, json: &JsonValue) -> Result<Value> {
    match device.domain() {
        Domain::Percentage => decode_level(json)
            .map(Value::level)
            .ok_or_else(|| Error::invalid_value(device, format!("not a percentage: {json}"))),
        Domain::Binary { on, off } => decode_switch(json, on, off)
            .map(Value::Binary)
            .ok_or_else(|| Error::invalid_value(device, format!("expected {on} or {off}: {json}"))),
    }
}

fn decode_level(json: &JsonValue) -> Option<i64> {
    match json {
        JsonValue::Number(number) => number.as_i64().or_else(|| number.as_f64().map(truncate)),
        JsonValue::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().filter(|n| n.is_finite()).map(truncate))
        }
        _ => None,
    }
}

fn decode_switch(json: &JsonValue, on: &str, off: &str) -> Option<bool> {
    match json {
        JsonValue::Bool(is_on) => Some(*is_on),
        JsonValue::String(token) if token == on => Some(true),
        JsonValue::String(token) if token == off => Some(false),
        JsonValue::String(_) | JsonValue::Number(_) => decode_level(json).map(|n| n != 0),
        _ => None,
    }
}

pub fn is_truthy(json: &JsonValue) -> bool {
    match json {
        JsonValue::Null => false,
        JsonValue::Bool(value) => *value,
        JsonValue::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        JsonValue::String(text) => {
            !matches!(text.trim(), "" | "0" | "false" | "OFF" | "INACTIVE")
        }
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(raw: &str) -> Vec<(Field, JsonValue)> {
        InboundUpdate::parse(raw)
            .unwrap()
            .fields()
            .map(|(field, value)| (field, value.clone()))
            .collect()
    }

    #[test]
    fn test_fixed_order() {
        assert_eq!(
            fields(r#"{"Alarm":"ACTIVE","Lampe":50,"TV":"ON","Unknown":1}"#),
            vec![
                (Field::Tv, json!("ON")),
                (Field::Lamp, json!(50)),
                (Field::Alarm, json!("ACTIVE")),
            ]
        );
    }

    #[test]
    fn test_zero_is_present() {
        assert_eq!(fields(r#"{"TempSoll":0}"#), vec![(Field::Setpoint, json!(0))]);
        assert_eq!(fields(r#"{"TempSoll":"0"}"#), vec![(Field::Setpoint, json!("0"))]);
    }

    #[test]
    fn test_light_barrier_aliases() {
        assert_eq!(fields(r#"{"Lichtschranke":"1"}"#), vec![(Field::Burglar, json!("1"))]);
        assert_eq!(
            fields(r#"{"Burglar":0,"Lichtschranke":1}"#),
            vec![(Field::Burglar, json!(1))]
        );
        assert_eq!(
            fields(r#"{"Burglar":0,"Lichtschranke":"0"}"#),
            vec![(Field::Burglar, json!(0))]
        );
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            InboundUpdate::parse("not json"),
            Err(Error::MalformedMessage(_))
        ));
        assert!(matches!(
            InboundUpdate::parse("[1, 2]"),
            Err(Error::MalformedMessage(_))
        ));
        assert!(InboundUpdate::parse("{}").unwrap().is_empty());
    }

    #[test]
    fn test_decode_levels() {
        assert_eq!(decode(DeviceId::Lamp, &json!(58)).unwrap(), Value::level(58));
        assert_eq!(decode(DeviceId::Lamp, &json!("23")).unwrap(), Value::level(23));
        assert_eq!(decode(DeviceId::Lamp, &json!(" 7 ")).unwrap(), Value::level(7));
        assert_eq!(decode(DeviceId::Lamp, &json!(12.9)).unwrap(), Value::level(12));
        assert_eq!(decode(DeviceId::Lamp, &json!(250)).unwrap(), Value::level(100));
        assert_eq!(decode(DeviceId::Lamp, &json!(-4)).unwrap(), Value::level(0));
        assert!(decode(DeviceId::Lamp, &json!("bright")).is_err());
        assert!(decode(DeviceId::Lamp, &json!(null)).is_err());
        assert!(decode(DeviceId::Lamp, &json!(true)).is_err());
    }

    #[test]
    fn test_decode_switches() {
        assert_eq!(decode(DeviceId::Tv, &json!("ON")).unwrap(), Value::ON);
        assert_eq!(decode(DeviceId::Tv, &json!("OFF")).unwrap(), Value::OFF);
        assert_eq!(decode(DeviceId::Tv, &json!(true)).unwrap(), Value::ON);
        assert_eq!(decode(DeviceId::Tv, &json!("1")).unwrap(), Value::ON);
        assert_eq!(decode(DeviceId::Tv, &json!(0)).unwrap(), Value::OFF);
        assert_eq!(decode(DeviceId::Alarm, &json!("ACTIVE")).unwrap(), Value::ON);
        assert_eq!(decode(DeviceId::Alarm, &json!("INACTIVE")).unwrap(), Value::OFF);
        assert!(decode(DeviceId::Tv, &json!("ACTIVE")).is_err());
        assert!(decode(DeviceId::Alarm, &json!(null)).is_err());
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("1")));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("ON")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(null)));
    }
}
