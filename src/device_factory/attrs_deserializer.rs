use serde::de::{MapAccess, Unexpected, Visitor};
use serde::{Deserializer, de};
use std::collections::HashMap;
use std::fmt::Formatter;

/// Device attributes are strings, but scalars such as ASNs are accepted and stringified.
pub fn deserialize_attrs<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct AttrsVisitor;

    impl<'de> Visitor<'de> for AttrsVisitor {
        type Value = HashMap<String, String>;

        fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
            write!(formatter, "a map of attribute names to string, number or boolean values")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut attrs = HashMap::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    other => return Err(de::Error::invalid_value(Unexpected::Other(&other.to_string()), &"a string, number or boolean")),
                };
                attrs.insert(key, value);
            }
            Ok(attrs)
        }
    }

    deserializer.deserialize_map(AttrsVisitor)
}
