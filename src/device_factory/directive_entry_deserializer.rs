use crate::device_factory::serialized_device::{Builtins, DirectiveEntry, DirectiveOptions};
use serde::de::{IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, de};
use std::fmt::Formatter;

impl<'de> Deserialize<'de> for DirectiveEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DirectiveEntryVisitor;

        impl<'de> Visitor<'de> for DirectiveEntryVisitor {
            type Value = DirectiveEntry;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                write!(formatter, "a directive id like 'show-bgp' or an options map like {{ builtins: false }}")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(DirectiveEntry::Id(v.to_string()))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut options = DirectiveOptions::default();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "builtins" => options.builtins = Some(map.next_value::<Builtins>()?),
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(DirectiveEntry::Options(options))
            }
        }

        deserializer.deserialize_any(DirectiveEntryVisitor)
    }
}

impl<'de> Deserialize<'de> for Builtins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BuiltinsVisitor;

        impl<'de> Visitor<'de> for BuiltinsVisitor {
            type Value = Builtins;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                write!(formatter, "a boolean or a list of built-in directive ids")
            }

            fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Builtins::Enabled(v))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut ids = Vec::new();
                while let Some(id) = seq.next_element::<String>()? {
                    ids.push(id);
                }
                Ok(Builtins::Only(ids))
            }
        }

        deserializer.deserialize_any(BuiltinsVisitor)
    }
}
