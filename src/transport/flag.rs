use serde::Deserialize;
use serde::de::Error as DeError;

/// Boolean flag returned by Smartis as either JSON `0`/`1` or `true`/`false`.
///
/// `null` is not accepted here; wrap in `Option` for nullable flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransportFlag(bool);

impl TransportFlag {
    pub fn into_bool(self) -> bool {
        self.0
    }
}

impl From<TransportFlag> for bool {
    fn from(value: TransportFlag) -> Self {
        value.0
    }
}

impl<'de> Deserialize<'de> for TransportFlag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: Box<serde_json::value::RawValue> = Deserialize::deserialize(deserializer)?;
        let token = raw.get();

        match token {
            "true" => Ok(Self(true)),
            "false" => Ok(Self(false)),
            _ => match token.as_bytes().first().copied() {
                Some(b'-' | b'0'..=b'9') => {
                    let number = serde_json::from_str::<f64>(token).map_err(D::Error::custom)?;
                    Ok(Self(number != 0.0))
                }
                Some(b'"') => {
                    let text = serde_json::from_str::<String>(token).map_err(D::Error::custom)?;
                    Ok(Self(!matches!(text.trim(), "" | "0" | "false")))
                }
                _ => Err(D::Error::custom(
                    "expected flag field to be JSON number, boolean or string",
                )),
            },
        }
    }
}
