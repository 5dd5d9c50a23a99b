pub mod profile;
pub mod application;
pub mod event;
pub mod content;
pub mod newsletter;
pub mod contact;

pub use profile::*;
pub use application::*;
pub use event::*;
pub use content::*;
pub use newsletter::*;
pub use contact::*;

/// Serde helper for patch fields: a missing key is `None`, an explicit
/// `null` is `Some(None)`.
pub(crate) mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
