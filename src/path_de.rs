use serde::de::DeserializeOwned;

use crate::error::SourceError;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, SourceError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| SourceError::Config {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SourceError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| SourceError::Config {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}
