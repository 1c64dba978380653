//! Presence checks and plain value extraction

use crate::params::error::{ParamError, ParamResult};
use crate::params::source::ParamSource;

/// Fail unless every key is present with a non-empty value
pub fn require_all(params: &impl ParamSource, keys: &[&str]) -> ParamResult<()> {
    if keys.iter().all(|key| params.get_non_empty(key).is_some()) {
        Ok(())
    } else {
        Err(ParamError::MissingParameter(format!(
            "need [{}]",
            keys.join(", ")
        )))
    }
}

/// Fail unless at least one key is present
///
/// With `allow_empty` a key supplied with an empty value counts as present.
pub fn require_any(params: &impl ParamSource, keys: &[&str], allow_empty: bool) -> ParamResult<()> {
    let present = keys.iter().any(|key| {
        if allow_empty {
            params.contains(key)
        } else {
            params.get_non_empty(key).is_some()
        }
    });

    if present {
        Ok(())
    } else {
        Err(ParamError::MissingParameter(format!(
            "need one of [{}]",
            keys.join(", ")
        )))
    }
}

/// Comma-separated strings from the first of `keys` that was supplied
///
/// Every occurrence of that key contributes. Pieces are trimmed and empty
/// pieces dropped. `None` when none of the keys was supplied.
pub fn extract_strings(params: &impl ParamSource, keys: &[&str]) -> Option<Vec<String>> {
    let key = keys.iter().find(|key| params.contains(key))?;
    Some(
        params
            .get_all(key)
            .into_iter()
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::source::RequestParams;

    #[test]
    fn test_require_all() {
        let params = RequestParams::new()
            .with("time_type", "day")
            .with("time_values", "");
        assert!(require_all(&params, &["time_type"]).is_ok());
        let err = require_all(&params, &["time_type", "time_values"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing parameter: need [time_type, time_values]"
        );
    }

    #[test]
    fn test_require_any() {
        let params = RequestParams::new().with("signal", "");
        assert!(require_any(&params, &["signal", "signals"], true).is_ok());
        assert!(require_any(&params, &["signal", "signals"], false).is_err());
        assert!(require_any(&params, &["geo_value", "geo_values"], true).is_err());
    }

    #[test]
    fn test_extract_strings_first_key_wins() {
        let params = RequestParams::new()
            .with("geo_value", "ny")
            .with("geo_values", "ca, tx")
            .with("geo_values", "fl,");
        assert_eq!(
            extract_strings(&params, &["geo_values", "geo_value"]),
            Some(vec!["ca".to_string(), "tx".to_string(), "fl".to_string()])
        );
        assert_eq!(
            extract_strings(&params, &["geo_value", "geo_values"]),
            Some(vec!["ny".to_string()])
        );
        assert_eq!(extract_strings(&params, &["signals"]), None);
    }
}
