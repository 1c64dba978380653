//! Directive tokenizer
//!
//! Parses the colon-delimited multi-value grammar:
//!
//! ```text
//! <type>:<value>[,<value>...][;<type>:<values>...]
//! <type>:*
//! ```
//!
//! Repeated occurrences of a parameter are joined with `;` before parsing, so
//! `geo=state:ca&geo=county:06001` reads like `geo=state:ca;county:06001`.

use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    combinator::{all_consuming, rest},
    sequence::separated_pair,
    IResult,
};

use crate::params::error::{ParamError, ParamResult};
use crate::params::source::ParamSource;
use crate::params::values::ValueSet;

/// Values carried by one directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveValues {
    /// `*`
    Wildcard,
    /// Comma-separated values, trimmed and lower-cased
    List(Vec<String>),
}

impl From<DirectiveValues> for ValueSet<String> {
    fn from(values: DirectiveValues) -> Self {
        match values {
            DirectiveValues::Wildcard => ValueSet::Wildcard,
            DirectiveValues::List(values) => ValueSet::Values(values),
        }
    }
}

/// One `type:values` unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: String,
    pub values: DirectiveValues,
}

/// Parse every directive supplied for `key`
pub fn parse_directive_param(params: &impl ParamSource, key: &str) -> ParamResult<Vec<Directive>> {
    let raw = params.get_all(key).join(";");
    parse_directives(key, &raw)
}

/// Parse a raw `;`-separated directive line
///
/// Empty input yields no directives.
pub fn parse_directives(key: &str, raw: &str) -> ParamResult<Vec<Directive>> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let directives = raw
        .split(';')
        .map(|entry| parse_entry(key, entry))
        .collect::<ParamResult<Vec<_>>>()?;

    tracing::trace!(key, count = directives.len(), "Parsed directives");
    Ok(directives)
}

/// Parse the single `type:value` pair supplied for `key`
///
/// No wildcard and no comma lists: both parts must be plain words.
pub fn parse_single_directive(params: &impl ParamSource, key: &str) -> ParamResult<(String, String)> {
    let raw = params
        .get_non_empty(key)
        .ok_or_else(|| ParamError::required(key))?;

    match single_entry(raw) {
        Ok((_, (kind, value))) => Ok((kind.to_lowercase(), value.to_lowercase())),
        Err(_) => Err(ParamError::format(
            format!("{} param: {}", key, raw),
            format!("<{key}_type>:<{key}_value> syntax"),
        )),
    }
}

fn parse_entry(key: &str, entry: &str) -> ParamResult<Directive> {
    let syntax_error = || {
        ParamError::format(
            format!("{} param: {}", key, entry),
            format!("<{key}_type>:<{key}_values> syntax"),
        )
    };

    let (_, (kind, value)) = directive_entry(entry).map_err(|_| syntax_error())?;
    let kind = kind.trim().to_lowercase();
    let value = value.trim().to_lowercase();

    let values = match value.as_str() {
        "*" => DirectiveValues::Wildcard,
        "" => return Err(syntax_error()),
        _ => DirectiveValues::List(value.split(',').map(|v| v.trim().to_string()).collect()),
    };

    Ok(Directive { kind, values })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// `word:anything`
fn directive_entry(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_while1(is_word_char), char(':'), rest)(input)
}

/// `word:word` and nothing else
fn single_entry(input: &str) -> IResult<&str, (&str, &str)> {
    all_consuming(separated_pair(
        take_while1(is_word_char),
        char(':'),
        take_while1(is_word_char),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::source::RequestParams;

    fn list(values: &[&str]) -> DirectiveValues {
        DirectiveValues::List(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_single_directive_list() {
        let parsed = parse_directives("geo", "state:ca,tx,fl").unwrap();
        assert_eq!(
            parsed,
            vec![Directive {
                kind: "state".to_string(),
                values: list(&["ca", "tx", "fl"]),
            }]
        );
    }

    #[test]
    fn test_multiple_directives_and_case() {
        let parsed = parse_directives("geo", "State:CA, TX ;county:06001").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].kind, "state");
        assert_eq!(parsed[0].values, list(&["ca", "tx"]));
        assert_eq!(parsed[1].kind, "county");
        assert_eq!(parsed[1].values, list(&["06001"]));
    }

    #[test]
    fn test_wildcard() {
        let parsed = parse_directives("signal", "src:*").unwrap();
        assert_eq!(parsed[0].values, DirectiveValues::Wildcard);
        let parsed = parse_directives("signal", "src: * ").unwrap();
        assert_eq!(parsed[0].values, DirectiveValues::Wildcard);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_directives("geo", "").unwrap().is_empty());
        let params = RequestParams::new();
        assert!(parse_directive_param(&params, "geo").unwrap().is_empty());
    }

    #[test]
    fn test_repeated_params_are_joined() {
        let params = RequestParams::new()
            .with("geo", "state:ca")
            .with("geo", "county:06001,06003");
        let parsed = parse_directive_param(&params, "geo").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].values, list(&["06001", "06003"]));
    }

    #[test]
    fn test_malformed_entries() {
        for raw in ["state", "state:ca;", ":ca", "st ate:ca", "state:"] {
            let err = parse_directives("geo", raw).unwrap_err();
            assert!(
                err.to_string().contains("<geo_type>:<geo_values>"),
                "{} should be rejected, got {}",
                raw,
                err
            );
        }
    }

    #[test]
    fn test_single_directive() {
        let params = RequestParams::new().with("geo", "State:CA");
        assert_eq!(
            parse_single_directive(&params, "geo").unwrap(),
            ("state".to_string(), "ca".to_string())
        );
    }

    #[test]
    fn test_single_directive_rejects() {
        let params = RequestParams::new().with("geo", "");
        assert!(matches!(
            parse_single_directive(&params, "geo"),
            Err(ParamError::MissingParameter(_))
        ));
        for raw in ["state:ca,tx", "state:*", "state", "state:ca:tx"] {
            let params = RequestParams::new().with("geo", raw);
            assert!(
                matches!(
                    parse_single_directive(&params, "geo"),
                    Err(ParamError::Format { .. })
                ),
                "{} should be rejected",
                raw
            );
        }
    }
}
