// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Handles foundation lists and error-matcher patterns.

use nonempty::NonEmpty;
use serde::Deserialize;

use crate::classify::ErrorMatcher;
use crate::types::Foundation;

pub fn deserialize_foundations<'de, D>(deserializer: D) -> Result<NonEmpty<Foundation>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<String> = Vec::deserialize(deserializer)?;
    let foundations = values
        .iter()
        .map(|value| Foundation::new(value))
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)?;

    NonEmpty::from_vec(foundations)
        .ok_or_else(|| serde::de::Error::custom("at least one foundation is required"))
}

pub fn deserialize_matchers<'de, D>(deserializer: D) -> Result<Vec<ErrorMatcher>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entries: Vec<MatcherEntry> = Vec::deserialize(deserializer)?;
    entries
        .into_iter()
        .map(|entry| {
            ErrorMatcher::new(
                &entry.description,
                &entry.pattern,
                &entry.solution,
                &entry.code,
            )
            .map_err(|e| {
                serde::de::Error::custom(format!(
                    "invalid pattern for error matcher '{}': {}",
                    entry.description, e
                ))
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct MatcherEntry {
    description: String,
    pattern: String,
    #[serde(default)]
    solution: String,
    #[serde(default)]
    code: String,
}
