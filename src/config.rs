//! Preferences supplied by the launcher and the typed config built from them

use std::collections::HashMap;
use std::str::FromStr;
use log::{debug, error};
use serde::Deserialize;

/// Prefix for preferences read from the environment
pub const ENV_PREFIX: &str = "LAUNCHLLM_";

pub const KEY_API_PROVIDER: &str = "api_provider";
pub const KEY_OPENAI_API_KEY: &str = "api_key";
pub const KEY_GEMINI_API_KEY: &str = "gemini_api_key";
pub const KEY_BASE_URL: &str = "base_url";
pub const KEY_MAX_TOKENS: &str = "max_tokens";
pub const KEY_TEMPERATURE: &str = "temperature";
pub const KEY_TOP_P: &str = "top_p";
pub const KEY_SYSTEM_PROMPT: &str = "system_prompt";
pub const KEY_LINE_WRAP: &str = "line_wrap";
pub const KEY_MODEL: &str = "model";
pub const KEY_FREQUENCY_PENALTY: &str = "frequency_penalty";
pub const KEY_PRESENCE_PENALTY: &str = "presence_penalty";

/// Keys that must be present for a config to resolve
pub const REQUIRED_KEYS: [&str; 10] = [
  KEY_API_PROVIDER
, KEY_OPENAI_API_KEY
, KEY_GEMINI_API_KEY
, KEY_BASE_URL
, KEY_MAX_TOKENS
, KEY_TEMPERATURE
, KEY_TOP_P
, KEY_SYSTEM_PROMPT
, KEY_LINE_WRAP
, KEY_MODEL
];

/// Keys that may be left out
pub const OPTIONAL_KEYS: [&str; 2] = [
  KEY_FREQUENCY_PENALTY
, KEY_PRESENCE_PENALTY
];

/// Raw preferences as the host stores them: every value is a string
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Preferences
{   values: HashMap<String, String>
}

impl Preferences
{   pub fn new() -> Self
    {   Preferences::default()
    }

    /// Parse a flat JSON object of string values
    pub fn from_json(json: &str)
      -> Result<Self, crate::error::Error>
    {   Ok(serde_json::from_str(json)?)
    }

    /// Read `LAUNCHLLM_<KEY>` for every known key
    pub fn from_env() -> Self
    {   let mut prefs = Preferences::new();
        for key in REQUIRED_KEYS.iter().chain(OPTIONAL_KEYS.iter())
        {   let var = format!("{}{}", ENV_PREFIX, key.to_uppercase());
            if let Ok(value) = std::env::var(&var)
            {   prefs.set(*key, value);
            }
        }
        debug!("Read {} preferences from environment", prefs.len());
        prefs
    }

    pub fn set(
      &mut self
    , key: impl Into<String>
    , value: impl Into<String>
    )
    {   self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String>
    {   self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str>
    {   self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize
    {   self.values.len()
    }

    pub fn is_empty(&self) -> bool
    {   self.values.is_empty()
    }

    fn require(&self, key: &str)
      -> Result<&str, crate::error::Error>
    {   self.get(key).ok_or_else(|| {
          crate::error::Error::MissingPreference(key.to_string())
        })
    }

    fn require_parsed<T>(&self, key: &str)
      -> Result<T, crate::error::Error>
    where
      T: FromStr
    , T::Err: std::fmt::Display
    {   let raw = self.require(key)?;
        parse_value(key, raw)
    }

    /// JSON has no inf/NaN, so only finite floats are accepted
    fn require_float(&self, key: &str)
      -> Result<f64, crate::error::Error>
    {   let raw = self.require(key)?;
        parse_finite(key, raw)
    }

    fn optional_float(&self, key: &str)
      -> Result<Option<f64>, crate::error::Error>
    {   match self.get(key)
        {   Some(raw) if !raw.trim().is_empty() => {
              parse_finite(key, raw).map(Some)
            }
          , _ => Ok(None)
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Preferences
where
  K: Into<String>
, V: Into<String>
{   fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self
    {   let mut prefs = Preferences::new();
        for (key, value) in iter
        {   prefs.set(key, value);
        }
        prefs
    }
}

fn parse_value<T>(key: &str, raw: &str)
  -> Result<T, crate::error::Error>
where
  T: FromStr
, T::Err: std::fmt::Display
{   raw.trim().parse::<T>().map_err(|e| {
      crate::error::Error::InvalidPreference
      {   key: key.to_string()
        , value: raw.to_string()
        , reason: e.to_string()
      }
    })
}

fn parse_finite(key: &str, raw: &str)
  -> Result<f64, crate::error::Error>
{   let value: f64 = parse_value(key, raw)?;
    if value.is_finite()
    {   Ok(value)
    } else
    {   Err(crate::error::Error::InvalidPreference
        {   key: key.to_string()
          , value: raw.to_string()
          , reason: "not a finite number".to_string()
        })
    }
}

/// Everything one request needs, resolved and typed.
/// Built fresh for each query and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Config
{   pub provider: crate::Provider
  , /// Key for the selected provider
    pub api_key: String
  , /// OpenAI-compatible API root, e.g. `https://api.openai.com/v1`
    pub base_url: String
  , pub model: String
  , pub system_prompt: String
  , pub temperature: f64
  , pub max_tokens: i64
  , pub top_p: f64
  , pub frequency_penalty: Option<f64>
  , pub presence_penalty: Option<f64>
  , /// Max characters per rendered line
    pub line_wrap: usize
}

impl Config
{   /// Resolve raw preferences into a config, or fail as a whole.
    ///
    /// Values are only checked for parseability; range checks are
    /// left to the provider.
    pub fn resolve(prefs: &Preferences)
      -> Result<Config, crate::error::Error>
    {   debug!("Processing user preferences");
        Config::resolve_inner(prefs).map_err(|e| {
          error!("Failed to parse preferences: {}", e);
          e
        })
    }

    fn resolve_inner(prefs: &Preferences)
      -> Result<Config, crate::error::Error>
    {   let provider_name = prefs.require(KEY_API_PROVIDER)?;
        let openai_api_key = prefs.require(KEY_OPENAI_API_KEY)?;
        let gemini_api_key = prefs.require(KEY_GEMINI_API_KEY)?;
        let base_url = prefs.require(KEY_BASE_URL)?;
        let max_tokens = prefs.require_parsed::<i64>(KEY_MAX_TOKENS)?;
        let temperature = prefs.require_float(KEY_TEMPERATURE)?;
        let top_p = prefs.require_float(KEY_TOP_P)?;
        let system_prompt = prefs.require(KEY_SYSTEM_PROMPT)?;
        let line_wrap = prefs.require_parsed::<usize>(KEY_LINE_WRAP)?;
        let model = prefs.require(KEY_MODEL)?;
        let frequency_penalty
          = prefs.optional_float(KEY_FREQUENCY_PENALTY)?;
        let presence_penalty
          = prefs.optional_float(KEY_PRESENCE_PENALTY)?;

        let provider = crate::Provider::from_preference(provider_name)
          .ok_or_else(|| {
            crate::error::Error::UnknownProvider(
              provider_name.to_string()
            )
          })?;

        let api_key = match provider
        {   crate::Provider::OpenAI => openai_api_key
          , crate::Provider::Gemini => gemini_api_key
        };

        Ok(Config
        {   provider
          , api_key: api_key.to_string()
          , base_url: base_url.to_string()
          , model: model.to_string()
          , system_prompt: system_prompt.to_string()
          , temperature
          , max_tokens
          , top_p
          , frequency_penalty
          , presence_penalty
          , line_wrap
        })
    }
}

/// Shorthand for [`Config::resolve`]
pub fn resolve(prefs: &Preferences)
  -> Result<Config, crate::error::Error>
{   Config::resolve(prefs)
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::error::{Error, ErrorKind};
    use crate::Provider;

    fn full_prefs() -> Preferences
    {   [
          (KEY_API_PROVIDER, "OpenAI")
        , (KEY_OPENAI_API_KEY, "sk-test")
        , (KEY_GEMINI_API_KEY, "gm-test")
        , (KEY_BASE_URL, "https://api.example.com")
        , (KEY_MAX_TOKENS, "50")
        , (KEY_TEMPERATURE, "0.7")
        , (KEY_TOP_P, "1.0")
        , (KEY_SYSTEM_PROMPT, "Be brief.")
        , (KEY_LINE_WRAP, "10")
        , (KEY_MODEL, "gpt-x")
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_resolves_full_preferences()
    {   let config = Config::resolve(&full_prefs()).unwrap();
        assert_eq!(config.provider, Provider::OpenAI);
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.model, "gpt-x");
        assert_eq!(config.max_tokens, 50);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.top_p, 1.0);
        assert_eq!(config.line_wrap, 10);
        assert_eq!(config.frequency_penalty, None);
        assert_eq!(config.presence_penalty, None);
    }

    #[test]
    fn test_gemini_picks_gemini_key()
    {   let mut prefs = full_prefs();
        prefs.set(KEY_API_PROVIDER, "Gemini");
        let config = resolve(&prefs).unwrap();
        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.api_key, "gm-test");
    }

    #[test]
    fn test_any_missing_key_fails_whole_config()
    {   for key in REQUIRED_KEYS
        {   let mut prefs = full_prefs();
            prefs.remove(key);
            let err = Config::resolve(&prefs).unwrap_err();
            assert_eq!(err, Error::MissingPreference(key.to_string()));
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }
    }

    #[test]
    fn test_unparseable_numbers_fail()
    {   let cases = [
          (KEY_MAX_TOKENS, "fifty")
        , (KEY_MAX_TOKENS, "1.5")
        , (KEY_TEMPERATURE, "warm")
        , (KEY_TOP_P, "")
        , (KEY_LINE_WRAP, "-3")
        , (KEY_TEMPERATURE, "inf")
        , (KEY_TOP_P, "NaN")
        , (KEY_FREQUENCY_PENALTY, "-inf")
        ];
        for (key, value) in cases
        {   let mut prefs = full_prefs();
            prefs.set(key, value);
            match Config::resolve(&prefs)
            {   Err(Error::InvalidPreference { key: k, value: v, .. }) => {
                  assert_eq!(k, key);
                  assert_eq!(v, value);
                }
              , other => panic!("{}={:?} gave {:?}", key, value, other)
            }
        }
    }

    #[test]
    fn test_non_finite_floats_are_rejected()
    {   let mut prefs = full_prefs();
        prefs.set(KEY_TEMPERATURE, "inf");
        match Config::resolve(&prefs)
        {   Err(Error::InvalidPreference { reason, .. }) => {
              assert_eq!(reason, "not a finite number");
            }
          , other => panic!("inf gave {:?}", other)
        }
    }

    #[test]
    fn test_numbers_are_trimmed_and_unchecked()
    {   let mut prefs = full_prefs();
        prefs.set(KEY_TEMPERATURE, " 7.5 ");
        prefs.set(KEY_MAX_TOKENS, "-1");
        let config = Config::resolve(&prefs).unwrap();
        assert_eq!(config.temperature, 7.5);
        assert_eq!(config.max_tokens, -1);
    }

    #[test]
    fn test_penalties_are_optional_but_checked()
    {   let mut prefs = full_prefs();
        prefs.set(KEY_FREQUENCY_PENALTY, "0.5");
        prefs.set(KEY_PRESENCE_PENALTY, "  ");
        let config = Config::resolve(&prefs).unwrap();
        assert_eq!(config.frequency_penalty, Some(0.5));
        assert_eq!(config.presence_penalty, None);

        prefs.set(KEY_PRESENCE_PENALTY, "lots");
        assert!(matches!(
          Config::resolve(&prefs)
        , Err(Error::InvalidPreference { .. })
        ));
    }

    #[test]
    fn test_unknown_provider()
    {   let mut prefs = full_prefs();
        prefs.set(KEY_API_PROVIDER, "Mistral");
        let err = Config::resolve(&prefs).unwrap_err();
        assert_eq!(err, Error::UnknownProvider("Mistral".to_string()));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_preferences_from_env()
    {   std::env::set_var("LAUNCHLLM_MODEL", "gpt-from-env");
        std::env::set_var("LAUNCHLLM_NOT_A_KEY", "ignored");
        let prefs = Preferences::from_env();
        std::env::remove_var("LAUNCHLLM_MODEL");
        std::env::remove_var("LAUNCHLLM_NOT_A_KEY");

        assert_eq!(prefs.get(KEY_MODEL), Some("gpt-from-env"));
        assert_eq!(prefs.get("not_a_key"), None);
    }

    #[test]
    fn test_preferences_from_json()
    {   let prefs = Preferences::from_json(
          r#"{"model": "gemini-pro", "line_wrap": "80"}"#
        ).unwrap();
        assert_eq!(prefs.get(KEY_MODEL), Some("gemini-pro"));
        assert_eq!(prefs.len(), 2);
        assert!(Preferences::from_json("[1, 2]").is_err());
    }
}
