//! Outbound request and rendered result types

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// A provider-specific HTTP call, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest
{   /// Full endpoint URL
    pub url: String
  , /// Headers to set, including auth
    pub headers: HashMap<String, String>
  , /// Serialized JSON body
    pub body: String
}

/// Header a provider reads its API key from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthHeader
{   pub name: &'static str
  , /// Put in front of the key, e.g. `"Bearer "`
    pub prefix: &'static str
}

impl ProviderRequest
{   /// JSON POST to `url` with `api_key` placed per `auth`
    pub fn json<T: Serialize>(
      url: String
    , body: &T
    , auth: AuthHeader
    , api_key: &str
    ) -> Result<Self, crate::error::Error>
    {   let body = serde_json::to_string(body).map_err(|e| {
          crate::error::Error::RequestBuild(e.to_string())
        })?;

        let mut headers = HashMap::new();
        headers.insert(
          "Content-Type".to_string()
        , "application/json".to_string()
        );
        headers.insert(
          auth.name.to_string()
        , format!("{}{}", auth.prefix, api_key)
        );

        Ok(ProviderRequest { url, headers, body })
    }
}

/// What happens when the user picks a result item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Action
{   CopyToClipboard(String)
  , DoNothing
}

/// One selectable entry in the launcher's result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem
{   pub icon: String
  , pub name: String
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>
  , pub on_enter: Action
}

impl ResultItem
{   /// Model output; enter copies the wrapped text
    pub fn assistant(text: String) -> Self
    {   ResultItem
        {   icon: crate::EXTENSION_ICON.to_string()
          , name: crate::ASSISTANT_TITLE.to_string()
          , description: Some(text.clone())
          , on_enter: Action::CopyToClipboard(text)
        }
    }

    /// A failure, titled by its kind; enter copies the cause
    pub fn error(err: &crate::error::Error) -> Self
    {   let cause = err.to_string();
        ResultItem
        {   icon: crate::EXTENSION_ICON.to_string()
          , name: err.kind().headline().to_string()
          , description: Some(cause.clone())
          , on_enter: Action::CopyToClipboard(cause)
        }
    }

    /// Inert informational entry
    pub fn notice(name: &str, description: Option<String>) -> Self
    {   ResultItem
        {   icon: crate::EXTENSION_ICON.to_string()
          , name: name.to_string()
          , description
          , on_enter: Action::DoNothing
        }
    }
}

/// The list handed back to the host for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderResultList
{   pub items: Vec<ResultItem>
}

impl RenderResultList
{   pub fn new(items: Vec<ResultItem>) -> Self
    {   RenderResultList { items }
    }
}
