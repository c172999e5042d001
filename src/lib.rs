pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod wrap;
pub mod client;
pub mod extension;

/*

launchllm: a launcher extension that sends whatever the user types
after the keyword to an LLM and shows the answer as result items.

One event in, one HTTP request out, one result list back:

  KeywordQueryEvent
    -> config::resolve(preferences)      typed Config or Error
    -> empty prompt?                     placeholder item
    -> client::Client::send              OpenAI or Gemini request
    -> wrap::wrap_text per candidate     one ResultItem each
    -> RenderResultList                  handed back to the host

*/

pub use client::Client;
pub use config::{Config, Preferences};
pub use error::{Error, ErrorKind};
pub use extension::{Extension, KeywordQueryEvent, KeywordQueryListener};
pub use request::{Action, ProviderRequest, RenderResultList, ResultItem};
pub use wrap::{wrap_lines, wrap_text};

/// Icon attached to every result item
pub const EXTENSION_ICON: &str = "images/icon.png";

/// Title of an item that carries model output
pub const ASSISTANT_TITLE: &str = "Assistant";

/// LLM APIs this extension can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider
{   /// Any endpoint speaking the OpenAI chat-completions schema
    OpenAI
  , /// Google Gemini generateContent
    Gemini
}

impl Provider
{   /// Name as written in the `api_provider` preference
    pub fn as_str(&self) -> &'static str
    {   match self
        {   Provider::OpenAI => "OpenAI"
          , Provider::Gemini => "Gemini"
        }
    }

    /// Parse the `api_provider` preference value
    pub fn from_preference(value: &str) -> Option<Provider>
    {   match value
        {   "OpenAI" => Some(Provider::OpenAI)
          , "Gemini" => Some(Provider::Gemini)
          , _ => None
        }
    }

    /// Whether an answer with zero candidates gets a notice item.
    /// OpenAI renders an empty list instead.
    pub fn notices_empty_response(&self) -> bool
    {   matches!(self, Provider::Gemini)
    }
}
