//! The two things a launcher needs from us: an entry point that
//! registers a handler, and the handler for keyword queries.

use log::{debug, error, info};

/// The user typed after our keyword
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordQueryEvent
{   /// Text after the keyword, if any
    pub argument: Option<String>
}

impl KeywordQueryEvent
{   pub fn new(argument: impl Into<String>) -> Self
    {   KeywordQueryEvent { argument: Some(argument.into()) }
    }

    /// The prompt, or `None` if nothing but whitespace was typed
    pub fn prompt(&self) -> Option<&str>
    {   self.argument
          .as_deref()
          .map(str::trim)
          .filter(|s| !s.is_empty())
    }
}

/// Answers keyword queries
#[derive(Debug, Clone)]
pub struct KeywordQueryListener
{   client: crate::client::Client
}

impl KeywordQueryListener
{   pub fn new(client: crate::client::Client) -> Self
    {   KeywordQueryListener { client }
    }

    /// Handle one query. Every failure ends up as a single item;
    /// nothing is returned as an error to the host.
    pub async fn on_event(
      &self
    , event: &KeywordQueryEvent
    , prefs: &crate::config::Preferences
    ) -> crate::request::RenderResultList
    {   let config = match crate::config::Config::resolve(prefs)
        {   Ok(config) => config
          , Err(e) => return error_list(&e)
        };

        let prompt = match event.prompt()
        {   Some(prompt) => prompt
          , None => {
              info!("Displaying blank prompt");
              return crate::request::RenderResultList::new(vec![
                crate::request::ResultItem::notice(
                  "Type in a prompt...", None
                )
              ]);
            }
        };
        info!("The search term is: {}", prompt);

        match self.client.send(&config, prompt).await
        {   Ok(items) => {
              let summary: Vec<&str> = items
                .iter()
                .filter_map(|item| item.description.as_deref())
                .collect();
              info!("Results: {}", summary.join(" | "));
              crate::request::RenderResultList::new(items)
            }
          , Err(e) => {
              error!("{}: {}", e.kind().headline(), e);
              error_list(&e)
            }
        }
    }
}

fn error_list(err: &crate::error::Error)
  -> crate::request::RenderResultList
{   crate::request::RenderResultList::new(vec![
      crate::request::ResultItem::error(err)
    ])
}

/// Entry point: owns the registered query listener
#[derive(Debug, Clone)]
pub struct Extension
{   listener: KeywordQueryListener
}

impl Extension
{   /// Start with the default client
    pub fn new() -> Result<Self, crate::error::Error>
    {   Ok(Extension::with_client(crate::client::Client::new()?))
    }

    pub fn with_client(client: crate::client::Client) -> Self
    {   info!("LLM extension started");
        debug!("Subscribing KeywordQueryListener");
        Extension
        {   listener: KeywordQueryListener::new(client)
        }
    }

    /// Route a host event to the registered listener
    pub async fn dispatch(
      &self
    , event: &KeywordQueryEvent
    , prefs: &crate::config::Preferences
    ) -> crate::request::RenderResultList
    {   self.listener.on_event(event, prefs).await
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::config::{Preferences, KEY_API_PROVIDER, KEY_TOP_P};
    use crate::request::Action;

    fn prefs() -> Preferences
    {   [
          ("api_provider", "OpenAI")
        , ("api_key", "sk-test")
        , ("gemini_api_key", "gm-test")
          // nothing listens here, so any request would fail
        , ("base_url", "http://127.0.0.1:9")
        , ("max_tokens", "50")
        , ("temperature", "0.7")
        , ("top_p", "1.0")
        , ("system_prompt", "Be brief.")
        , ("line_wrap", "10")
        , ("model", "gpt-x")
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_prompt_normalization()
    {   assert_eq!(KeywordQueryEvent::default().prompt(), None);
        assert_eq!(KeywordQueryEvent::new("").prompt(), None);
        assert_eq!(KeywordQueryEvent::new(" \t ").prompt(), None);
        assert_eq!(KeywordQueryEvent::new(" hi ").prompt(), Some("hi"));
    }

    #[test]
    fn test_blank_prompt_shows_placeholder()
    {   let extension = Extension::new().unwrap();
        for event in [KeywordQueryEvent::default(), KeywordQueryEvent::new("  ")]
        {   let list = tokio_test::block_on(
              extension.dispatch(&event, &prefs())
            );
            assert_eq!(list.items.len(), 1);
            assert_eq!(list.items[0].name, "Type in a prompt...");
            assert_eq!(list.items[0].on_enter, Action::DoNothing);
        }
    }

    #[test]
    fn test_bad_preferences_win_over_blank_prompt()
    {   let extension = Extension::new().unwrap();
        let mut prefs = prefs();
        prefs.set(KEY_TOP_P, "high");
        let list = tokio_test::block_on(
          extension.dispatch(&KeywordQueryEvent::default(), &prefs)
        );
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].name, "Failed to parse preferences");
        assert!(matches!(list.items[0].on_enter, Action::CopyToClipboard(_)));
    }

    #[test]
    fn test_unknown_provider_is_reported()
    {   let extension = Extension::new().unwrap();
        let mut prefs = prefs();
        prefs.set(KEY_API_PROVIDER, "Claude");
        let list = tokio_test::block_on(
          extension.dispatch(&KeywordQueryEvent::new("hi"), &prefs)
        );
        assert_eq!(list.items.len(), 1);
        assert_eq!(
          list.items[0].description.as_deref()
        , Some("Unknown API provider: \"Claude\"")
        );
    }

    #[tokio::test]
    async fn test_connection_failure_is_one_item()
    {   let extension = Extension::new().unwrap();
        let list = extension
          .dispatch(&KeywordQueryEvent::new("hello"), &prefs())
          .await;
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].name, "Request failed");
    }
}
