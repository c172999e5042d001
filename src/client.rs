use std::time::Duration;
use log::{debug, error, trace};

/// Seconds before a provider call is abandoned. There are no retries.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Sends one prompt to the configured provider and turns the answer
/// into result items.
///
/// Holds no per-request state, so one client can serve every query.
#[derive(Debug, Clone)]
pub struct Client
{   http_client: reqwest::Client
  , gemini_api_base: String
}

impl Client
{   /// Client with the fixed request timeout
    pub fn new() -> Result<Self, crate::error::Error>
    {   Client::with_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration)
      -> Result<Self, crate::error::Error>
    {   debug!("Creating Client with timeout {:?}", timeout);
        let http_client = reqwest::Client::builder()
          .timeout(timeout)
          .build()
          .map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            crate::error::Error::HttpError(e.to_string())
          })?;
        Ok(Client
        {   http_client
          , gemini_api_base: crate::providers::GEMINI_API_BASE.to_string()
        })
    }

    /// Point Gemini calls somewhere other than Google
    pub fn gemini_api_base(mut self, base: impl Into<String>) -> Self
    {   self.gemini_api_base = base.into();
        self
    }

    /// The HTTP call `send` would make
    pub fn build_request(
      &self
    , config: &crate::config::Config
    , prompt: &str
    ) -> Result<crate::request::ProviderRequest, crate::error::Error>
    {   match config.provider
        {   crate::Provider::OpenAI => {
              crate::providers::openai::build_request(config, prompt)
            }
          , crate::Provider::Gemini => {
              crate::providers::gemini::build_request(
                config, prompt, &self.gemini_api_base
              )
            }
        }
    }

    /// Ask the provider and return one item per candidate, in order.
    ///
    /// Gemini answering with no candidates yields a single notice item;
    /// OpenAI answering with no choices yields an empty list.
    pub async fn send(
      &self
    , config: &crate::config::Config
    , prompt: &str
    ) -> Result<Vec<crate::request::ResultItem>, crate::error::Error>
    {   let request = self.build_request(config, prompt)?;
        let body = self.post(request).await?;

        let (texts, block_reason) = match config.provider
        {   crate::Provider::OpenAI => {
              (crate::providers::openai::parse_response(&body)?, None)
            }
          , crate::Provider::Gemini => {
              let reply = crate::providers::gemini::parse_response(&body)?;
              (reply.texts, reply.block_reason)
            }
        };

        if texts.is_empty() && config.provider.notices_empty_response()
        {   debug!("No candidates from {}", config.provider.as_str());
            return Ok(vec![no_response_item(block_reason)]);
        }

        Ok(texts
          .iter()
          .map(|text| {
            crate::request::ResultItem::assistant(
              crate::wrap::wrap_text(text, config.line_wrap)
            )
          })
          .collect())
    }

    async fn post(
      &self
    , request: crate::request::ProviderRequest
    ) -> Result<Vec<u8>, crate::error::Error>
    {   debug!("POST {}", request.url);

        let mut builder = self.http_client.post(&request.url);
        for (name, value) in &request.headers
        {   builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
          .body(request.body)
          .send()
          .await
          .map_err(|e| {
            debug!("Send to {} failed: {}", request.url, e);
            crate::error::Error::from(e)
          })?;

        let status = response.status();
        trace!("Response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            debug!("API error {}: {}", status, error_text);
            return Err(crate::error::Error::ApiError
            {   status: status.as_u16()
              , body: error_text
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
          debug!("Failed to read response body: {}", e);
          crate::error::Error::from(e)
        })?;
        trace!("Response body: {}", String::from_utf8_lossy(&bytes));
        Ok(bytes.to_vec())
    }
}

fn no_response_item(block_reason: Option<String>)
  -> crate::request::ResultItem
{   let description = match block_reason
    {   Some(reason) => {
          format!("The model returned no candidates (blocked: {}).", reason)
        }
      , None => "The model returned no candidates.".to_string()
    };
    crate::request::ResultItem::notice("No response", Some(description))
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::request::Action;

    #[test]
    fn test_no_response_item_is_inert()
    {   let item = no_response_item(Some("SAFETY".to_string()));
        assert_eq!(item.name, "No response");
        assert_eq!(item.on_enter, Action::DoNothing);
        assert!(item.description.unwrap().contains("SAFETY"));
    }

    #[test]
    fn test_build_request_dispatches_by_provider()
    {   let client = Client::new()
          .unwrap()
          .gemini_api_base("http://localhost:9/v1beta/");
        let mut config = crate::config::Config
        {   provider: crate::Provider::Gemini
          , api_key: "k".to_string()
          , base_url: "http://localhost:8".to_string()
          , model: "m".to_string()
          , system_prompt: String::new()
          , temperature: 1.0
          , max_tokens: 1
          , top_p: 1.0
          , frequency_penalty: None
          , presence_penalty: None
          , line_wrap: 1
        };
        assert_eq!(
          client.build_request(&config, "p").unwrap().url
        , "http://localhost:9/v1beta/models/m:generateContent"
        );

        config.provider = crate::Provider::OpenAI;
        assert_eq!(
          client.build_request(&config, "p").unwrap().url
        , "http://localhost:8/chat/completions"
        );
    }
}
