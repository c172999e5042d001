use serde::{Deserialize, Serialize};
use log::{debug, trace};

// ===== Message Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest
{   pub messages: Vec<ChatMessage>
  , pub temperature: f64
  , pub max_tokens: i64
  , pub top_p: f64
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>
  , pub model: String
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse
{   #[serde(default)]
    pub choices: Option<Vec<Choice>>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice
{   #[serde(default)]
    pub message: Option<ResponseMessage>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage
{   #[serde(default)]
    pub content: Option<String>
}

// ===== Request / Response =====

/// Bearer token in `Authorization`
pub const AUTH: crate::request::AuthHeader = crate::request::AuthHeader
{   name: "Authorization"
  , prefix: "Bearer "
};

/// Chat-completions endpoint under `base_url`
pub fn endpoint(base_url: &str) -> String
{   format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Build the chat-completions call for `prompt`
pub fn build_request(
  config: &crate::config::Config
, prompt: &str
) -> Result<crate::request::ProviderRequest, crate::error::Error>
{   let request = ChatCompletionRequest
    {   messages: vec![
          ChatMessage
          {   role: "system".to_string()
            , content: config.system_prompt.clone()
          }
        , ChatMessage
          {   role: "user".to_string()
            , content: prompt.to_string()
          }
        ]
      , temperature: config.temperature
      , max_tokens: config.max_tokens
      , top_p: config.top_p
      , frequency_penalty: config.frequency_penalty
      , presence_penalty: config.presence_penalty
      , model: config.model.clone()
    };
    trace!("OpenAI request: {:?}", request);

    crate::request::ProviderRequest::json(
      endpoint(&config.base_url)
    , &request
    , AUTH
    , &config.api_key
    )
}

/// Pull `choices[].message.content` out of a response body, in order.
/// Missing `choices` means no candidates; missing content is empty text.
pub fn parse_response(body: &[u8])
  -> Result<Vec<String>, crate::error::Error>
{   let response: ChatCompletionResponse
      = serde_json::from_slice(body)?;

    let texts: Vec<String> = response.choices
      .unwrap_or_default()
      .into_iter()
      .map(|choice| {
        choice.message
          .and_then(|m| m.content)
          .unwrap_or_default()
      })
      .collect();

    debug!("OpenAI returned {} choices", texts.len());
    Ok(texts)
}
