use serde::{Deserialize, Serialize};
use log::{debug, info, trace};

/// Root of the public Gemini API
pub const GEMINI_API_BASE: &str
  = "https://generativelanguage.googleapis.com/v1beta";

// ===== Message Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part
{   #[serde(default)]
    pub text: Option<String>
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content
{   #[serde(default)]
    pub parts: Option<Vec<Part>>
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig
{   pub temperature: f64
  , pub max_output_tokens: i64
  , pub top_p: f64
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest
{   pub contents: Vec<Content>
  , pub generation_config: GenerationConfig
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse
{   #[serde(default)]
    pub candidates: Option<Vec<Candidate>>
  , #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate
{   #[serde(default)]
    pub content: Option<Content>
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback
{   #[serde(default)]
    pub block_reason: Option<String>
}

/// Candidate texts plus why there are none, if Gemini said
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeminiReply
{   pub texts: Vec<String>
  , pub block_reason: Option<String>
}

// ===== Request / Response =====

/// Bare key in `x-goog-api-key`
pub const AUTH: crate::request::AuthHeader = crate::request::AuthHeader
{   name: "x-goog-api-key"
  , prefix: ""
};

/// generateContent endpoint for `model` under `api_base`
pub fn endpoint(api_base: &str, model: &str) -> String
{   format!(
      "{}/models/{}:generateContent"
    , api_base.trim_end_matches('/')
    , model
    )
}

/// Build the generateContent call. The system prompt and the user
/// prompt go in as two parts of one content entry; the key travels in
/// the `x-goog-api-key` header.
pub fn build_request(
  config: &crate::config::Config
, prompt: &str
, api_base: &str
) -> Result<crate::request::ProviderRequest, crate::error::Error>
{   let request = GenerateContentRequest
    {   contents: vec![
          Content
          {   parts: Some(vec![
                Part { text: Some(config.system_prompt.clone()) }
              , Part { text: Some(prompt.to_string()) }
              ])
          }
        ]
      , generation_config: GenerationConfig
        {   temperature: config.temperature
          , max_output_tokens: config.max_tokens
          , top_p: config.top_p
        }
    };
    trace!("Gemini request: {:?}", request);

    crate::request::ProviderRequest::json(
      endpoint(api_base, &config.model)
    , &request
    , AUTH
    , &config.api_key
    )
}

/// Pull `candidates[].content.parts[0].text` out of a response body.
/// A candidate without content or parts reads as empty text.
pub fn parse_response(body: &[u8])
  -> Result<GeminiReply, crate::error::Error>
{   let response: GenerateContentResponse
      = serde_json::from_slice(body)?;

    let texts: Vec<String> = response.candidates
      .unwrap_or_default()
      .into_iter()
      .map(|candidate| {
        candidate.content
          .and_then(|c| c.parts)
          .and_then(|parts| parts.into_iter().next())
          .and_then(|part| part.text)
          .unwrap_or_default()
      })
      .collect();

    let block_reason = response.prompt_feedback
      .and_then(|f| f.block_reason);
    if let Some(reason) = &block_reason
    {   info!("Gemini blocked the prompt: {}", reason);
    }

    debug!("Gemini returned {} candidates", texts.len());
    Ok(GeminiReply { texts, block_reason })
}
