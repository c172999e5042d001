use std::fmt;

/// Which of the three failure families an error belongs to.
/// Each family renders as a single result item with its own headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind
{   /// A preference is missing or not parseable
    Configuration
  , /// Network failure, non-2xx status or timeout
    Transport
  , /// 2xx response whose body could not be read as expected
    ResponseShape
}

impl ErrorKind
{   /// Title shown to the user for this family of errors
    pub fn headline(&self) -> &'static str
    {   match self
        {   ErrorKind::Configuration => "Failed to parse preferences"
          , ErrorKind::Transport => "Request failed"
          , ErrorKind::ResponseShape => "Failed to parse response"
        }
    }
}

/// Custom error type for launchllm operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// A required preference key is absent
    MissingPreference(String)
  , /// A preference value could not be converted to its type
    InvalidPreference
    {   key: String
      , value: String
      , reason: String
    }
  , /// `api_provider` names a provider we don't speak
    UnknownProvider(String)
  , /// Request body could not be serialized
    RequestBuild(String)
  , /// Connection or transport level failure
    HttpError(String)
  , /// API answered with a non-2xx status
    ApiError
    {   status: u16
      , body: String
    }
  , /// Request exceeded the fixed timeout
    Timeout
  , /// Response body was not the JSON shape we expect
    ParseError(String)
}

impl Error
{   pub fn kind(&self) -> ErrorKind
    {   match self
        {   Error::MissingPreference(_)
          | Error::InvalidPreference { .. }
          | Error::UnknownProvider(_) => ErrorKind::Configuration
          , Error::RequestBuild(_)
          | Error::HttpError(_)
          | Error::ApiError { .. }
          | Error::Timeout => ErrorKind::Transport
          , Error::ParseError(_) => ErrorKind::ResponseShape
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingPreference(key) => {
              write!(f, "Missing preference: {}", key)
            }
          , Error::InvalidPreference { key, value, reason } => {
              write!(f,
                "Invalid value {:?} for {}: {}",
                value, key, reason
              )
            }
          , Error::UnknownProvider(name) => {
              write!(f, "Unknown API provider: {:?}", name)
            }
          , Error::RequestBuild(msg) => {
              write!(f, "Could not build request: {}", msg)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError { status, body } => {
              write!(f, "API error {}: {}", status, body)
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error
{   fn from(e: reqwest::Error) -> Self
    {   if e.is_timeout()
        {   Error::Timeout
        } else
        {   Error::HttpError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for Error
{   fn from(e: serde_json::Error) -> Self
    {   Error::ParseError(e.to_string())
    }
}
