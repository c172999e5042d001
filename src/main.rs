//! Stand-in host: one query from argv, preferences from
//! `LAUNCHLLM_*` environment variables, result list as JSON on stdout.

use log::error;

#[tokio::main(flavor = "current_thread")]
async fn main()
{   env_logger::init();

    let extension = match launchllm::Extension::new()
    {   Ok(extension) => extension
      , Err(e) => {
          error!("Failed to start extension: {}", e);
          std::process::exit(1);
        }
    };

    let argument = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let event = launchllm::KeywordQueryEvent::new(argument);
    let prefs = launchllm::Preferences::from_env();

    let list = extension.dispatch(&event, &prefs).await;
    match serde_json::to_string_pretty(&list)
    {   Ok(json) => println!("{}", json)
      , Err(e) => {
          error!("Failed to serialize results: {}", e);
          std::process::exit(1);
        }
    }
}
