use crate::client::{PredictionApi, PredictionClient};
use crate::config::Config;
use crate::store::PredictionStore;
use std::path::PathBuf;

#[derive(Debug, PartialEq)]
pub enum Command {
    Analyze(PathBuf),
    History,
    Delete(String),
}

impl Command {
    pub fn from_args<I: Iterator<Item = String>>(mut args: I) -> Result<Self, String> {
        match args.next().as_deref() {
            Some("analyze") => match args.next() {
                Some(path) => Ok(Command::Analyze(PathBuf::from(path))),
                None => Err("usage: analyze <image-path>".into()),
            },
            Some("history") => Ok(Command::History),
            Some("delete") => match args.next() {
                Some(id) => Ok(Command::Delete(id)),
                None => Err("usage: delete <prediction-id>".into()),
            },
            Some(other) => Err(format!(
                "unknown command `{}`. Use `analyze`, `history` or `delete`.",
                other
            )),
            None => Err("usage: caloriecam_client <analyze|history|delete> [args]".into()),
        }
    }
}

pub async fn run(config: Config, command: Command) -> anyhow::Result<()> {
    let client = match PredictionClient::new(&config.backend) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to initialize prediction client: {:?}", e);
            return Err(e.into());
        }
    };

    match command {
        Command::Analyze(path) => {
            let image = tokio::fs::read(&path).await?;
            let prediction = client.analyze(image).await?;
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
        Command::History => {
            let store = PredictionStore::new(client);
            store.refresh().await;
            if let Some(error) = store.last_error() {
                anyhow::bail!(error);
            }
            println!("{}", serde_json::to_string_pretty(&store.records())?);
            tracing::info!(total = store.total_count(), "fetched prediction history");
        }
        Command::Delete(id) => {
            let store = PredictionStore::new(client);
            store.delete(&id).await;
            if let Some(error) = store.last_error() {
                anyhow::bail!(error);
            }
            tracing::info!(%id, "prediction deleted");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        Command::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_analyze_with_path() {
        let command = parse(&["analyze", "food.jpg"]).unwrap();
        assert_eq!(command, Command::Analyze(PathBuf::from("food.jpg")));
    }

    #[test]
    fn parses_history_and_delete() {
        assert_eq!(parse(&["history"]).unwrap(), Command::History);
        assert_eq!(
            parse(&["delete", "abc123"]).unwrap(),
            Command::Delete("abc123".into())
        );
    }

    #[test]
    fn rejects_missing_arguments() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["analyze"]).is_err());
        assert!(parse(&["delete"]).is_err());
        assert!(parse(&["serve"]).is_err());
    }
}
