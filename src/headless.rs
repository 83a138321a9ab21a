use anyhow::{Context, Result, bail};
use tracing::info;

use crate::config::AppConfig;
use crate::journal::{EntryQuery, HttpJournalService, JournalService, JournalSubmissionController};
use crate::notify::LogNotifier;

/// Save one entry without opening a window.
///
/// Fails (non-zero exit) when the save did not store the entry.
pub async fn submit(config: &AppConfig, text: &str) -> Result<()> {
    let service = client(config)?;
    let mut controller = JournalSubmissionController::new();
    let mut notifier = LogNotifier::default();

    controller.set_draft(text);
    if !controller.submit(&service, &mut notifier).await {
        bail!("nothing to save: the entry is empty");
    }

    let state = controller.state();
    if !state.draft.is_empty() {
        bail!("entry was not saved");
    }
    if let Some(analysis) = &state.analysis {
        println!("Mood: {}", analysis.mood);
        println!("Summary: {}", analysis.summary);
    }
    Ok(())
}

/// Read `[--from DATE] [--to DATE] [search words...]` for `--entries`
pub fn parse_query(args: &[&str]) -> Result<EntryQuery> {
    let mut query = EntryQuery::default();
    let mut words = Vec::new();
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match *arg {
            "--from" | "--to" => {
                let Some(date) = args.next() else {
                    bail!("{} needs a YYYY-MM-DD date", arg);
                };
                let slot = if *arg == "--from" {
                    &mut query.start_date
                } else {
                    &mut query.end_date
                };
                *slot = Some(date.to_string());
            }
            word => words.push(word),
        }
    }
    if !words.is_empty() {
        query.search = Some(words.join(" "));
    }
    Ok(query)
}

/// Print past entries, newest first
pub async fn list(config: &AppConfig, query: &EntryQuery) -> Result<()> {
    let service = client(config)?;
    let entries = service
        .list_entries(query)
        .await
        .context("loading past entries")?;

    info!("Fetched {} entries", entries.len());
    for record in &entries {
        println!(
            "{}  {:<12}  {}  [{}]",
            record.date().unwrap_or("----------"),
            record.mood().unwrap_or("-"),
            record.headline(),
            record.id.as_deref().unwrap_or("?")
        );
    }
    Ok(())
}

/// Delete one stored entry by id
pub async fn delete(config: &AppConfig, id: &str) -> Result<()> {
    let service = client(config)?;
    service
        .delete_entry(id)
        .await
        .with_context(|| format!("deleting entry {}", id))?;
    println!("Deleted {}", id);
    Ok(())
}

/// Check that the service root answers
pub async fn ping(config: &AppConfig) -> Result<()> {
    let service = client(config)?;
    let message = service
        .health()
        .await
        .with_context(|| format!("journal service at {} is not answering", config.service_url))?;
    println!("{}: {}", config.service_url, message);
    Ok(())
}

fn client(config: &AppConfig) -> Result<HttpJournalService> {
    HttpJournalService::with_config(config.service()).context("building journal service client")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config_for(server: &MockServer) -> AppConfig {
        AppConfig {
            service_url: server.base_url(),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn submit_succeeds_on_full_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/journal-entry")
                    .json_body(json!({ "content": "Had a great day!" }));
                then.status(200).json_body(json!({
                    "status": "success",
                    "data": {
                        "entry": { "entry": "Had a great day!" },
                        "analysis": { "mood": "happy", "summary": "A positive day." }
                    }
                }));
            })
            .await;

        submit(&config_for(&server), "Had a great day!").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn submit_fails_on_server_error() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/journal-entry");
                then.status(500);
            })
            .await;

        assert!(submit(&config_for(&server), "Had a great day!").await.is_err());
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn blank_submit_sends_nothing() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/journal-entry");
                then.status(200);
            })
            .await;

        assert!(submit(&config_for(&server), "  \n ").await.is_err());
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn ping_reports_down_service() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/");
                then.status(503);
            })
            .await;

        assert!(ping(&config_for(&server)).await.is_err());
    }

    #[test]
    fn entries_arguments_become_a_query() {
        let query = parse_query(&["--from", "2024-06-01", "beach", "day", "--to", "2024-06-30"])
            .unwrap();
        assert_eq!(
            query,
            EntryQuery {
                search: Some("beach day".to_string()),
                start_date: Some("2024-06-01".to_string()),
                end_date: Some("2024-06-30".to_string()),
            }
        );

        assert_eq!(parse_query(&[]).unwrap(), EntryQuery::default());
        assert!(parse_query(&["--to"]).is_err());
    }

    #[tokio::test]
    async fn list_sends_date_filters() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/entries")
                    .query_param("start_date", "2024-06-01");
                then.status(200).json_body(json!([
                    { "id": "e1", "entry": "Beach day", "created_at": "2024-06-02T08:30:00" }
                ]));
            })
            .await;

        let query = parse_query(&["--from", "2024-06-01"]).unwrap();
        list(&config_for(&server), &query).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_reports_failure() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/entries/e1");
                then.status(500);
            })
            .await;

        assert!(delete(&config_for(&server), "e1").await.is_err());
        mock.assert_async().await;
    }
}
