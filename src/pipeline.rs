use rand::Rng;
use log::info;

use crate::config::Config;
use crate::error::Result;
use crate::history::HistoryStore;
use crate::recommend::{self, Recommendation};
use crate::yelp::YelpClient;

/// Authenticate, search, select, persist. History is only written once a pick exists.
pub async fn run<S, R>(
    config: &Config,
    yelp: &YelpClient,
    store: &S,
    rng: &mut R,
) -> Result<Recommendation>
where
    S: HistoryStore + ?Sized,
    R: Rng + ?Sized,
{
    let mut history = store.load()?;

    let bearer_token = yelp.obtain_bearer_token(config).await?;
    let results = yelp.search(&bearer_token, &config.term, config.limit).await?;

    let business = recommend::select(&results, &history, rng)?.clone();
    info!("Selected {}", business.name);

    recommend::record(&mut history, &business.name, config.repeat);
    store.save(&history)?;

    Ok(Recommendation { business })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WetError;
    use crate::history::{FileHistoryStore, MemoryHistoryStore};
    use crate::yelp::{SEARCH_PATH, TOKEN_PATH};
    use mockito::{Matcher, Mock, Server, ServerGuard};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use reqwest::Client;
    use serde_json::json;

    fn config(repeat: usize, limit: usize) -> Config {
        Config {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            term: json!({"term": "restaurants", "location": "Ann Arbor"})
                .as_object()
                .unwrap()
                .clone(),
            repeat,
            limit,
        }
    }

    async fn mock_token(server: &mut ServerGuard) -> Mock {
        server.mock("POST", TOKEN_PATH)
            .with_status(200)
            .with_body(r#"{"access_token": "tok"}"#)
            .create_async()
            .await
    }

    async fn mock_search(server: &mut ServerGuard, names: &[&str]) -> Mock {
        let businesses: Vec<_> = names
            .iter()
            .map(|n| json!({
                "name": n,
                "rating": 4.0,
                "categories": [{"title": "Diner"}],
                "location": {"display_address": ["1 Main St"]}
            }))
            .collect();
        server.mock("GET", SEARCH_PATH)
            .match_header("authorization", "Bearer tok")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({ "businesses": businesses }).to_string())
            .create_async()
            .await
    }

    fn history(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_run_picks_unseen_business_and_records_it() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _search = mock_search(&mut server, &["A", "B", "C"]).await;

        let yelp = YelpClient::new(Client::new(), &server.url()).unwrap();
        let store = MemoryHistoryStore::new(history(&["A"]));
        let mut rng = StdRng::seed_from_u64(42);

        let recommendation = run(&config(2, 10), &yelp, &store, &mut rng).await.unwrap();
        let picked = recommendation.business.name.clone();

        assert!(picked == "B" || picked == "C");
        assert_eq!(store.entries(), vec!["A".to_string(), picked.clone()]);
        assert_eq!(
            recommendation.to_string(),
            format!("I suggest eating a(an) Diner restaurant called {} which has a rating of 4.0/5. The address is 1 Main St", picked)
        );
    }

    #[tokio::test]
    async fn test_repeat_one_alternates_between_two_candidates() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _search = mock_search(&mut server, &["A", "B"]).await;

        let yelp = YelpClient::new(Client::new(), &server.url()).unwrap();
        let store = MemoryHistoryStore::new(history(&["A"]));
        let mut rng = StdRng::seed_from_u64(1);

        let first = run(&config(1, 10), &yelp, &store, &mut rng).await.unwrap();
        assert_eq!(first.business.name, "B");
        assert_eq!(store.entries(), history(&["B"]));

        let second = run(&config(1, 10), &yelp, &store, &mut rng).await.unwrap();
        assert_eq!(second.business.name, "A");
        assert_eq!(store.entries(), history(&["A"]));
    }

    #[tokio::test]
    async fn test_exhausted_candidates_fail_without_saving() {
        let mut server = Server::new_async().await;
        let _token = mock_token(&mut server).await;
        let _search = mock_search(&mut server, &["A", "B"]).await;

        let yelp = YelpClient::new(Client::new(), &server.url()).unwrap();
        let store = MemoryHistoryStore::new(history(&["A", "B"]));
        let mut rng = StdRng::seed_from_u64(3);

        let err = run(&config(5, 10), &yelp, &store, &mut rng).await.unwrap_err();
        assert!(matches!(err, WetError::NoEligibleCandidate(2)));
        assert_eq!(store.save_count(), 0);
        assert_eq!(store.entries(), history(&["A", "B"]));
    }

    #[tokio::test]
    async fn test_unauthorized_token_leaves_history_file_untouched() {
        let mut server = Server::new_async().await;
        let _token = server.mock("POST", TOKEN_PATH)
            .with_status(401)
            .with_body(r#"{"error": "UNAUTHORIZED"}"#)
            .create_async()
            .await;
        let search = server.mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        std::fs::write(&path, r#"["A"]"#).unwrap();

        let yelp = YelpClient::new(Client::new(), &server.url()).unwrap();
        let store = FileHistoryStore::new(&path);
        let mut rng = StdRng::seed_from_u64(9);

        let err = run(&config(2, 10), &yelp, &store, &mut rng).await.unwrap_err();
        assert!(err.to_string().contains("401"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"["A"]"#);
        search.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_history_aborts_before_network() {
        let mut server = Server::new_async().await;
        let token = server.mock("POST", TOKEN_PATH).expect(0).create_async().await;

        let dir = tempfile::tempdir().unwrap();
        let yelp = YelpClient::new(Client::new(), &server.url()).unwrap();
        let store = FileHistoryStore::new(dir.path().join("history"));
        let mut rng = StdRng::seed_from_u64(9);

        let err = run(&config(2, 10), &yelp, &store, &mut rng).await.unwrap_err();
        assert!(matches!(err, WetError::History(_)));
        token.assert_async().await;
    }
}
