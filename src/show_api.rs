use std::time::Duration;

use tracing::{error, info_span, instrument};

use crate::config::FetchConfig;
use crate::model::game::{HistoryDocument, RawGameRecord};

const USER_AGENT: &str = "LigaLegends/1.0 (+https://example.com)";

/// A per-user, per-page source of raw game records. The upstream is treated
/// as unreliable: `None` means "no usable payload for this page", whatever
/// the underlying reason (empty body, transport failure, malformed JSON).
pub trait HistorySource {
    fn fetch_page(&self, username: &str, platform: &str, page: u32) -> Option<Vec<RawGameRecord>>;
}

/// Client for the public game-history endpoint of the show stats API.
#[derive(Debug)]
pub struct ShowApi {
    agent: ureq::Agent,
    api_version: String,
}

impl ShowApi {
    /// Build a client from the configured fetch tuning.
    pub fn new(fetch: &FetchConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(fetch.timeout_seconds)))
            .build()
            .new_agent();
        ShowApi {
            agent,
            api_version: fetch.api_version.clone(),
        }
    }

    fn history_url(&self) -> String {
        format!("https://{}.theshow.com/apis/game_history.json", self.api_version)
    }

    /// Decode one history page body into its record list.
    #[instrument(level = "info", skip(body), fields(bytes = body.len()))]
    fn deserialize_history(body: &str) -> Result<HistoryDocument, serde_json::Error> {
        serde_json::from_str::<HistoryDocument>(body)
    }
}

impl HistorySource for ShowApi {
    fn fetch_page(&self, username: &str, platform: &str, page: u32) -> Option<Vec<RawGameRecord>> {
        let url = self.history_url();
        let response_result = {
            let _span = info_span!("history_fetch", url = %url, username = %username, page).entered();
            self.agent
                .get(&url)
                .query("username", username)
                .query("platform", platform)
                .query("page", &page.to_string())
                .header("User-Agent", USER_AGENT)
                .call()
        };
        match response_result {
            Ok(response) => {
                let mut body_reader = response.into_body();
                match body_reader.read_to_string() {
                    Ok(body) => match Self::deserialize_history(&body) {
                        Ok(doc) if doc.data.is_empty() => None,
                        Ok(doc) => Some(doc.data),
                        Err(e) => {
                            error!(error = %e, username = %username, page, "Failed to deserialize history page");
                            None
                        }
                    },
                    Err(e) => {
                        error!(error = %e, username = %username, page, "Failed to read history response body");
                        None
                    }
                }
            }
            Err(e) => {
                error!(error = %e, url = %url, username = %username, page, "History request failed");
                None
            }
        }
    }
}
