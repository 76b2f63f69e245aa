//! Score API client
//!
//! Three JSON endpoints on the score server. Requests are dispatched
//! without blocking the frame loop and responses are applied whenever they
//! arrive; a failed request is logged and the display stays stale.

use serde::{Deserialize, Serialize};

/// `GET /highscore` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighscoreResponse {
    pub highscore: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub score: u32,
}

/// `GET /leaderboard` response (descending, at most 10 entries)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// `POST /highscore` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitScoreRequest {
    pub highscore: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitScoreResponse {
    pub success: bool,
}

#[cfg(target_arch = "wasm32")]
mod fetch {
    use super::*;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, Response};

    /// Current highscore as the server knows it (0 when the table is empty)
    pub async fn fetch_highscore() -> Result<u32, JsValue> {
        let body = request_text("/highscore", None).await?;
        let parsed: HighscoreResponse = parse_json(&body)?;
        Ok(parsed.highscore)
    }

    /// Top scores, descending
    pub async fn fetch_leaderboard() -> Result<Vec<u32>, JsValue> {
        let body = request_text("/leaderboard", None).await?;
        let parsed: LeaderboardResponse = parse_json(&body)?;
        Ok(parsed.leaderboard.into_iter().map(|e| e.score).collect())
    }

    /// Append a finished run's score
    pub async fn submit_score(score: u32) -> Result<(), JsValue> {
        let payload = serde_json::to_string(&SubmitScoreRequest { highscore: score })
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let body = request_text("/highscore", Some(payload)).await?;
        let parsed: SubmitScoreResponse = parse_json(&body)?;
        if parsed.success {
            Ok(())
        } else {
            Err(JsValue::from_str("server rejected score"))
        }
    }

    fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, JsValue> {
        serde_json::from_str(body)
            .map_err(|e| JsValue::from_str(&format!("bad response body: {e}")))
    }

    async fn request_text(url: &str, post_json: Option<String>) -> Result<String, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        let opts = RequestInit::new();
        let is_post = post_json.is_some();
        if let Some(json) = post_json {
            opts.set_method("POST");
            opts.set_body(&JsValue::from_str(&json));
        }
        let request = Request::new_with_str_and_init(url, &opts)?;
        if is_post {
            request.headers().set("Content-Type", "application/json")?;
        }

        let resp: Response = JsFuture::from(window.fetch_with_request(&request))
            .await?
            .dyn_into()?;
        if !resp.ok() {
            return Err(JsValue::from_str(&format!(
                "{url}: http {}",
                resp.status()
            )));
        }
        let text = JsFuture::from(resp.text()?).await?;
        text.as_string()
            .ok_or_else(|| JsValue::from_str("non-text response body"))
    }
}

#[cfg(target_arch = "wasm32")]
pub use fetch::{fetch_highscore, fetch_leaderboard, submit_score};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_matches_server() {
        let parsed: HighscoreResponse = serde_json::from_str(r#"{"highscore":150}"#).unwrap();
        assert_eq!(parsed.highscore, 150);

        let parsed: LeaderboardResponse =
            serde_json::from_str(r#"{"leaderboard":[{"score":20},{"score":5}]}"#).unwrap();
        let scores: Vec<u32> = parsed.leaderboard.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![20, 5]);

        let body = serde_json::to_string(&SubmitScoreRequest { highscore: 150 }).unwrap();
        assert_eq!(body, r#"{"highscore":150}"#);

        let parsed: SubmitScoreResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(parsed.success);
    }
}
