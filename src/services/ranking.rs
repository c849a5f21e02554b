use crate::constants::{RANKING_MAX_TOKENS, RANKING_TEMPERATURE};
use crate::error::{AppError, Result};
use crate::models::{Candidate, PreferenceSpec};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::LazyLock;
use std::time::Duration;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

static REPLY_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\w\-]+").unwrap());

/// An external model that proposes which candidates to recommend.
#[async_trait]
pub trait RankingAssist: Send + Sync {
    /// Returns up to `limit` candidate ids, best first
    async fn rank(
        &self,
        candidates: &[Candidate],
        prefs: &PreferenceSpec,
        limit: usize,
    ) -> Result<Vec<String>>;
}

/// Ranking assist backed by an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct OpenAiRankingClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiRankingClient {
    pub fn new(api_key: String, model: String, timeout_secs: u64) -> Self {
        Self::with_config(api_key, model, OPENAI_BASE_URL.to_string(), timeout_secs)
    }

    pub fn with_config(api_key: String, model: String, base_url: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        OpenAiRankingClient {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RankingAssist for OpenAiRankingClient {
    async fn rank(
        &self,
        candidates: &[Candidate],
        prefs: &PreferenceSpec,
        limit: usize,
    ) -> Result<Vec<String>> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::ProviderUnavailable(
                "OpenAI API key not configured".to_string(),
            ));
        }
        if candidates.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_prompt(candidates, prefs, limit),
            }],
            temperature: RANKING_TEMPERATURE,
            max_tokens: RANKING_MAX_TOKENS,
        };

        tracing::debug!(
            model = %self.model,
            candidates = candidates.len(),
            limit,
            "Ranking request: {} candidates, limit {}",
            candidates.len(), limit
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::RankingAssist(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::RankingAssist(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::RankingAssist(format!("Failed to parse response: {}", e)))?;

        let reply = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::RankingAssist("Response had no choices".to_string()))?;

        let ids = parse_assist_reply(&reply, candidates, limit)?;
        tracing::info!(
            selected = ids.len(),
            "Ranking assist picked {} candidates",
            ids.len()
        );
        Ok(ids)
    }
}

fn build_prompt(candidates: &[Candidate], prefs: &PreferenceSpec, limit: usize) -> String {
    let foods: Vec<&str> = prefs.foods.iter().map(|f| f.display_name()).collect();
    let cultures: Vec<&str> = prefs.cultures.iter().map(|c| c.display_name()).collect();
    let party = prefs
        .party_size
        .map(|n| format!("{}명", n))
        .unwrap_or_else(|| "미정".to_string());

    let mut prompt = format!(
        "다음 장소들 중에서 사용자 상황에 맞는 최적의 {}개 장소를 선택해주세요.\n\n",
        limit
    );
    prompt.push_str("사용자 정보:\n");
    let _ = writeln!(prompt, "- 인원수: {}", party);
    let _ = writeln!(prompt, "- 교통수단: {}", prefs.transport.display_name());
    let _ = writeln!(prompt, "- 음식 타입: {}", foods.join(", "));
    let _ = writeln!(prompt, "- 문화 타입: {}\n", cultures.join(", "));
    prompt.push_str("선택 기준:\n");
    prompt.push_str("1. 평점이 높은 장소 우선\n");
    prompt.push_str("2. 사용자 인원수에 적합한 장소\n");
    prompt.push_str("3. 교통수단을 고려한 접근성\n");
    prompt.push_str("4. 음식점과 문화시설의 균형잡힌 선택\n");
    prompt.push_str("5. 장소 유형의 다양성\n\n");
    prompt.push_str("장소 목록:\n");

    for (i, c) in candidates.iter().enumerate() {
        let rating = c
            .rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            prompt,
            "{}. {} (평점: {}, 카테고리: {}, 주소: {})",
            i + 1,
            c.name,
            rating,
            c.category,
            c.address
        );
    }

    prompt.push_str("\n응답 형식: 선택한 장소의 번호만 쉼표로 구분하여 답변해주세요. (예: 1,3,5)");
    prompt
}

/// Extract candidate ids from a free-form model reply.
///
/// A token counts if it equals a candidate id or is a 1-based index into
/// `candidates`. Ids come out in order of first appearance, deduplicated and
/// capped at `limit`. A reply with no usable token at all is an error.
pub fn parse_assist_reply(
    reply: &str,
    candidates: &[Candidate],
    limit: usize,
) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for token in REPLY_TOKEN.find_iter(reply).map(|m| m.as_str()) {
        let id = if let Some(c) = candidates.iter().find(|c| c.id == token) {
            Some(c.id.as_str())
        } else {
            token
                .parse::<usize>()
                .ok()
                .filter(|&n| n >= 1 && n <= candidates.len())
                .map(|n| candidates[n - 1].id.as_str())
        };

        if let Some(id) = id {
            if seen.insert(id) {
                ids.push(id.to_string());
            }
        }
    }

    if ids.is_empty() {
        return Err(AppError::AssistParse(format!(
            "No candidate reference in reply: {:?}",
            reply
        )));
    }

    ids.truncate(limit);
    Ok(ids)
}

// Chat completions wire types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Category, Coordinates, CulturePreference, FoodPreference, TransportMode,
    };
    use time::macros::date;

    fn pool() -> Vec<Candidate> {
        let at = Coordinates::new(37.39, 126.95).unwrap();
        vec![
            Candidate::new("ChIJ-aaa", "A", Category::Restaurant, at).with_rating(4.5),
            Candidate::new("ChIJ-bbb", "B", Category::Cafe, at),
            Candidate::new("festival-3", "C", Category::Festival, at).with_rating(5.0),
        ]
    }

    #[test]
    fn test_parse_numbered_reply() {
        let ids = parse_assist_reply("3, 1", &pool(), 4).unwrap();
        assert_eq!(ids, vec!["festival-3", "ChIJ-aaa"]);
    }

    #[test]
    fn test_parse_mixed_ids_and_indices_dedups() {
        let ids = parse_assist_reply("ChIJ-bbb 그리고 2, 1 그리고 1", &pool(), 4).unwrap();
        assert_eq!(ids, vec!["ChIJ-bbb", "ChIJ-aaa"]);
    }

    #[test]
    fn test_parse_respects_limit_and_range() {
        let ids = parse_assist_reply("9, 0, 2, 3, 1", &pool(), 2).unwrap();
        assert_eq!(ids, vec!["ChIJ-bbb", "festival-3"]);
    }

    #[test]
    fn test_parse_rejects_unusable_reply() {
        let err = parse_assist_reply("죄송합니다, 선택할 수 없습니다.", &pool(), 3).unwrap_err();
        assert!(matches!(err, AppError::AssistParse(_)));

        let err = parse_assist_reply("unknown-id, 42", &pool(), 3).unwrap_err();
        assert!(matches!(err, AppError::AssistParse(_)));
    }

    #[test]
    fn test_prompt_lists_numbered_candidates() {
        let prefs = PreferenceSpec::new(
            2,
            vec![FoodPreference::Korean],
            vec![CulturePreference::Movie],
            TransportMode::Walk,
            date!(2025 - 05 - 02),
        )
        .unwrap()
        .with_party_size(3);

        let prompt = build_prompt(&pool(), &prefs, 2);
        assert!(prompt.contains("최적의 2개"));
        assert!(prompt.contains("- 인원수: 3명"));
        assert!(prompt.contains("- 교통수단: 도보"));
        assert!(prompt.contains("1. A (평점: 4.5, 카테고리: RESTAURANT"));
        assert!(prompt.contains("2. B (평점: -,"));
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let client = OpenAiRankingClient::new(String::new(), "gpt-3.5-turbo".to_string(), 5);
        let prefs = PreferenceSpec::new(
            1,
            vec![],
            vec![],
            TransportMode::Public,
            date!(2025 - 05 - 02),
        )
        .unwrap();
        let err = client.rank(&pool(), &prefs, 1).await.unwrap_err();
        assert!(matches!(err, AppError::ProviderUnavailable(_)));
    }
}
