//! Trait suggestion service.
//!
//! Wraps a single `OpenAI`-compatible chat-completions endpoint behind
//! four one-shot operations sharing one contract: fixed prompt, strict
//! parse, deterministic fallback on any failure. Callers never see an
//! error; the `success` flag marks degraded output. Every call is
//! attempted exactly once, with no retry and no caching.

use love8_common::{AppError, AppResult, config::SuggestionConfig};
use serde::{Deserialize, Serialize};

/// The always-safe-to-display fallback suggestions.
const FALLBACK_TRAITS: [&str; 5] = ["Creative", "Kind", "Smart", "Funny", "Loyal"];

/// Trait suggestions, possibly degraded to the static fallback.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionOutcome {
    pub success: bool,
    pub traits: Vec<String>,
}

/// A generated trait description, possibly degraded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionOutcome {
    pub success: bool,
    pub description: String,
}

/// A generated share caption, possibly degraded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionOutcome {
    pub success: bool,
    pub caption: String,
}

/// A compatibility analysis between two trait lists, possibly degraded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityOutcome {
    pub success: bool,
    pub score: u8,
    pub commonalities: Vec<String>,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
struct CompatibilityAnalysis {
    score: u8,
    commonalities: Vec<String>,
    reason: String,
}

/// Suggestion service.
#[derive(Clone)]
pub struct SuggestionService {
    config: SuggestionConfig,
    http_client: reqwest::Client,
}

impl SuggestionService {
    /// Create a new suggestion service.
    #[must_use]
    pub fn new(config: SuggestionConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Suggest 5 one-word traits for a profile.
    pub async fn suggest_traits(
        &self,
        bio: Option<&str>,
        existing_words: &[String],
    ) -> SuggestionOutcome {
        let existing = if existing_words.is_empty() {
            "None".to_string()
        } else {
            existing_words.join(", ")
        };

        let prompt = format!(
            "Based on this user profile, suggest 5 unique personality traits that would fit them well.\n\n\
             User Profile:\n\
             - Bio: {}\n\
             - Existing traits: {}\n\n\
             Requirements:\n\
             - Each trait should be ONE WORD only\n\
             - Traits should be positive and meaningful\n\
             - Avoid duplicating existing traits\n\
             - Focus on personality, skills, or character qualities\n\
             - Make them diverse and interesting\n\n\
             Return only a JSON array of trait words, nothing else.\n\
             Example: [\"Creative\", \"Empathetic\", \"Adventurous\", \"Analytical\", \"Optimistic\"]",
            bio.filter(|b| !b.is_empty()).unwrap_or("No bio provided"),
            existing,
        );

        let parsed = match self
            .complete(
                "You are a personality expert who suggests meaningful one-word traits \
                 for social profiles. Always return valid JSON arrays.",
                &prompt,
                100,
                0.7,
            )
            .await
        {
            Ok(raw) => Self::parse_word_list(&raw),
            Err(e) => {
                tracing::warn!(error = %e, "Trait suggestion failed, using fallback");
                None
            }
        };

        parsed.map_or_else(
            || SuggestionOutcome {
                success: false,
                traits: FALLBACK_TRAITS.iter().map(ToString::to_string).collect(),
            },
            |traits| SuggestionOutcome {
                success: true,
                traits,
            },
        )
    }

    /// Generate a short description for a trait word.
    pub async fn describe_trait(&self, word: &str, context: Option<&str>) -> DescriptionOutcome {
        let context_line = context
            .filter(|c| !c.is_empty())
            .map(|c| format!("Context: {c}\n"))
            .unwrap_or_default();

        let prompt = format!(
            "Create a short, engaging description (max 20 words) for the personality trait \"{word}\".\n\
             {context_line}\n\
             Make it:\n\
             - Personal and relatable\n\
             - Positive and inspiring\n\
             - Something that would make someone proud to have this trait\n\n\
             Return only the description text, no quotes or extra formatting."
        );

        match self
            .complete(
                "You are a creative writer who crafts inspiring personality trait descriptions.",
                &prompt,
                50,
                0.8,
            )
            .await
        {
            Ok(description) if !description.is_empty() => DescriptionOutcome {
                success: true,
                description,
            },
            Ok(_) | Err(_) => DescriptionOutcome {
                success: false,
                description: format!("Someone who embodies {word} in everything they do."),
            },
        }
    }

    /// Generate a shareable social caption for a trait.
    pub async fn share_caption(&self, word: &str, user_name: &str) -> CaptionOutcome {
        let prompt = format!(
            "Create an engaging social media caption for sharing a personality trait.\n\n\
             Details:\n\
             - Trait: {word}\n\
             - User: {user_name}\n\n\
             Make it:\n\
             - Fun and shareable\n\
             - Include relevant emojis\n\
             - Encourage engagement\n\
             - Keep it under 100 characters\n\
             - Include #Love8 hashtag\n\n\
             Return only the caption text."
        );

        match self
            .complete(
                "You are a social media expert who creates viral, engaging captions.",
                &prompt,
                60,
                0.9,
            )
            .await
        {
            Ok(caption) if !caption.is_empty() => CaptionOutcome {
                success: true,
                caption,
            },
            Ok(_) | Err(_) => CaptionOutcome {
                success: false,
                caption: format!(
                    "Just got called {word} on Love8! \u{2728} What trait defines you? #Love8"
                ),
            },
        }
    }

    /// Score the compatibility between two trait lists (0-100) with a
    /// free-text rationale.
    pub async fn compatibility(
        &self,
        traits_a: &[String],
        traits_b: &[String],
    ) -> CompatibilityOutcome {
        let prompt = format!(
            "Analyze the compatibility between two people based on their personality traits.\n\n\
             Person 1 traits: {}\n\
             Person 2 traits: {}\n\n\
             Provide:\n\
             1. Compatibility score (0-100)\n\
             2. Shared traits or complementary qualities\n\
             3. One sentence explaining why they'd be great besties\n\n\
             Return as JSON:\n\
             {{\n\
               \"score\": 85,\n\
               \"commonalities\": [\"Both are creative\", \"Complementary social styles\"],\n\
               \"reason\": \"Your creative energies and balanced social styles make you perfect adventure partners!\"\n\
             }}",
            traits_a.join(", "),
            traits_b.join(", "),
        );

        let parsed = match self
            .complete(
                "You are a relationship compatibility expert who analyzes personality matches.",
                &prompt,
                150,
                0.6,
            )
            .await
        {
            Ok(raw) => Self::parse_compatibility(&raw),
            Err(e) => {
                tracing::warn!(error = %e, "Compatibility analysis failed, using fallback");
                None
            }
        };

        parsed.map_or_else(
            || CompatibilityOutcome {
                success: false,
                score: 75,
                commonalities: vec!["Great personalities".to_string()],
                reason: "You both have amazing traits that complement each other perfectly!"
                    .to_string(),
            },
            |analysis| CompatibilityOutcome {
                success: true,
                score: analysis.score,
                commonalities: analysis.commonalities,
                reason: analysis.reason,
            },
        )
    }

    /// Parse a completion strictly as a non-empty JSON array of strings.
    fn parse_word_list(raw: &str) -> Option<Vec<String>> {
        serde_json::from_str::<Vec<String>>(raw.trim())
            .ok()
            .filter(|words| !words.is_empty())
    }

    /// Parse a completion strictly as a compatibility object.
    fn parse_compatibility(raw: &str) -> Option<CompatibilityAnalysis> {
        serde_json::from_str::<CompatibilityAnalysis>(raw.trim())
            .ok()
            .filter(|analysis| analysis.score <= 100)
    }

    /// Perform one chat-completions round-trip.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> AppResult<String> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| AppError::BadRequest("Suggestion API key not configured".to_string()))?;

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ],
            "max_tokens": max_tokens,
            "temperature": temperature,
        });

        let response = self
            .http_client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Completion request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Completion API error: {status} - {body}"
            )));
        }

        #[derive(Deserialize)]
        struct CompletionResponse {
            choices: Vec<CompletionChoice>,
        }

        #[derive(Deserialize)]
        struct CompletionChoice {
            message: CompletionMessage,
        }

        #[derive(Deserialize)]
        struct CompletionMessage {
            content: String,
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse completion response: {e}"))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ExternalService("No completion returned".to_string()))?
            .message
            .content
            .trim()
            .to_string();

        Ok(content)
    }
}
