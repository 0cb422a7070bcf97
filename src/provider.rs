//! Concept providers
//!
//! A [`ConceptProvider`] turns a category name into design concepts. The
//! remote provider asks a chat-completion endpoint for them and degrades to
//! the fixed [`fallback_concepts`] on any failure; it never returns an error
//! to its caller.

use crate::concept::{ColorScheme, DesignConcept, Typography};
use crate::{Error, Result};
use async_trait::async_trait;

/// Number of concepts requested per run
pub const CONCEPT_COUNT: usize = 5;

/// Source of design concepts (allows mocking in tests)
#[async_trait]
pub trait ConceptProvider: Send + Sync {
    /// Concepts for `category`; at most [`CONCEPT_COUNT`], never an error.
    async fn get_concepts(&self, category: &str) -> Vec<DesignConcept>;
}

/// Always answers with the fixed fallback sequence
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackConceptProvider;

#[async_trait]
impl ConceptProvider for FallbackConceptProvider {
    async fn get_concepts(&self, _category: &str) -> Vec<DesignConcept> {
        fallback_concepts()
    }
}

/// The five canned concepts used when remote generation is unavailable:
/// modern, elegant, professional, achievement and vintage.
pub fn fallback_concepts() -> Vec<DesignConcept> {
    fn concept(
        primary: &str,
        secondary: &str,
        style: &str,
        elements: &[&str],
        title: &str,
        body: &str,
        effects: &[&str],
    ) -> DesignConcept {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        DesignConcept {
            color_scheme: Some(ColorScheme {
                primary: Some(primary.into()),
                secondary: Some(secondary.into()),
            }),
            design_style: Some(style.into()),
            visual_elements: Some(strings(elements)),
            typography: Some(Typography {
                title: Some(title.into()),
                body: Some(body.into()),
            }),
            special_effects: Some(strings(effects)),
        }
    }

    vec![
        concept(
            "#3498db",
            "#2980b9",
            "modern",
            &["geometric patterns", "badge icon"],
            "bold 36px Arial",
            "18px Arial",
            &["gradient background"],
        ),
        concept(
            "#e74c3c",
            "#c0392b",
            "elegant",
            &["border", "ribbon icon"],
            "italic 36px Georgia",
            "18px Garamond",
            &["texture"],
        ),
        concept(
            "#2ecc71",
            "#27ae60",
            "professional",
            &["seal icon"],
            "bold 32px Times New Roman",
            "16px Times New Roman",
            &[],
        ),
        concept(
            "#f39c12",
            "#d35400",
            "achievement",
            &["medal icon"],
            "bold 40px Impact",
            "20px Arial",
            &["gradient background"],
        ),
        concept(
            "#9b59b6",
            "#8e44ad",
            "vintage",
            &["border", "pattern"],
            "36px \"Courier New\"",
            "18px \"Courier New\"",
            &["texture"],
        ),
    ]
}

/// Prompt asking for [`CONCEPT_COUNT`] concepts as a JSON array.
pub fn build_prompt(category: &str) -> String {
    format!(
        r#"Generate {count} different certificate design concepts for the category: "{category}".
For each concept, provide:
1. A color scheme (primary and secondary colors)
2. A design style (e.g., modern, elegant, playful, professional, vintage, achievement)
3. Key visual elements to include (e.g., icons, borders, patterns)
4. Suggested typography (font styles for title and body text)
5. Any special effects (e.g., gradients, shadows, textures)

Return the response as a JSON array of objects with these properties:
- colorScheme: {{primary: string, secondary: string}}
- designStyle: string
- visualElements: string[]
- typography: {{title: string, body: string}}
- specialEffects: string[]"#,
        count = CONCEPT_COUNT,
        category = category,
    )
}

/// Parse message content into concepts.
///
/// The content must be a JSON array of 1 to [`CONCEPT_COUNT`] concept
/// objects; `null` entries become empty concepts. Anything else is a
/// [`Error::ConceptGeneration`].
pub fn parse_concepts(content: &str) -> Result<Vec<DesignConcept>> {
    let raw: Vec<Option<DesignConcept>> = serde_json::from_str(content.trim())?;
    if raw.is_empty() || raw.len() > CONCEPT_COUNT {
        return Err(Error::ConceptGeneration(format!(
            "expected 1 to {} concepts, got {}",
            CONCEPT_COUNT,
            raw.len()
        )));
    }
    Ok(raw.into_iter().map(Option::unwrap_or_default).collect())
}

#[cfg(feature = "remote")]
pub use remote::RemoteConceptProvider;

#[cfg(feature = "remote")]
mod remote {
    use super::{build_prompt, fallback_concepts, parse_concepts, ConceptProvider};
    use crate::concept::DesignConcept;
    use crate::{Error, GeneratorConfig, Result};
    use async_trait::async_trait;
    use log::{debug, warn};
    use reqwest::Client;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Serialize)]
    struct ChatRequest<'a> {
        model: &'a str,
        messages: Vec<ChatMessage<'a>>,
        temperature: f32,
    }

    #[derive(Serialize)]
    struct ChatMessage<'a> {
        role: &'a str,
        content: String,
    }

    #[derive(Deserialize)]
    struct ChatResponse {
        #[serde(default)]
        choices: Vec<Choice>,
    }

    #[derive(Deserialize)]
    struct Choice {
        message: Option<ChoiceMessage>,
    }

    #[derive(Deserialize)]
    struct ChoiceMessage {
        content: Option<String>,
    }

    /// Asks a chat-completion endpoint for concepts, one attempt per call.
    pub struct RemoteConceptProvider {
        client: Client,
        endpoint: String,
        api_key: Option<String>,
        model: String,
        temperature: f32,
    }

    impl RemoteConceptProvider {
        pub fn new(config: &GeneratorConfig) -> Result<Self> {
            let mut builder = Client::builder();
            if let Some(ms) = config.timeout_ms {
                builder = builder.timeout(Duration::from_millis(ms));
            }
            let client = builder
                .build()
                .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

            Ok(Self {
                client,
                endpoint: config.endpoint.clone(),
                api_key: config.api_key.clone(),
                model: config.model.clone(),
                temperature: config.temperature,
            })
        }

        /// Perform the remote request without falling back.
        pub async fn request_concepts(&self, category: &str) -> Result<Vec<DesignConcept>> {
            let body = ChatRequest {
                model: &self.model,
                messages: vec![ChatMessage {
                    role: "user",
                    content: build_prompt(category),
                }],
                temperature: self.temperature,
            };

            let mut request = self.client.post(&self.endpoint).json(&body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            debug!("requesting concepts for {:?} from {}", category, self.endpoint);
            let response = request.send().await?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(Error::ConceptGeneration(format!("HTTP {}: {}", status, text.trim())));
            }

            let data: ChatResponse = response
                .json()
                .await
                .map_err(|e| Error::ConceptGeneration(format!("malformed response: {}", e)))?;

            let content = data
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message)
                .and_then(|m| m.content)
                .ok_or_else(|| Error::ConceptGeneration("response has no message content".into()))?;

            parse_concepts(&content).inspect_err(|_| warn!("failed to parse concept content: {}", content))
        }
    }

    #[async_trait]
    impl ConceptProvider for RemoteConceptProvider {
        async fn get_concepts(&self, category: &str) -> Vec<DesignConcept> {
            match self.request_concepts(category).await {
                Ok(concepts) => concepts,
                Err(e) => {
                    warn!("concept generation failed, using fallback designs: {}", e);
                    fallback_concepts()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_has_five_distinct_styles() {
        let concepts = fallback_concepts();
        assert_eq!(concepts.len(), CONCEPT_COUNT);
        let styles: Vec<_> = concepts.iter().map(|c| c.style()).collect();
        assert_eq!(styles, vec!["modern", "elegant", "professional", "achievement", "vintage"]);
        assert_eq!(concepts[2].special_effects.as_deref(), Some(&[][..]));
        assert_eq!(concepts[4].title_font(), Some("36px \"Courier New\""));
    }

    #[test]
    fn prompt_mentions_category_and_shape() {
        let p = build_prompt("Best Mentor");
        assert!(p.contains("category: \"Best Mentor\""));
        assert!(p.contains("Generate 5 different certificate design concepts"));
        assert!(p.contains("colorScheme: {primary: string, secondary: string}"));
        assert!(p.contains("specialEffects: string[]"));
    }

    #[test]
    fn parse_accepts_short_lists_and_nulls() {
        let concepts = parse_concepts(r#"[{"designStyle":"modern"}, null, {}]"#).unwrap();
        assert_eq!(concepts.len(), 3);
        assert_eq!(concepts[0].style(), "modern");
        assert!(concepts[1].is_empty());
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        assert!(parse_concepts("not json").is_err());
        assert!(parse_concepts("[]").is_err());
        assert!(parse_concepts(r#"{"designStyle":"modern"}"#).is_err());
        assert!(parse_concepts(r#"[{"visualElements":"border"}]"#).is_err());
        assert!(parse_concepts("[{},{},{},{},{},{}]").is_err());
    }

    #[tokio::test]
    async fn fallback_provider_ignores_category() {
        let a = FallbackConceptProvider.get_concepts("A").await;
        let b = FallbackConceptProvider.get_concepts("B").await;
        assert_eq!(a, b);
    }
}
