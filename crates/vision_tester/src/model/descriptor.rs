//! Server-advertised models and vision-capability detection

use serde::{Deserialize, Serialize};

/// Name fragments that mark a model as likely to accept image input
pub const VISION_KEYWORDS: [&str; 6] = [
    "llava",
    "bakllava",
    "moondream",
    "vision",
    "clip",
    "multimodal",
];

/// Decides whether a model name looks vision-capable
pub trait VisionPredicate: Send + Sync {
    fn is_vision_capable(&self, model_name: &str) -> bool;
}

/// Case-insensitive substring match against a keyword list
#[derive(Debug, Clone)]
pub struct KeywordPredicate {
    keywords: Vec<String>,
}

impl KeywordPredicate {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }
}

impl Default for KeywordPredicate {
    fn default() -> Self {
        Self::new(VISION_KEYWORDS)
    }
}

impl VisionPredicate for KeywordPredicate {
    fn is_vision_capable(&self, model_name: &str) -> bool {
        let name = model_name.to_lowercase();
        self.keywords.iter().any(|k| name.contains(k.as_str()))
    }
}

impl<F> VisionPredicate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_vision_capable(&self, model_name: &str) -> bool {
        self(model_name)
    }
}

/// A model name plus its derived vision flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,
    pub is_vision_capable: bool,
}

impl ModelDescriptor {
    /// Build a descriptor using the default keyword heuristic
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_predicate(name, &KeywordPredicate::default())
    }

    pub fn with_predicate(name: impl Into<String>, predicate: &dyn VisionPredicate) -> Self {
        let name = name.into();
        let is_vision_capable = predicate.is_vision_capable(&name);
        Self {
            name,
            is_vision_capable,
        }
    }

    /// Name without the `:tag` suffix
    pub fn base_name(&self) -> &str {
        self.name.split(':').next().unwrap_or(&self.name)
    }

    /// The `:tag` suffix, if any (e.g. `7b` for `llava:7b`)
    pub fn tag(&self) -> Option<&str> {
        self.name.split_once(':').map(|(_, tag)| tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_detection() {
        assert!(ModelDescriptor::new("llava:7b").is_vision_capable);
        assert!(ModelDescriptor::new("BakLLaVA").is_vision_capable);
        assert!(ModelDescriptor::new("llama3.2-vision:11b").is_vision_capable);
        assert!(ModelDescriptor::new("moondream").is_vision_capable);
        assert!(!ModelDescriptor::new("mistral").is_vision_capable);
        assert!(!ModelDescriptor::new("qwen2.5:14b").is_vision_capable);
    }

    #[test]
    fn test_name_parts() {
        let model = ModelDescriptor::new("llava:13b-v1.6");
        assert_eq!(model.base_name(), "llava");
        assert_eq!(model.tag(), Some("13b-v1.6"));

        let model = ModelDescriptor::new("mistral");
        assert_eq!(model.base_name(), "mistral");
        assert_eq!(model.tag(), None);
    }

    #[test]
    fn test_custom_predicate() {
        let only_gemma = |name: &str| name.starts_with("gemma3");
        let model = ModelDescriptor::with_predicate("gemma3:4b", &only_gemma);
        assert!(model.is_vision_capable);
        let model = ModelDescriptor::with_predicate("llava", &only_gemma);
        assert!(!model.is_vision_capable);
    }

    #[test]
    fn test_custom_keywords_are_case_insensitive() {
        let predicate = KeywordPredicate::new(["MiniCPM-V"]);
        assert!(predicate.is_vision_capable("minicpm-v:8b"));
    }
}
