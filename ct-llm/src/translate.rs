use crate::completion::CompletionClient;
use crate::error::{ClientError, Result};
use crate::types::{CompletionRequest, CompletionResult};

/// Marker the prompt asks the engine to append. Doubling as the stop
/// sequence truncates generation right after the translation and signals
/// completion deterministically.
pub const TRANSLATE_DONE_MARKER: &str = "[TRANSLATE.DONE]";

#[derive(Debug, Clone)]
pub struct TranslateRequest {
    pub text: String,
    pub target_lang: String,
    pub temperature: f32,
    pub style: String,
    /// Replaces the built-in prompt template verbatim when set.
    pub override_prompt: Option<String>,
}

impl Default for TranslateRequest {
    fn default() -> Self {
        Self {
            text: String::new(),
            target_lang: String::new(),
            temperature: 1.0,
            style: String::new(),
            override_prompt: None,
        }
    }
}

/// Translation front over [`CompletionClient`]: builds the translation
/// prompt and delegates the exchange.
#[derive(Clone)]
pub struct Translator {
    client: CompletionClient,
}

impl Translator {
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    #[tracing::instrument(level = "info", skip_all)]
    pub async fn translate(&self, request: &TranslateRequest) -> Result<CompletionResult> {
        if request.text.is_empty() {
            return Err(ClientError::InvalidArgument(
                "text must be a non-empty string".to_string(),
            ));
        }
        if request.target_lang.is_empty() {
            return Err(ClientError::InvalidArgument(
                "target language must be a non-empty string".to_string(),
            ));
        }

        tracing::debug!(
            target_lang = %request.target_lang,
            style = %request.style,
            "translating"
        );

        let user_prompt = match &request.override_prompt {
            Some(prompt) => prompt.clone(),
            None => build_prompt(&request.text, &request.target_lang, &request.style),
        };

        self.client
            .complete(&CompletionRequest {
                system_prompt: String::new(),
                user_prompt,
                temperature: request.temperature,
                stop: Some(TRANSLATE_DONE_MARKER.to_string()),
            })
            .await
    }
}

fn build_prompt(text: &str, target_lang: &str, style: &str) -> String {
    format!(
        "You are a great translator and a native {target_lang} speaker.\n\
         The following is a part of the {style} text. Please translate the following text to {target_lang} for the {style} text. Insert {TRANSLATE_DONE_MARKER} at the end\n\
         \n\
         Text\n\
         ----------\n\
         {text}\n\
         ---------\n\
         \n\
         Translated text\n\
         ---------"
    )
}
