use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestMessageContentPartImageArgs,
        ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse, ImageUrlArgs,
    },
    Client,
};

use crate::{
    config::{parse_vision_provider_model, VisionConfig},
    error::{AuraError, Result},
    vision::prompts,
};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";

#[derive(Debug, Clone)]
struct ApiConfig {
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout_secs: u64,
    max_retries: u32,
    max_tokens: u32,
}

/// OpenAI-compatible chat client specialized for image description.
#[derive(Clone)]
pub struct VisionApiClient {
    client: Client<OpenAIConfig>,
    config: ApiConfig,
}

impl VisionApiClient {
    pub fn new(config: &VisionConfig) -> Result<Self> {
        let api_config = ApiConfig::from_vision_config(config);

        let (provider, _) = parse_vision_provider_model(&config.model);
        let needs_api_key = !matches!(
            provider.to_lowercase().as_str(),
            "ollama" | "local" | "lmstudio"
        );

        if needs_api_key && api_config.api_key.is_none() {
            return Err(AuraError::Vision(
                "API key required for this provider".to_string(),
            ));
        }

        let openai_config = OpenAIConfig::new()
            .with_api_base(api_config.base_url.clone())
            .with_api_key(api_config.api_key.clone().unwrap_or_default());

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api_config.timeout_secs))
            .build()
            .map_err(|error| {
                AuraError::Vision(format!("Failed to create vision HTTP client: {error}"))
            })?;

        // Cap async-openai's internal backoff at our timeout, otherwise it
        // retries server errors with its own 15-minute default ceiling on
        // top of the retry loop in describe().
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(api_config.timeout_secs)),
            ..Default::default()
        };

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(backoff);

        Ok(Self {
            client,
            config: api_config,
        })
    }

    /// One describe call: image plus prompt, language-conditioned system
    /// instruction. Transient failures are retried with exponential delay
    /// up to the configured attempt count.
    pub async fn describe(
        &self,
        image_base64: &str,
        prompt: &str,
        language: &str,
    ) -> Result<String> {
        if image_base64.trim().is_empty() {
            return Err(AuraError::Validation("Image cannot be empty".to_string()));
        }

        let mut last_error: Option<AuraError> = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay_ms = 100 * 2_u64.pow(attempt - 1);
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }

            let request = self.build_request(image_base64, prompt, language)?;

            match self.client.chat().create(request).await {
                Ok(response) => return Self::extract_content(response),
                Err(error) => {
                    if let Some(rate_limit_error) = Self::rate_limit_error(&error) {
                        return Err(rate_limit_error);
                    }

                    if let Some(auth_error) = Self::auth_error(&error) {
                        return Err(auth_error);
                    }

                    let retryable = Self::is_retryable(&error);
                    let mapped_error = Self::map_openai_error(error);

                    if retryable && attempt < self.config.max_retries {
                        last_error = Some(mapped_error);
                        continue;
                    }

                    return Err(mapped_error);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| AuraError::Vision("Describe call failed after retries".to_string())))
    }

    fn build_request(
        &self,
        image_base64: &str,
        prompt: &str,
        language: &str,
    ) -> Result<CreateChatCompletionRequest> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(prompts::system_instruction(language))
            .build()
            .map_err(|error| AuraError::Validation(format!("Invalid system prompt: {error}")))?;

        let prompt = if prompt.trim().is_empty() {
            prompts::DEFAULT_PROMPT
        } else {
            prompt
        };

        let text_part = ChatCompletionRequestMessageContentPartTextArgs::default()
            .text(prompt)
            .build()
            .map_err(|error| AuraError::Validation(format!("Invalid prompt: {error}")))?;

        let image_part = ChatCompletionRequestMessageContentPartImageArgs::default()
            .image_url(
                ImageUrlArgs::default()
                    .url(image_data_url(image_base64))
                    .build()
                    .map_err(|error| {
                        AuraError::Validation(format!("Invalid image payload: {error}"))
                    })?,
            )
            .build()
            .map_err(|error| AuraError::Validation(format!("Invalid image payload: {error}")))?;

        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Array(vec![
                text_part.into(),
                image_part.into(),
            ]))
            .build()
            .map_err(|error| AuraError::Validation(format!("Invalid user message: {error}")))?;

        CreateChatCompletionRequestArgs::default()
            .model(self.config.model.clone())
            .messages(vec![system.into(), user.into()])
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(|error| AuraError::Validation(format!("Invalid describe request: {error}")))
    }

    fn extract_content(response: CreateChatCompletionResponse) -> Result<String> {
        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AuraError::Vision("Vision response contained no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        if message.trim().is_empty() {
            return Err(AuraError::Vision(
                "Vision response contained empty content".to_string(),
            ));
        }

        Ok(message)
    }

    fn is_retryable(error: &OpenAIError) -> bool {
        match error {
            OpenAIError::ApiError(api_error) => {
                api_error.r#type.is_none() && api_error.code.is_none()
            }
            OpenAIError::Reqwest(reqwest_error) => reqwest_error
                .status()
                .map(|status| status.is_server_error())
                .unwrap_or(true),
            _ => false,
        }
    }

    fn rate_limit_error(error: &OpenAIError) -> Option<AuraError> {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) =>
            {
                Some(AuraError::VisionRateLimit { retry_after: None })
            }
            OpenAIError::ApiError(api_error) if Self::is_rate_limit_api_error(api_error) => {
                Some(AuraError::VisionRateLimit { retry_after: None })
            }
            _ => None,
        }
    }

    fn auth_error(error: &OpenAIError) -> Option<AuraError> {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::UNAUTHORIZED)
                    || reqwest_error.status() == Some(reqwest::StatusCode::FORBIDDEN) =>
            {
                Some(AuraError::Vision(format!(
                    "Vision authentication failed: {reqwest_error}"
                )))
            }
            OpenAIError::ApiError(api_error) if Self::is_auth_api_error(api_error) => Some(
                AuraError::Vision(format!("Vision authentication failed: {api_error}")),
            ),
            _ => None,
        }
    }

    fn is_rate_limit_api_error(api_error: &ApiError) -> bool {
        let message = api_error.message.to_lowercase();
        let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
        let code = api_error.code.clone().unwrap_or_default().to_lowercase();

        message.contains("rate limit")
            || message.contains("too many requests")
            || error_type.contains("rate_limit")
            || code.contains("rate_limit")
            || code == "insufficient_quota"
    }

    fn is_auth_api_error(api_error: &ApiError) -> bool {
        let message = api_error.message.to_lowercase();
        let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
        let code = api_error.code.clone().unwrap_or_default().to_lowercase();

        message.contains("unauthorized")
            || message.contains("forbidden")
            || message.contains("invalid api key")
            || code.contains("invalid_api_key")
            || code.contains("authentication")
            || error_type.contains("authentication")
    }

    fn map_openai_error(error: OpenAIError) -> AuraError {
        match error {
            OpenAIError::Reqwest(reqwest_error) => {
                AuraError::Vision(format!("Vision request failed: {reqwest_error}"))
            }
            OpenAIError::ApiError(api_error) => {
                AuraError::Vision(format!("Vision API error: {api_error}"))
            }
            OpenAIError::JSONDeserialize(err) => {
                AuraError::Vision(format!("Failed to parse vision response: {err}"))
            }
            OpenAIError::InvalidArgument(message) => AuraError::Validation(message),
            other => AuraError::Vision(other.to_string()),
        }
    }
}

/// Clients may send a full data URL or bare base64; the wire format always
/// carries a data URL.
fn image_data_url(image_base64: &str) -> String {
    if image_base64.starts_with("data:") {
        image_base64.to_string()
    } else {
        format!("data:image/jpeg;base64,{image_base64}")
    }
}

impl ApiConfig {
    fn from_vision_config(config: &VisionConfig) -> Self {
        let (provider, model) = parse_vision_provider_model(&config.model);

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(provider).to_string());

        let normalized_model = if provider.eq_ignore_ascii_case("local") {
            config.model.clone()
        } else {
            model.to_string()
        };

        Self {
            base_url,
            api_key: config.api_key.clone(),
            model: normalized_model,
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
            max_tokens: config.max_tokens,
        }
    }
}

fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openai" => OPENAI_BASE_URL,
        "openrouter" => OPENROUTER_BASE_URL,
        "ollama" => OLLAMA_BASE_URL,
        "lmstudio" => LMSTUDIO_BASE_URL,
        _ => OPENAI_BASE_URL,
    }
}
