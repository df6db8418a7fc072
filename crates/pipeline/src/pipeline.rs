//! Answer pipeline orchestration.
//!
//! Wires the adapters into a strictly sequential chain:
//! embed the active query, retrieve excerpts, render and run the primary
//! generator, inspect the reply for the no-answer sentinel, and either
//! return the grounded answer with citations or render and run the fallback
//! generator over the bare query.
//!
//! The pipeline holds only immutable configuration and `Arc`'d adapters, so
//! concurrent invocations share no mutable state. Adapter failures are never
//! retried here; each one terminates the current request. The whole chain is
//! cancelable as a unit through a `CancellationToken`.

use crate::history::window_history;
use crate::types::{strip_newlines, PipelineResult, Stage, NO_ANSWER_SENTINEL};
use docchat_core::{AppConfig, AppError, AppResult, GeneratorConfig};
use docchat_llm::{create_generator, GenerationRequest, Generator};
use docchat_prompt::{PromptMessage, PromptRenderer};
use docchat_retrieval::{citation_titles, create_embedder, Embedder, Excerpt, LanceIndex, Retriever};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Immutable pipeline settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Number of most recent user turns in the prompt window (query included)
    pub history_max_length: usize,

    /// Number of excerpts retrieved per query
    pub top_k: usize,
}

impl PipelineSettings {
    /// Validate settings; both bounds fail fast at startup, never per call.
    fn validate(&self) -> AppResult<()> {
        if self.history_max_length == 0 {
            return Err(AppError::Config(
                "history_max_length must be at least 1".to_string(),
            ));
        }
        if self.top_k == 0 {
            return Err(AppError::Config("top_k must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// One generation backend instance together with its request parameters.
#[derive(Clone)]
pub struct GeneratorHandle {
    client: Arc<dyn Generator>,
    config: GeneratorConfig,
}

impl GeneratorHandle {
    pub fn new(client: Arc<dyn Generator>, config: GeneratorConfig) -> Self {
        Self { client, config }
    }

    /// Run one generation call for a rendered prompt.
    async fn generate(&self, prompt: &PromptMessage) -> AppResult<String> {
        let mut request = GenerationRequest::new(prompt.text.clone(), self.config.model.clone());
        if let Some(temperature) = self.config.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let response = self.client.generate(&request).await?;
        Ok(response.content)
    }
}

/// The answer pipeline: adapters plus immutable settings, constructed once
/// at startup and shared across requests.
pub struct AnswerPipeline {
    embedder: Arc<dyn Embedder>,
    retriever: Arc<dyn Retriever>,
    primary: GeneratorHandle,
    fallback: GeneratorHandle,
    renderer: PromptRenderer,
    settings: PipelineSettings,
}

impl AnswerPipeline {
    /// Build a pipeline from explicit adapters.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        retriever: Arc<dyn Retriever>,
        primary: GeneratorHandle,
        fallback: GeneratorHandle,
        renderer: PromptRenderer,
        settings: PipelineSettings,
    ) -> AppResult<Self> {
        settings.validate()?;

        Ok(Self {
            embedder,
            retriever,
            primary,
            fallback,
            renderer,
            settings,
        })
    }

    /// Build a pipeline from validated application configuration.
    ///
    /// Opens the pre-built retrieval index and constructs every backend
    /// eagerly; any problem here is a startup failure.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;

        let api_key = AppConfig::resolve_api_key(&config.embedding.api_key_env)?;
        let embedder = create_embedder(&config.embedding, api_key.as_deref())?;

        let index = LanceIndex::open(
            &config.retrieval.index_path,
            &config.retrieval.table,
            config.embedding.dimensions,
        )
        .await?;

        let primary = GeneratorHandle::new(
            create_generator(&config.generation.primary)?,
            config.generation.primary.clone(),
        );
        let fallback = GeneratorHandle::new(
            create_generator(&config.generation.fallback)?,
            config.generation.fallback.clone(),
        );

        Self::new(
            embedder,
            Arc::new(index),
            primary,
            fallback,
            PromptRenderer::new()?,
            PipelineSettings {
                history_max_length: config.history_max_length,
                top_k: config.retrieval.top_k,
            },
        )
    }

    /// Answer the newest query of a conversation.
    ///
    /// `history` is the conversation's user-authored turns in chronological
    /// order; the newest entry is the active query. Returns the structured
    /// answer, or `AnswerGenerationFailed` when an adapter fails.
    pub async fn answer(
        &self,
        conversation_id: &str,
        history: &[String],
    ) -> AppResult<PipelineResult> {
        self.answer_with_cancel(conversation_id, history, CancellationToken::new())
            .await
    }

    /// Answer the newest query, cancelable as a unit.
    ///
    /// A cancellation arriving mid-chain surfaces as `AppError::Cancelled`
    /// and never yields a partial result.
    pub async fn answer_with_cancel(
        &self,
        conversation_id: &str,
        history: &[String],
        cancel: CancellationToken,
    ) -> AppResult<PipelineResult> {
        let span = tracing::info_span!("answer", conversation_id);

        let window = window_history(history, self.settings.history_max_length);
        // The newest windowed entry is the active query; the rest is the
        // disambiguation history fed to the primary prompt.
        let Some((query, prior_turns)) = window.split_last() else {
            return Err(AppError::Config(
                "Conversation history must contain at least the active query".to_string(),
            ));
        };

        tracing::debug!(
            parent: &span,
            "Answering with {} prior turns in window (history length {})",
            prior_turns.len(),
            history.len()
        );

        self.run(query, prior_turns, &cancel)
            .instrument(span)
            .await
            .map_err(AppError::into_answer_failure)
    }

    /// The sequential stage chain. Returns raw adapter errors; the public
    /// entry point wraps them into the generic answer-failure outcome.
    async fn run(
        &self,
        query: &str,
        prior_turns: &[String],
        cancel: &CancellationToken,
    ) -> AppResult<PipelineResult> {
        tracing::debug!(stage = %Stage::Embedding, "Embedding query");
        let query_embedding = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AppError::Cancelled),
            result = self.embedder.embed(query) => result?,
        };

        tracing::debug!(stage = %Stage::Retrieving, "Retrieving top-{} excerpts", self.settings.top_k);
        let excerpts: Vec<Excerpt> = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AppError::Cancelled),
            result = self.retriever.retrieve(&query_embedding, self.settings.top_k) => result?,
        };

        // An empty excerpt set is a normal outcome; the prompt renders with
        // an empty excerpts section.
        tracing::debug!("Retrieved {} excerpts", excerpts.len());

        let prompt = self.renderer.render_primary(query, prior_turns, &excerpts)?;

        tracing::debug!(stage = %Stage::PrimaryGenerating, "Calling primary generator");
        let reply = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AppError::Cancelled),
            result = self.primary.generate(&prompt) => result?,
        };

        tracing::debug!(stage = %Stage::Deciding, "Inspecting reply for the no-answer sentinel");
        if !reply.contains(NO_ANSWER_SENTINEL) {
            let citations = citation_titles(&excerpts);
            let confidence = excerpts.first().map(|e| e.score);

            tracing::info!(
                "Answered from excerpts ({} citations, confidence {:?})",
                citations.len(),
                confidence
            );

            return Ok(PipelineResult {
                text: strip_newlines(&reply),
                citations,
                used_fallback: false,
                confidence,
            });
        }

        // Sentinel present: the fallback sees the bare query only.
        let fallback_prompt = self.renderer.render_fallback(query)?;

        tracing::debug!(stage = %Stage::FallbackGenerating, "Calling fallback generator");
        let fallback_reply = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AppError::Cancelled),
            result = self.fallback.generate(&fallback_prompt) => result?,
        };

        tracing::info!("Answered via fallback branch");

        Ok(PipelineResult {
            text: strip_newlines(&fallback_reply),
            citations: Vec::new(),
            used_fallback: true,
            confidence: None,
        })
    }
}
