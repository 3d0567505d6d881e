//! The prompt generation engine — an explicit think/act/observe loop.
//!
//! One iteration: stream a completion from the provider, look for an
//! `Action:` marker in the finished thought, and either execute the named
//! tool (appending the thought and an observation to the history, then going
//! around again) or treat the thought as the final answer. The loop is a
//! plain `loop` with an iteration cap; there is no recursion and no state
//! outside the history vector, so concurrent runs never interfere.

use crate::action::{parse_action, parse_records, parse_refined};
use crate::error::{classify_provider_error, AgentError, MALFORMED_RESPONSE};
use crate::events::EngineEvent;
use promptforge_config::AppConfig;
use promptforge_core::catalog::Catalog;
use promptforge_core::error::{ProviderError, ToolError};
use promptforge_core::message::ChatMessage;
use promptforge_core::provider::{Provider, ProviderRequest};
use promptforge_core::record::GeneratedPromptRecord;
use promptforge_core::tool::ToolRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 2048;
const DEFAULT_MAX_ITERATIONS: usize = 10;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(25);

/// Runs generation and refinement loops against a provider and a tool set.
///
/// Cheap to clone: every run owns its own history, so a single engine can
/// serve many conversations at once.
#[derive(Clone)]
pub struct PromptEngine {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    catalog: Arc<Catalog>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_iterations: usize,
    request_timeout: Duration,
}

impl PromptEngine {
    pub fn new(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        catalog: Arc<Catalog>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            tools,
            catalog,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Apply the tunable knobs from loaded configuration.
    pub fn tuned(self, config: &AppConfig) -> Self {
        self.with_temperature(config.provider.temperature)
            .with_max_tokens(config.provider.max_tokens)
            .with_max_iterations(config.agent.max_iterations)
            .with_request_timeout(Duration::from_secs(config.provider.request_timeout_secs))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run a full generation and return the parsed records.
    pub async fn generate(
        &self,
        topic: &str,
        goal: &str,
        personas: &[String],
    ) -> Result<Vec<GeneratedPromptRecord>, AgentError> {
        let history = vec![ChatMessage::user(self.seed_generation(topic, goal, personas))];
        let thought = self.run_loop(history, None).await?;

        parse_records(&thought).map_err(|e| {
            error!(
                error = %e,
                preview = %preview(&thought),
                "Final response was not a prompt record array"
            );
            AgentError::MalformedResponse
        })
    }

    /// Run a full generation, emitting progress events on the returned
    /// channel. The last event is always `Complete` or `Error`.
    pub fn generate_stream(
        &self,
        topic: impl Into<String>,
        goal: impl Into<String>,
        personas: Vec<String>,
    ) -> mpsc::Receiver<EngineEvent> {
        let (tx, rx) = mpsc::channel(128);
        let engine = self.clone();
        let topic = topic.into();
        let goal = goal.into();

        tokio::spawn(async move {
            let seed = engine.seed_generation(&topic, &goal, &personas);
            let history = vec![ChatMessage::user(seed)];

            let terminal = match engine.run_loop(history, Some(&tx)).await {
                Ok(thought) => match parse_records(&thought) {
                    Ok(records) => EngineEvent::Complete { records },
                    Err(_) => EngineEvent::Error {
                        message: MALFORMED_RESPONSE.to_string(),
                    },
                },
                Err(e) => EngineEvent::Error {
                    message: e.to_string(),
                },
            };
            let _ = tx.send(terminal).await;
        });

        rx
    }

    /// Refine an existing record. The result is a new record; callers append
    /// it to their collection rather than replacing the original.
    pub async fn refine(
        &self,
        record: &GeneratedPromptRecord,
        instruction: Option<&str>,
    ) -> Result<GeneratedPromptRecord, AgentError> {
        let history = vec![ChatMessage::user(self.seed_refinement(record, instruction))];
        let thought = self.run_loop(history, None).await?;

        parse_refined(&thought).ok_or_else(|| {
            error!(
                preview = %preview(&thought),
                "Refinement response was not a single prompt record"
            );
            AgentError::MalformedRefinement
        })
    }

    /// The seed prompt for a generation run.
    ///
    /// With no selected personas the model is told to cover every persona in
    /// the catalog, so the instruction text always carries concrete terms.
    fn seed_generation(&self, topic: &str, goal: &str, personas: &[String]) -> String {
        let persona_instructions = if personas.is_empty() {
            format!(
                "First, generate one distinct prompt for EACH of the following available personas: {}.",
                self.catalog.persona_terms().join(", ")
            )
        } else {
            format!(
                "First, generate one distinct prompt for EACH of the following user-selected personas: {}.",
                personas.join(", ")
            )
        };

        format!(
            "You are an expert Prompt Generation Assistant. Your goal is to create a list of diverse, high-quality prompts based on a user's topic and goal.\n\
             The user's goal is: \"{goal}\".\n\
             The user's topic is: \"{topic}\".\n\
             {persona_instructions}\n\
             For each prompt, you MUST use the 'searchTheWeb' tool to get real-time context on the topic. Combine the persona and web context to create the prompt.\n\
             Your final output MUST be a valid JSON array of objects. Each object in the array must have exactly three keys:\n\
             1. \"title\": A short, creative, and engaging title for the prompt.\n\
             2. \"personaUsed\": The exact 'term' of the persona used to generate this prompt (e.g., \"PragmaticEngineerPersona\").\n\
             3. \"prompt\": The full, final, generated prompt text.\n\
             Do not include any other text, explanation, or markdown formatting in your final response. Your response must be only the JSON array."
        )
    }

    /// The seed prompt for a refinement run.
    fn seed_refinement(&self, record: &GeneratedPromptRecord, instruction: Option<&str>) -> String {
        let extra = match instruction {
            Some(text) => format!("5. {text}"),
            None => String::new(),
        };

        format!(
            "You are an expert Prompt Refinement Assistant. Please take the following prompt and improve it by making it more specific, actionable, and effective:\n\
             \n\
             Original Prompt:\n\
             Title: {title}\n\
             Persona: {persona}\n\
             Prompt: {prompt}\n\
             \n\
             Please provide an improved version of this prompt that:\n\
             1. Is more specific and actionable\n\
             2. Has better context and examples\n\
             3. Is more engaging and effective\n\
             4. Maintains the same persona and core purpose\n\
             {extra}\n\
             \n\
             Your final output MUST be a valid JSON array containing exactly one object with the same structure:\n\
             {{\n\
               \"title\": \"Improved title\",\n\
               \"personaUsed\": \"{persona}\",\n\
               \"prompt\": \"The improved prompt text\"\n\
             }}\n\
             Do not include any other text, explanation, or markdown formatting in your final response. Your response must be only the JSON array.",
            title = record.title,
            persona = record.persona_used,
            prompt = record.prompt,
        )
    }

    /// The loop itself. Returns the final thought (one with no `Action:`
    /// marker); parsing that thought is the caller's concern.
    async fn run_loop(
        &self,
        mut history: Vec<ChatMessage>,
        events: Option<&mpsc::Sender<EngineEvent>>,
    ) -> Result<String, AgentError> {
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, model = %self.model, "Starting agent loop");

        let mut iteration = 0;
        loop {
            iteration += 1;
            if iteration > self.max_iterations {
                warn!(run_id = %run_id, limit = self.max_iterations, "Iteration limit reached");
                return Err(AgentError::IterationLimit {
                    limit: self.max_iterations,
                });
            }

            debug!(run_id = %run_id, iteration, messages = history.len(), "Requesting completion");
            let thought = self.stream_thought(&history).await?;
            debug!(run_id = %run_id, iteration, chars = thought.len(), "Thought complete");

            emit(
                events,
                EngineEvent::Thought {
                    text: thought.clone(),
                },
            )
            .await;

            let Some(call) = parse_action(&thought) else {
                info!(run_id = %run_id, iterations = iteration, "Loop finished with final answer");
                return Ok(thought);
            };

            info!(run_id = %run_id, iteration, tool = %call.name, "Executing tool");
            emit(
                events,
                EngineEvent::ActionStarted {
                    tool: call.name.clone(),
                    args: call.args.clone(),
                },
            )
            .await;

            let observation = match self
                .tools
                .execute(&self.catalog, &call.name, &call.args)
                .await
            {
                Ok(value) => ChatMessage::observation(value.to_string()),
                Err(ToolError::NotFound(name)) => {
                    warn!(run_id = %run_id, tool = %name, "Unknown tool requested");
                    ChatMessage::system(format!("Error: Tool '{name}' not found."))
                }
            };

            emit(
                events,
                EngineEvent::Observation {
                    content: observation.content.clone(),
                },
            )
            .await;

            history.push(ChatMessage::assistant(thought));
            history.push(observation);
        }
    }

    /// Stream one completion, accumulating deltas into a full thought.
    ///
    /// A single wall-clock deadline covers both connecting and reading, so a
    /// provider that connects fast but then stalls still times out.
    async fn stream_thought(&self, history: &[ChatMessage]) -> Result<String, AgentError> {
        let request = ProviderRequest::new(&self.model, history.to_vec())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let deadline = tokio::time::Instant::now() + self.request_timeout;

        let mut rx = tokio::time::timeout_at(deadline, self.provider.stream(request))
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(classify_provider_error)?;

        let mut thought = String::new();
        loop {
            let next = tokio::time::timeout_at(deadline, rx.recv())
                .await
                .map_err(|_| self.timeout_error())?;

            match next {
                Some(Ok(chunk)) => {
                    if let Some(text) = chunk.content {
                        thought.push_str(&text);
                    }
                    if chunk.done {
                        break;
                    }
                }
                Some(Err(err)) => return Err(classify_provider_error(err)),
                None => break,
            }
        }

        Ok(thought)
    }

    fn timeout_error(&self) -> AgentError {
        AgentError::Provider(ProviderError::Timeout(format!(
            "no completion within {}s",
            self.request_timeout.as_secs()
        )))
    }
}

async fn emit(events: Option<&mpsc::Sender<EngineEvent>>, event: EngineEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event).await;
    }
}

/// First 200 chars of a thought, for log fields.
fn preview(text: &str) -> String {
    let mut s: String = text.chars().take(200).collect();
    if s.len() < text.len() {
        s.push('…');
    }
    s
}
