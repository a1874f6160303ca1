use std::sync::Arc;

use crate::application::errors::{BotError, StrategyError};
use crate::application::messaging::IntentDispatcher;
use crate::application::reply::render;
use crate::application::strategies::{
    CompletionStrategy, DocumentStrategy, ResponseStrategy, StaticText, WebPageStrategy,
};
use crate::domain::entities::{IncomingMessage, Intent, Interaction, OutgoingReply};
use crate::domain::traits::{DisabledLog, InteractionLog, Messenger};
use crate::infrastructure::config::Config;
use crate::infrastructure::documents::PdfReader;
use crate::infrastructure::llm::LLM;
use crate::infrastructure::webcrawler::WebCrawler;

/// One strategy per intent
pub struct Strategies {
    pub schedule: Arc<dyn ResponseStrategy>,
    pub news: Arc<dyn ResponseStrategy>,
    pub document: Arc<dyn ResponseStrategy>,
    pub conversation: Arc<dyn ResponseStrategy>,
}

impl Strategies {
    pub fn for_intent(&self, intent: Intent) -> &dyn ResponseStrategy {
        match intent {
            Intent::Schedule => self.schedule.as_ref(),
            Intent::News => self.news.as_ref(),
            Intent::Document => self.document.as_ref(),
            Intent::Conversation => self.conversation.as_ref(),
        }
    }

    /// The stock strategies, with completions going to `llm`
    pub fn from_config(config: &Config, llm: Arc<dyn LLM>) -> Result<Self, BotError> {
        let routes = &config.routes;
        let crawler = WebCrawler::new(routes.news.timeout_secs).map_err(BotError::Internal)?;

        Ok(Self {
            schedule: Arc::new(StaticText::new(routes.schedule.reply.clone())),
            news: Arc::new(WebPageStrategy::new(crawler, routes.news.url.clone())),
            document: Arc::new(DocumentStrategy::new(PdfReader::new(routes.document.path.clone()))),
            conversation: Arc::new(CompletionStrategy::new(llm, config.llm.clone())),
        })
    }
}

/// Per-message pipeline: dispatch, respond, render, reply, log
pub struct ReplyService {
    dispatcher: IntentDispatcher,
    strategies: Strategies,
    messenger: Arc<dyn Messenger>,
    log: Arc<dyn InteractionLog>,
    strict_documents: bool,
}

impl ReplyService {
    pub fn new(dispatcher: IntentDispatcher, strategies: Strategies, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            dispatcher,
            strategies,
            messenger,
            log: Arc::new(DisabledLog),
            strict_documents: false,
        }
    }

    pub fn from_config(
        config: &Config,
        llm: Arc<dyn LLM>,
        messenger: Arc<dyn Messenger>,
        log: Arc<dyn InteractionLog>,
    ) -> Result<Self, BotError> {
        let strategies = Strategies::from_config(config, llm)?;
        Ok(Self::new(IntentDispatcher::from_config(&config.routes), strategies, messenger)
            .with_log(log)
            .with_strict_documents(config.routes.document.strict))
    }

    pub fn with_log(mut self, log: Arc<dyn InteractionLog>) -> Self {
        self.log = log;
        self
    }

    /// Let PDF failures fail the request instead of rendering an error reply
    pub fn with_strict_documents(mut self, strict: bool) -> Self {
        self.strict_documents = strict;
        self
    }

    /// Answer one message. Sends exactly one reply on success.
    pub async fn handle(&self, message: IncomingMessage) -> Result<OutgoingReply, BotError> {
        let intent = self.dispatcher.dispatch(&message.text);
        let strategy = self.strategies.for_intent(intent);
        tracing::info!(
            "Message {} from {} routed to {} ({})",
            message.message_id,
            message.source.as_str(),
            intent,
            strategy.name()
        );

        let outcome = strategy.respond(&message.text).await;
        if self.strict_documents {
            if let Err(StrategyError::Document(e)) = &outcome {
                return Err(BotError::Document(e.clone()));
            }
        }

        let question = message.text.clone();
        let reply = message.reply(render(&outcome));

        tracing::info!(
            "Sending reply via {}: {}",
            self.messenger.name(),
            preview(&reply.text)
        );
        self.messenger.reply(&reply).await?;

        self.log_interaction(Interaction::new(question, reply.text.clone())).await;
        Ok(reply)
    }

    /// Best effort; failures are only logged
    async fn log_interaction(&self, interaction: Interaction) {
        if let Err(e) = self.log.append(&interaction).await {
            tracing::warn!("Failed to log interaction: {}", e);
        }
    }
}

/// First 100 characters, for logs
pub(crate) fn preview(text: &str) -> &str {
    match text.char_indices().nth(100) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
