use crate::{
    diagnostics::Result,
    kind::Kind,
    normalizer::Normalizer,
    parser::{EcmaGrammar, Grammar},
    reify::reify,
    selector::SelectorRegistry,
    serializer::{Serializer, SerializerConfig},
    value::Value,
};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub prompt: String,
    /// Results that need a selector are bound as `<prefix><n>`.
    pub history_prefix: String,
    pub serializer: SerializerConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            history_prefix: "$".to_string(),
            serializer: SerializerConfig::default(),
        }
    }
}

/// Console state: inspects snippets and remembers reference results so
/// later snippets (and later serializations) can name them.
pub struct Session {
    config: SessionConfig,
    normalizer: Normalizer,
    registry: SelectorRegistry,
    counter: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            normalizer: Normalizer::new(),
            registry: SelectorRegistry::new(),
            counter: 0,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &SelectorRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SelectorRegistry {
        &mut self.registry
    }

    /// Evaluates a single-expression snippet as a literal and renders the
    /// result back to source.
    pub fn inspect(&mut self, line: &str) -> Result<String> {
        let value = self.evaluate(line)?;
        self.remember(&value);
        self.serializer().to_source_safe(&value)
    }

    pub fn evaluate(&self, line: &str) -> Result<Value> {
        let normalized = self.normalizer.normalize(line, true)?;
        log::debug!("normalized {line:?} to {normalized:?}");
        let expr = EcmaGrammar.parse_expression_at(&normalized, 0)?;
        Ok(reify(&normalized, &expr, &self.registry)?)
    }

    pub fn serializer(&self) -> Serializer<'_> {
        Serializer::new(&self.registry).with_config(self.config.serializer.clone())
    }

    /// Binds reference results that nothing names yet.
    fn remember(&mut self, value: &Value) {
        let needs_name = matches!(
            Kind::of(value),
            Kind::Object | Kind::Symbol | Kind::Array | Kind::Error(_)
        );
        if !needs_name || self.registry.iter().any(|(_, bound)| bound == value) {
            return;
        }
        self.counter += 1;
        let path = format!("{}{}", self.config.history_prefix, self.counter);
        log::info!("bound result to {path}");
        self.registry.bind(path, value.clone());
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
