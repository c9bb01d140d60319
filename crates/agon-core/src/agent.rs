//! Debate participant configuration
//!
//! An [`AgentConfig`] binds one participant to a model, its sampling
//! parameters, a stance and the credential used for its provider calls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error types for agent configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing API credential for agent '{0}'")]
    MissingCredential(String),
    #[error("Agent identity must not be empty")]
    EmptyIdentity,
    #[error("Missing model for agent '{0}'")]
    MissingModel(String),
    #[error("Temperature {temperature} for agent '{identity}' is outside [0, 2]")]
    Temperature { identity: String, temperature: f32 },
    #[error("Max output tokens for agent '{0}' must be greater than zero")]
    MaxTokens(String),
    #[error("Both agents are named '{0}'")]
    DuplicateIdentity(String),
    #[error("Both agents argue the {0} side")]
    DuplicateStance(Stance),
}

/// Which side of the motion an agent argues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Proposition,
    Opposition,
}

impl Stance {
    /// The other side
    pub fn opposite(self) -> Self {
        match self {
            Stance::Proposition => Stance::Opposition,
            Stance::Opposition => Stance::Proposition,
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stance::Proposition => f.write_str("proposition"),
            Stance::Opposition => f.write_str("opposition"),
        }
    }
}

/// Alternate system-instruction register for an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Standard,
    #[serde(alias = "unhinged")]
    Unrestrained,
}

impl std::str::FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "default" => Ok(Persona::Standard),
            "unrestrained" | "unhinged" => Ok(Persona::Unrestrained),
            other => Err(format!("unknown persona '{}'", other)),
        }
    }
}

/// API credential for one agent's provider
///
/// Formatting never reveals the secret.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// True when the credential is non-blank
    pub fn is_present(&self) -> bool {
        !self.0.trim().is_empty()
    }

    /// The raw secret, for the Authorization header only
    pub fn expose(&self) -> &str {
        self.0.trim()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_present() {
            f.write_str("Credential(****)")
        } else {
            f.write_str("Credential(<empty>)")
        }
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Configuration for one debate participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Display name, unique within a session
    pub identity: String,
    /// Model id, also used to route to a provider (e.g. "gpt-4o-mini", "grok-2-latest")
    pub model: String,
    /// Sampling temperature (0.0 = deterministic, 2.0 = maximum)
    pub temperature: f32,
    /// Maximum tokens to generate per turn
    pub max_tokens: u32,
    /// Provider credential
    #[serde(default, skip_serializing)]
    pub credential: Credential,
    /// Requested persona, if any
    #[serde(default)]
    pub persona: Option<Persona>,
    /// Side argued by this agent
    pub stance: Stance,
}

impl AgentConfig {
    /// Create an agent with the default sampling parameters
    pub fn new(identity: &str, model: &str, stance: Stance) -> Self {
        Self {
            identity: identity.to_string(),
            model: model.to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            credential: Credential::default(),
            persona: None,
            stance,
        }
    }

    pub fn with_credential(mut self, credential: impl Into<Credential>) -> Self {
        self.credential = credential.into();
        self
    }

    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = Some(persona);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Check the fields a provider call depends on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity.trim().is_empty() {
            return Err(ConfigError::EmptyIdentity);
        }
        if !self.credential.is_present() {
            return Err(ConfigError::MissingCredential(self.identity.clone()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::MissingModel(self.identity.clone()));
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Temperature {
                identity: self.identity.clone(),
                temperature: self.temperature,
            });
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::MaxTokens(self.identity.clone()));
        }
        Ok(())
    }
}

/// Validate both participants of a session
///
/// Each agent must be valid on its own, and the two must differ in
/// identity and stance.
pub fn validate_pair(a: &AgentConfig, b: &AgentConfig) -> Result<(), ConfigError> {
    a.validate()?;
    b.validate()?;

    if a.identity.trim() == b.identity.trim() {
        return Err(ConfigError::DuplicateIdentity(a.identity.clone()));
    }
    if a.stance == b.stance {
        return Err(ConfigError::DuplicateStance(a.stance));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(identity: &str, stance: Stance) -> AgentConfig {
        AgentConfig::new(identity, "gpt-4o-mini", stance).with_credential("sk-test")
    }

    #[test]
    fn test_credential_is_redacted() {
        let credential = Credential::new("sk-very-secret");
        let rendered = format!("{:?}", credential);
        assert!(!rendered.contains("secret"));
        assert_eq!(credential.expose(), "sk-very-secret");

        let config = agent("Alice", Stance::Proposition).with_credential("sk-hidden");
        assert!(!format!("{:?}", config).contains("sk-hidden"));
    }

    #[test]
    fn test_blank_credential_is_missing() {
        let config = agent("Alice", Stance::Proposition).with_credential("   ");
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingCredential("Alice".to_string()))
        );
    }

    #[test]
    fn test_temperature_bounds() {
        assert!(agent("A", Stance::Proposition).with_temperature(2.0).validate().is_ok());
        assert!(matches!(
            agent("A", Stance::Proposition).with_temperature(2.5).validate(),
            Err(ConfigError::Temperature { .. })
        ));
        assert!(agent("A", Stance::Proposition)
            .with_temperature(f32::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        assert_eq!(
            agent("A", Stance::Proposition).with_max_tokens(0).validate(),
            Err(ConfigError::MaxTokens("A".to_string()))
        );
    }

    #[test]
    fn test_pair_requires_distinct_identity_and_stance() {
        let a = agent("Alice", Stance::Proposition);
        assert!(validate_pair(&a, &agent("Bob", Stance::Opposition)).is_ok());
        assert_eq!(
            validate_pair(&a, &agent("Alice", Stance::Opposition)),
            Err(ConfigError::DuplicateIdentity("Alice".to_string()))
        );
        assert_eq!(
            validate_pair(&a, &agent("Bob", Stance::Proposition)),
            Err(ConfigError::DuplicateStance(Stance::Proposition))
        );
    }

    #[test]
    fn test_persona_parsing_accepts_legacy_label() {
        assert_eq!("unhinged".parse::<Persona>(), Ok(Persona::Unrestrained));
        assert_eq!("Unrestrained".parse::<Persona>(), Ok(Persona::Unrestrained));
        assert!("sarcastic".parse::<Persona>().is_err());

        let persona: Persona = serde_json::from_str("\"unhinged\"").unwrap();
        assert_eq!(persona, Persona::Unrestrained);
    }

    #[test]
    fn test_stance_display() {
        assert_eq!(Stance::Proposition.to_string(), "proposition");
        assert_eq!(Stance::Proposition.opposite(), Stance::Opposition);
    }
}
