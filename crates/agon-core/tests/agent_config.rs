//! Agent configuration as loaded from JSON

use agon_core::{validate_pair, AgentConfig, ConfigError, Persona, Stance};

#[test]
fn test_agent_from_json_with_defaults() {
    let agent: AgentConfig = serde_json::from_str(
        r#"{
            "identity": "Grok Assistant",
            "model": "grok-2-latest",
            "temperature": 0.9,
            "max_tokens": 500,
            "persona": "unhinged",
            "stance": "opposition"
        }"#,
    )
    .unwrap();

    assert_eq!(agent.persona, Some(Persona::Unrestrained));
    assert_eq!(agent.stance, Stance::Opposition);
    assert!(!agent.credential.is_present());
    assert_eq!(
        agent.validate(),
        Err(ConfigError::MissingCredential("Grok Assistant".to_string()))
    );
}

#[test]
fn test_credential_never_leaves_the_process() {
    let agent = AgentConfig::new("OpenAI Assistant", "gpt-4o-mini", Stance::Proposition)
        .with_credential("sk-live-secret");

    let json = serde_json::to_string(&agent).unwrap();
    assert!(!json.contains("sk-live-secret"));
    assert!(!format!("{:?}", agent).contains("sk-live-secret"));
}

#[test]
fn test_pair_rules() {
    let a = AgentConfig::new("Alice", "gpt-4o-mini", Stance::Proposition).with_credential("k");
    let b = AgentConfig::new("Bob", "grok-2-latest", Stance::Opposition).with_credential("k");
    assert!(validate_pair(&a, &b).is_ok());

    let same_side = AgentConfig { stance: Stance::Proposition, ..b.clone() };
    assert_eq!(
        validate_pair(&a, &same_side),
        Err(ConfigError::DuplicateStance(Stance::Proposition))
    );

    let too_hot = a.clone().with_temperature(2.5);
    assert!(matches!(
        validate_pair(&too_hot, &b),
        Err(ConfigError::Temperature { .. })
    ));
}
