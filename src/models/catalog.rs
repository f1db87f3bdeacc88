pub const AVAILABLE_MODELS: &[&str] = &[
    "claude-sonnet-4.5",
    "gpt-5",
    "grok-4",
    "gemini-2.5-pro",
    "kyvex",
    "kyvex-labs-deep-research",
    "gemini-imagen-4",
];

pub const DEFAULT_MODEL: &str = AVAILABLE_MODELS[0];

pub fn is_known_model(model: &str) -> bool {
    AVAILABLE_MODELS.contains(&model)
}
