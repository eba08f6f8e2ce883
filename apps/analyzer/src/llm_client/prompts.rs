// Shared prompt fragments for every backend.
// Feature-specific prompts live next to the feature (see analysis/prompts.rs).

/// System prompt that enforces JSON-only output, for backends with a system slot.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
