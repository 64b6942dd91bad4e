//! Query gate - heuristic decision on whether a retrieval round-trip is
//! worth its cost for a given utterance
//!
//! This is a cost-control gate, not a correctness gate: skipping a
//! search that would have helped is acceptable, searching on small talk
//! merely wastes an embedding call. The rules live in an explicit,
//! versioned pattern table so they stay data-driven and independently
//! testable.

use once_cell::sync::Lazy;
use regex::Regex;

/// Version tag of the default pattern table
pub const GATE_PATTERNS_VERSION: &str = "2025-03";

/// Minimum query length, in characters, after trimming
const MIN_QUERY_CHARS: usize = 5;

/// Minimum whitespace-separated tokens for the default-accept rule
const MIN_QUERY_TOKENS: usize = 3;

/// Greeting/farewell/acknowledgment phrases (Portuguese and English),
/// anchored at string start and allowed trailing punctuation only.
const SMALL_TALK: &str = r"(?i)^(?:oi+|olá|ola|opa|e aí|eai|hey|hi|hello|bom dia|boa tarde|boa noite|tudo bem|tudo bom|td bem|como vai|tchau|até mais|até logo|falou|flw|obrigado|obrigada|obg|valeu|vlw|blz|beleza|ok|okay|certo|entendi|perfeito|show|legal|thanks|thank you|bye|goodbye|good morning|good afternoon|good evening)[\s!.,?…]*$";

/// Interrogative words accepted at the start of a query
const INTERROGATIVE: &str = r"(?i)^(?:qual|quais|quando|onde|aonde|como|quem|quanto|quanta|quantos|quantas|cadê|cade|por que|porque|o que|oq|what|which|when|where|who|whom|whose|why|how|can|could|do|does|did|is|are|should|would)\b";

/// Explicit information-request phrases accepted anywhere in the query
const INFO_REQUEST: &str = r"(?i)\b(?:me diga|me fale|me explique|me informe|me mostre|gostaria de saber|preciso saber|quero saber|pode me dizer|poderia me dizer|como faço|como posso|tell me|i need to know|i want to know|i would like to know|explain|show me)\b";

/// Compiled gate pattern table
#[derive(Debug)]
pub struct GatePatterns {
    version: &'static str,
    small_talk: Regex,
    interrogative: Regex,
    info_request: Regex,
}

static DEFAULT_PATTERNS: Lazy<GatePatterns> = Lazy::new(GatePatterns::default_table);

impl GatePatterns {
    /// Build the default pattern table
    pub fn default_table() -> Self {
        Self {
            version: GATE_PATTERNS_VERSION,
            small_talk: Regex::new(SMALL_TALK).expect("small-talk pattern must compile"),
            interrogative: Regex::new(INTERROGATIVE).expect("interrogative pattern must compile"),
            info_request: Regex::new(INFO_REQUEST).expect("info-request pattern must compile"),
        }
    }

    /// Get the table version tag
    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Decide whether a query is worth a retrieval round-trip
    pub fn should_search(&self, query: &str) -> bool {
        let query = query.trim();

        if query.chars().count() < MIN_QUERY_CHARS {
            return false;
        }

        if self.small_talk.is_match(query) {
            return false;
        }

        if query.contains('?') {
            return true;
        }

        if self.interrogative.is_match(query) {
            return true;
        }

        if self.info_request.is_match(query) {
            return true;
        }

        query.split_whitespace().count() >= MIN_QUERY_TOKENS
    }
}

/// Decide with the default pattern table. Pure and side-effect-free.
pub fn should_search(query: &str) -> bool {
    DEFAULT_PATTERNS.should_search(query)
}
