//! `verb:domain:entity` fingerprints
//!
//! Naming heuristics live behind [`VerbLexicon`] so a symbol-aware pass can
//! replace them without touching the hash layers.

use atomflow_atom::{Atom, Purpose};

use crate::FlowType;

/// Verb prefixes recognised at the start of function names
pub const COMMON_VERBS: &[&str] = &[
    "get", "set", "fetch", "load", "save", "store", "create", "build",
    "make", "init", "initialize", "update", "delete", "remove", "add", "insert",
    "validate", "check", "verify", "is", "has", "can", "should", "parse",
    "format", "render", "transform", "convert", "map", "filter", "reduce", "find",
    "search", "calculate", "compute", "handle", "process", "send", "emit", "dispatch",
    "register", "resolve", "extract", "normalize", "sanitize", "merge", "read", "write",
];

const DEFAULT_VERB: &str = "process";
const UNKNOWN: &str = "unknown";

/// Source of verb prefixes for fingerprinting
pub trait VerbLexicon: Send + Sync {
    /// Longest known verb that prefixes `name`, ignoring case
    fn match_verb(&self, name: &str) -> Option<&str>;
}

/// Lexicon backed by [`COMMON_VERBS`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonVerbs;

impl VerbLexicon for CommonVerbs {
    fn match_verb(&self, name: &str) -> Option<&str> {
        let lower = name.to_lowercase();
        COMMON_VERBS
            .iter()
            .filter(|verb| lower.starts_with(*verb))
            .max_by_key(|verb| verb.len())
            .copied()
    }
}

/// Build the fingerprint for an atom whose flow type is already known
pub fn semantic_fingerprint(atom: &Atom, flow_type: FlowType, lexicon: &dyn VerbLexicon) -> String {
    if let Some(semantic) = &atom.semantic {
        if !semantic.verb.is_empty() && semantic.verb != UNKNOWN {
            return format!(
                "{}:{}:{}",
                semantic.verb,
                semantic.domain.as_deref().unwrap_or(UNKNOWN),
                semantic.entity.as_deref().unwrap_or(UNKNOWN)
            );
        }
    }

    let matched = lexicon.match_verb(&atom.name);
    let verb = matched.unwrap_or(DEFAULT_VERB);
    let rest = match matched {
        Some(v) => atom.name.get(v.len()..).unwrap_or(""),
        None => atom.name.as_str(),
    };

    format!(
        "{}:{}:{}",
        verb,
        infer_domain(atom.purpose, flow_type),
        entity_of(rest)
    )
}

fn infer_domain(purpose: Option<Purpose>, flow_type: FlowType) -> &'static str {
    match purpose {
        Some(Purpose::ApiExport) => return "api",
        Some(Purpose::InternalHelper) => return "internal",
        Some(Purpose::TestHelper) => return "test",
        Some(Purpose::ConfigSetup) => return "config",
        _ => {}
    }

    if flow_type.reads() {
        "data"
    } else if flow_type.persists() {
        "persistence"
    } else if flow_type.transforms() {
        "transform"
    } else {
        "core"
    }
}

/// Last camelCase (or snake_case) token, lower-cased
fn entity_of(rest: &str) -> String {
    camel_tokens(rest)
        .last()
        .map(|t| t.to_lowercase())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn camel_tokens(s: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in s.chars() {
        if c == '_' || c == '-' || c == '$' {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use atomflow_atom::SemanticAnnotation;

    fn fp(name: &str, purpose: Option<Purpose>, flow: FlowType) -> String {
        let mut atom = Atom::new("a.js", name);
        atom.purpose = purpose;
        semantic_fingerprint(&atom, flow, &CommonVerbs)
    }

    #[test]
    fn test_longest_verb_wins() {
        assert_eq!(CommonVerbs.match_verb("initializeStore"), Some("initialize"));
        assert_eq!(CommonVerbs.match_verb("InitStore"), Some("init"));
        assert_eq!(CommonVerbs.match_verb("zap"), None);
    }

    #[test]
    fn test_fingerprint_from_name() {
        assert_eq!(
            fp("getUserById", Some(Purpose::ApiExport), FlowType::ReadReturn),
            "get:api:id"
        );
        assert_eq!(fp("validateOrder", None, FlowType::Guard), "validate:core:order");
        assert_eq!(fp("saveInvoice", None, FlowType::ReadPersist), "save:data:invoice");
    }

    #[test]
    fn test_default_verb_and_entity() {
        assert_eq!(fp("main", None, FlowType::Unknown), "process:core:main");
        assert_eq!(fp("get", None, FlowType::SideEffectOnly), "get:core:unknown");
        assert_eq!(fp("run_user_job", None, FlowType::TransformReturn), "process:transform:job");
    }

    #[test]
    fn test_upstream_semantic_verbatim() {
        let mut atom = Atom::new("a.js", "doThing");
        atom.semantic = Some(SemanticAnnotation {
            verb: "sync".into(),
            domain: Some("billing".into()),
            entity: None,
        });
        assert_eq!(
            semantic_fingerprint(&atom, FlowType::Unknown, &CommonVerbs),
            "sync:billing:unknown"
        );

        atom.semantic.as_mut().unwrap().verb = "unknown".into();
        assert_eq!(
            semantic_fingerprint(&atom, FlowType::Unknown, &CommonVerbs),
            "process:core:thing"
        );
    }

    #[test]
    fn test_camel_tokens() {
        assert_eq!(camel_tokens("UserByID"), vec!["User", "By", "ID"]);
        assert_eq!(camel_tokens("http2Request"), vec!["http2", "Request"]);
    }
}
