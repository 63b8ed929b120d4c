//! Atom metadata

use serde::{Deserialize, Serialize};

use crate::{CallSite, DataFlow};

/// A statically extracted function or method
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Atom {
    /// Stable identifier, conventionally `filePath::qualifiedName`
    pub id: String,

    /// Bare function name as written in source
    pub name: String,

    /// Path of the file that defines this atom
    pub file_path: String,

    #[serde(default)]
    pub is_exported: bool,

    /// Import declarations of the defining file
    #[serde(default)]
    pub imports: Vec<ImportDecl>,

    /// Call sites inside the body, in source order
    #[serde(default)]
    pub calls: Vec<CallSite>,

    /// Best-effort data-flow sketch; absent when extraction failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_flow: Option<DataFlow>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<Archetype>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<Purpose>,

    /// Cyclomatic complexity reported by the parser
    #[serde(default = "default_complexity")]
    pub complexity: u32,

    #[serde(default)]
    pub lines_of_code: u32,

    #[serde(default)]
    pub is_test_callback: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_callback_type: Option<TestCallbackType>,

    /// Enclosing class for methods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(default)]
    pub is_async: bool,

    /// Result of an upstream semantic pass, if one ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic: Option<SemanticAnnotation>,

    /// Source text of the function
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// 1-based line where the function starts in its file
    #[serde(default = "default_line")]
    pub line: u32,
}

fn default_complexity() -> u32 {
    1
}

fn default_line() -> u32 {
    1
}

impl Atom {
    /// Create an atom with the conventional `file::name` id and defaults
    /// everywhere else.
    pub fn new(file_path: impl Into<String>, name: impl Into<String>) -> Self {
        let file_path = file_path.into();
        let name = name.into();
        Self {
            id: format!("{}::{}", file_path, name),
            name,
            file_path,
            complexity: default_complexity(),
            line: default_line(),
            ..Self::default()
        }
    }

    /// Whether the data-flow sketch declares a `return` output
    pub fn has_return(&self) -> bool {
        self.data_flow
            .as_ref()
            .map(|df| df.outputs.iter().any(|o| o.is_return()))
            .unwrap_or(false)
    }

    /// Whether any output is a side effect
    pub fn has_side_effect(&self) -> bool {
        self.data_flow
            .as_ref()
            .map(|df| df.outputs.iter().any(|o| o.is_side_effect()))
            .unwrap_or(false)
    }

    /// Declared parameters, empty when there is no data-flow sketch
    pub fn params(&self) -> &[crate::Input] {
        self.data_flow
            .as_ref()
            .map(|df| df.inputs.as_slice())
            .unwrap_or(&[])
    }

    /// Whether this atom's file has an import whose source satisfies `pred`
    pub fn imports_any(&self, mut pred: impl FnMut(&str) -> bool) -> bool {
        self.imports.iter().any(|i| pred(&i.source))
    }
}

/// One import declaration (`import x from './math'`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub source: String,
}

impl ImportDecl {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Structural archetype assigned by the upstream classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archetype {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub severity: Option<u32>,
}

/// Why a function exists, as classified upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Purpose {
    ApiExport,
    InternalHelper,
    TestHelper,
    ConfigSetup,
    EntryPoint,
    EventHandler,
    ClassMethod,
    DeadCode,
    #[serde(other)]
    Other,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::ApiExport => "API_EXPORT",
            Purpose::InternalHelper => "INTERNAL_HELPER",
            Purpose::TestHelper => "TEST_HELPER",
            Purpose::ConfigSetup => "CONFIG_SETUP",
            Purpose::EntryPoint => "ENTRY_POINT",
            Purpose::EventHandler => "EVENT_HANDLER",
            Purpose::ClassMethod => "CLASS_METHOD",
            Purpose::DeadCode => "DEAD_CODE",
            Purpose::Other => "OTHER",
        }
    }
}

/// Kind of test-framework callback (`describe`, `beforeEach`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TestCallbackType {
    Describe,
    It,
    Test,
    BeforeEach,
    AfterEach,
    BeforeAll,
    AfterAll,
    #[serde(other)]
    Other,
}

impl TestCallbackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestCallbackType::Describe => "describe",
            TestCallbackType::It => "it",
            TestCallbackType::Test => "test",
            TestCallbackType::BeforeEach => "beforeEach",
            TestCallbackType::AfterEach => "afterEach",
            TestCallbackType::BeforeAll => "beforeAll",
            TestCallbackType::AfterAll => "afterAll",
            TestCallbackType::Other => "other",
        }
    }

    /// Per-test setup/teardown hooks, the most repeated test boilerplate
    pub fn is_per_test_hook(&self) -> bool {
        matches!(self, TestCallbackType::BeforeEach | TestCallbackType::AfterEach)
    }
}

/// Verb/domain/entity triple produced by a semantic pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticAnnotation {
    pub verb: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_conventional_id() {
        let atom = Atom::new("src/math.js", "add");
        assert_eq!(atom.id, "src/math.js::add");
        assert_eq!(atom.complexity, 1);
        assert_eq!(atom.line, 1);
        assert!(atom.data_flow.is_none());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "a.js::f",
            "name": "f",
            "filePath": "a.js",
            "isExported": true,
            "purpose": "API_EXPORT",
            "testCallbackType": "beforeEach",
            "linesOfCode": 12
        }"#;
        let atom: Atom = serde_json::from_str(json).unwrap();
        assert!(atom.is_exported);
        assert_eq!(atom.purpose, Some(Purpose::ApiExport));
        assert_eq!(atom.test_callback_type, Some(TestCallbackType::BeforeEach));
        assert_eq!(atom.lines_of_code, 12);
        assert_eq!(atom.complexity, 1);
        assert!(atom.calls.is_empty());
    }

    #[test]
    fn test_unknown_purpose_is_other() {
        let json = r#"{"id": "a", "name": "a", "filePath": "a.js", "purpose": "SOMETHING_NEW"}"#;
        let atom: Atom = serde_json::from_str(json).unwrap();
        assert_eq!(atom.purpose, Some(Purpose::Other));
    }

    #[test]
    fn test_per_test_hook() {
        assert!(TestCallbackType::BeforeEach.is_per_test_hook());
        assert!(TestCallbackType::AfterEach.is_per_test_hook());
        assert!(!TestCallbackType::It.is_per_test_hook());
    }
}
