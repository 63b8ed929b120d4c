//! End-to-end tests across loading, DNA, mapping and resolution
//!
//! Atoms are written to a temporary project directory the way the parser
//! would emit them, then run through every stage.

use std::fs;
use std::path::PathBuf;

use atomflow::atom::load_atoms;
use atomflow::dna::{compare_dna, extract_dna, DnaCache, FlowType};
use atomflow::mapper::{ArgumentMapper, ReturnUsageReason, TransformKind};
use atomflow::resolver::{CrossFileResolver, ResolvedBy};

const USER_SERVICE: &str = r#"[
  {
    "id": "src/services/user.js::fetchUser",
    "name": "fetchUser",
    "filePath": "src/services/user.js",
    "isExported": true,
    "isAsync": true,
    "dataFlow": {
      "inputs": [{"name": "id", "type": "simple", "position": 0, "usages": [{"type": "passed_to"}]}],
      "outputs": [{"type": "return"}],
      "transformations": [{"to": "row", "from": ["id"], "operation": "await_function_call"}]
    },
    "calls": [{"name": "saveAudit", "line": 14}]
  },
  {
    "id": "src/services/user.js::loadAccount",
    "name": "loadAccount",
    "filePath": "src/services/user.js",
    "isExported": false,
    "dataFlow": {
      "inputs": [{"name": "key", "type": "simple", "position": 0, "usages": [{"type": "passed_to"}]}],
      "outputs": [{"type": "return"}],
      "transformations": [{"to": "record", "from": ["key"], "operation": "await_function_call"}]
    }
  }
]"#;

const AUDIT: &str = r#"{
  "id": "src/audit.js::saveAudit",
  "name": "saveAudit",
  "filePath": "src/audit.js",
  "isExported": true,
  "dataFlow": {
    "inputs": [],
    "outputs": [{"type": "side_effect", "target": "db"}],
    "transformations": [{"to": "entry", "from": [], "operation": "mutation"}]
  }
}"#;

const CONTROLLER: &str = r#"[
  {
    "id": "src/controller.js::showProfile",
    "name": "showProfile",
    "filePath": "src/controller.js",
    "imports": [{"source": "./services/user"}],
    "line": 10,
    "calls": [
      {
        "name": "fetchUser",
        "line": 12,
        "args": [{"type": "MemberExpression", "object": "req.params", "property": "id", "code": "req.params.id"}]
      }
    ],
    "dataFlow": {
      "inputs": [{"name": "req", "type": "simple", "position": 0}],
      "outputs": [{"type": "return"}],
      "transformations": []
    },
    "source": "async function showProfile(req) {\n  const id = req.params.id;\n  const user = await fetchUser(req.params.id);\n  return render(user);\n}"
  }
]"#;

fn project() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    fs::create_dir_all(root.join("services")).unwrap();
    fs::write(root.join("services/user.json"), USER_SERVICE).unwrap();
    fs::write(root.join("audit.json"), AUDIT).unwrap();
    fs::write(root.join("controller.json"), CONTROLLER).unwrap();
    fs::write(root.join("notes.txt"), "not atoms").unwrap();
    (dir, root)
}

#[test]
fn e2e_renamed_twins_share_structure() {
    let (_dir, root) = project();
    let atoms = load_atoms(&[root]).unwrap();
    assert_eq!(atoms.len(), 4);

    let fetch = atoms.iter().find(|a| a.name == "fetchUser").unwrap();
    let load = atoms.iter().find(|a| a.name == "loadAccount").unwrap();
    let (a, b) = (extract_dna(fetch), extract_dna(load));

    assert_eq!(a.structural_hash, b.structural_hash);
    assert_eq!(a.pattern_hash, b.pattern_hash);
    assert_ne!(a.id, b.id);
    assert_eq!(a.flow_type, FlowType::ReadReturn);
    // everything but the fingerprint matches
    assert_eq!(compare_dna(&a, &b), 0.9);
}

#[test]
fn e2e_cache_tracks_atoms() {
    let (_dir, root) = project();
    let atoms = load_atoms(&[root]).unwrap();

    let mut cache = DnaCache::new();
    for atom in &atoms {
        cache.get_or_extract(atom);
    }
    for atom in &atoms {
        cache.get_or_extract(atom);
    }
    assert_eq!(cache.len(), atoms.len());
    assert_eq!(cache.stats().hits, atoms.len() as u64);
    assert_eq!(cache.invalidate_file("src/services/user.js"), 2);
}

#[test]
fn e2e_edges_and_journey() {
    let (_dir, root) = project();
    let atoms = load_atoms(&[root]).unwrap();
    let resolver = CrossFileResolver::new(&atoms);
    let map = resolver.build_edge_map();

    assert_eq!(map.total_edges(), 2);
    let edges = map.edges_from("src/controller.js::showProfile");
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].callee_file, "src/services/user.js");
    assert_eq!(edges[0].resolved_by, ResolvedBy::ImportHint);
    assert_eq!(edges[0].confidence, 1.0);
    assert_eq!(
        edges[0].mapping.mappings[0].transform.kind(),
        TransformKind::PropertyAccess
    );

    let journey = map.trace_journey("src/controller.js::showProfile", 5);
    let path: Vec<_> = journey
        .iter()
        .map(|s| (s.depth, s.edge.callee_id.as_str()))
        .collect();
    assert_eq!(
        path,
        [
            (1, "src/services/user.js::fetchUser"),
            (2, "src/audit.js::saveAudit"),
        ]
    );
}

#[test]
fn e2e_data_flow_analysis() {
    let (_dir, root) = project();
    let atoms = load_atoms(&[root]).unwrap();
    let caller = atoms.iter().find(|a| a.name == "showProfile").unwrap();
    let callee = atoms.iter().find(|a| a.name == "fetchUser").unwrap();

    let analysis = ArgumentMapper::new(caller, callee, &caller.calls[0])
        .analyze_data_flow()
        .unwrap();

    assert_eq!(analysis.return_usage.reason, ReturnUsageReason::Assigned);
    assert_eq!(analysis.return_usage.assigned_to.as_deref(), Some("user"));
    assert_eq!(analysis.return_usage.usage_count(), 1);
    assert!(analysis.chains.is_empty());
    // property access + used + one read
    assert_eq!(analysis.summary.chain_complexity, 3);

    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["returnUsage"]["reason"], "assigned");
    assert_eq!(json["mapping"]["mappings"][0]["transform"]["type"], "PROPERTY_ACCESS");
}
