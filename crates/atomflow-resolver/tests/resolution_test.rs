//! End-to-end resolution over atoms parsed from JSON

use atomflow_atom::{parse_atoms, Atom, CallSite, DataFlow, Input, Output, RawArgument};
use atomflow_mapper::TransformKind;
use atomflow_resolver::{build_edge_map, resolve_all, CrossFileResolver, ResolvedBy, ResolverConfig};

const MATH_APP: &str = r#"[
  {
    "id": "math.js::add",
    "name": "add",
    "filePath": "math.js",
    "isExported": true,
    "dataFlow": {
      "inputs": [
        {"name": "a", "type": "simple", "position": 0},
        {"name": "b", "type": "simple", "position": 1}
      ],
      "outputs": [{"type": "return"}],
      "transformations": [{"to": "sum", "from": ["a", "b"], "operation": "binary_operation"}]
    }
  },
  {
    "id": "app.js::main",
    "name": "main",
    "filePath": "app.js",
    "imports": [{"source": "./math"}],
    "calls": [
      {
        "name": "add",
        "line": 4,
        "args": [
          {"type": "Identifier", "name": "a", "code": "a"},
          {"type": "Literal", "value": 2, "code": "2"}
        ]
      },
      {"name": "log", "line": 5}
    ],
    "source": "function main(a) {\n  // sum\n  const total = add(a, 2);\n  log(total);\n}",
    "line": 2
  }
]"#;

#[test]
fn test_import_resolved_edge() {
    let atoms = parse_atoms(MATH_APP).unwrap();
    let edges = resolve_all(&atoms);

    assert_eq!(edges.len(), 1);
    let edge = &edges[0];
    assert_eq!(edge.caller_id, "app.js::main");
    assert_eq!(edge.callee_id, "math.js::add");
    assert_eq!(edge.callee_file, "math.js");
    assert_eq!(edge.call_site, 4);
    assert_eq!(edge.resolved_by, ResolvedBy::ImportHint);
    assert!(edge.confidence >= 0.65);
    assert_eq!(edge.confidence, 1.0);

    let kinds: Vec<_> = edge.mapping.mappings.iter().map(|m| m.transform.kind()).collect();
    assert_eq!(kinds, [TransformKind::DirectPass, TransformKind::Literal]);
}

#[test]
fn test_ambiguous_name_takes_first_candidate() {
    let mut main = Atom::new("app.js", "main");
    main.calls.push(CallSite::new("process", 1));
    let mut first = Atom::new("a/worker.js", "process");
    first.is_exported = true;
    let mut second = Atom::new("b/worker.js", "process");
    second.is_exported = true;
    let atoms = vec![main, first, second];

    let edges = resolve_all(&atoms);
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].callee_file, "a/worker.js");
    assert_eq!(edges[0].resolved_by, ResolvedBy::FirstCandidate);
    // base + exported
    assert_eq!(edges[0].confidence, 0.65);
}

fn mesh(files: usize) -> Vec<Atom> {
    let mut atoms = Vec::new();
    for i in 0..files {
        let mut atom = Atom::new(format!("src/m{i}.js"), format!("step{i}"));
        atom.is_exported = i % 3 == 0;
        atom.data_flow = Some(DataFlow {
            inputs: vec![Input::simple("input", 0)],
            outputs: vec![Output::returns()],
            transformations: vec![],
        });
        for j in [i + 1, i + 2, i * 7 + 3] {
            let target = j % files;
            atom.calls.push(
                CallSite::new(format!("step{target}"), j as u32)
                    .with_args(vec![RawArgument::member("ctx", "input")]),
            );
        }
        if i % 5 == 0 {
            // shadow with a same-file duplicate
            atoms.push(Atom::new(format!("src/m{i}.js"), format!("step{}", (i + 1) % files)));
        }
        atoms.push(atom);
    }
    atoms
}

#[test]
fn test_parallel_matches_sequential() {
    let atoms = mesh(64);
    let resolver = CrossFileResolver::new(&atoms)
        .with_config(ResolverConfig::default().with_parallel_threshold(0));

    let (sequential, seq_stats) = resolver.resolve_all_with_stats();
    let (parallel, par_stats) = resolver.resolve_all_parallel_with_stats();

    assert!(!sequential.is_empty());
    assert_eq!(sequential, parallel);
    assert_eq!(seq_stats, par_stats);
}

#[test]
fn test_edge_invariants() {
    let atoms = mesh(40);
    for edge in resolve_all(&atoms) {
        assert_ne!(edge.caller_file, edge.callee_file);
        assert!((0.0..=1.0).contains(&edge.confidence));
        assert_eq!((edge.confidence * 100.0).round() / 100.0, edge.confidence);
    }
}

#[test]
fn test_edge_map_only_holds_callers() {
    let atoms = parse_atoms(MATH_APP).unwrap();
    let map = build_edge_map(&atoms);

    assert_eq!(map.len(), 1);
    assert!(map.contains("app.js::main"));
    assert!(!map.contains("math.js::add"));
    assert_eq!(map.callers_of("math.js::add").len(), 1);

    let journey = map.trace_journey("app.js::main", 5);
    assert_eq!(journey.len(), 1);
    assert_eq!(journey[0].depth, 1);
}

#[test]
fn test_untyped_argument_degrades_only_its_edge() {
    let json = r#"[
      {"id": "math.js::add", "name": "add", "filePath": "math.js", "isExported": true,
       "dataFlow": {"inputs": [{"name": "a", "type": "simple", "position": 0}], "outputs": [], "transformations": []}},
      {"id": "io.js::save", "name": "save", "filePath": "io.js", "isExported": true,
       "dataFlow": {"inputs": [{"name": "v", "type": "simple", "position": 0}], "outputs": [], "transformations": []}},
      {"id": "app.js::main", "name": "main", "filePath": "app.js",
       "calls": [
         {"name": "add", "line": 3, "args": [{"code": "x"}]},
         {"name": "save", "line": 4, "args": [{"type": "Identifier", "name": "v"}]}
       ]}
    ]"#;
    let atoms = parse_atoms(json).unwrap();
    let resolver = CrossFileResolver::new(&atoms);
    let (edges, stats) = resolver.resolve_all_with_stats();

    assert_eq!(edges.len(), 2);
    assert_eq!(stats.degraded_mappings, 1);
    assert_eq!(edges[0].callee_id, "math.js::add");
    assert!(edges[0].mapping.error);
    assert_eq!(edges[1].callee_id, "io.js::save");
    assert!(!edges[1].mapping.error);
    assert_eq!(edges[1].mapping.mappings.len(), 1);
}

#[test]
fn test_edge_map_follows_atom_order() {
    let mut util = Atom::new("lib/util.js", "util");
    util.is_exported = true;
    let mut zeta = Atom::new("src/zeta.js", "zeta");
    zeta.calls.push(CallSite::new("util", 1));
    let mut alpha = Atom::new("src/alpha.js", "alpha");
    alpha.calls.push(CallSite::new("util", 2));
    let atoms = vec![zeta, util, alpha];

    let map = build_edge_map(&atoms);
    let callers: Vec<_> = map.iter().map(|(id, _)| id).collect();
    assert_eq!(callers, ["src/zeta.js::zeta", "src/alpha.js::alpha"]);

    let reverse: Vec<_> = map
        .callers_of("lib/util.js::util")
        .iter()
        .map(|e| e.caller_id.as_str())
        .collect();
    assert_eq!(reverse, callers);
}
