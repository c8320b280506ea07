//! Name resolution tests

use minipas::diagnostics::{CompileError, ErrorCode};
use minipas::parser::parse;
use minipas::resolve::{Analysis, SymbolKind, analyze};
use pretty_assertions::assert_eq;

fn analyze_source(src: &str) -> Result<Analysis, CompileError> {
    let program = parse(src).expect("Parse failed");
    analyze(&program)
}

const NESTED: &str = r#"
program Main;
   var x, y : real;

   procedure AlphaA(a : integer);
      var y : integer;
   begin { AlphaA }
      x := a + x + y;
   end;  { AlphaA }

   procedure AlphaB(a : integer);
      var b : integer;
   begin { AlphaB }
   end;  { AlphaB }

begin { Main }
end.  { Main }
"#;

#[test]
fn test_globals_defined() {
    let analysis = analyze_source("program P; var a : integer; b : real; begin a := 1 end.")
        .expect("Analysis failed");
    let global = analysis.scopes.get(analysis.global);
    assert_eq!(global.level, 1);
    assert_eq!(global.enclosing, None);
    assert_eq!(
        global.get("a").and_then(|s| s.type_name()),
        Some("INTEGER")
    );
    assert_eq!(global.get("B").and_then(|s| s.type_name()), Some("REAL"));
}

#[test]
fn test_procedure_scopes() {
    let analysis = analyze_source(NESTED).expect("Analysis failed");
    assert_eq!(analysis.scopes.len(), 3);

    let alpha_a = analysis.scope("ALPHAA").expect("AlphaA scope");
    assert_eq!(alpha_a.level, 2);
    assert_eq!(alpha_a.enclosing, Some(analysis.global));
    let names: Vec<_> = alpha_a.variables().map(|s| s.to_string()).collect();
    assert_eq!(names, vec!["<A:INTEGER>", "<Y:INTEGER>"]);

    let global = analysis.scopes.get(analysis.global);
    match &global.get("AlphaB").expect("AlphaB symbol").kind {
        SymbolKind::Procedure { params } => {
            assert_eq!(params.len(), 1);
            assert_eq!(params[0].to_string(), "<A:INTEGER>");
        }
        other => panic!("Expected a procedure symbol, got {:?}", other),
    }
}

#[test]
fn test_shadowing_resolves_innermost() {
    let analysis = analyze_source(NESTED).expect("Analysis failed");
    let id = analysis
        .scopes
        .iter()
        .find(|(_, scope)| scope.name == "ALPHAA")
        .map(|(id, _)| id)
        .expect("AlphaA scope");

    let (scope, symbol) = analysis.scopes.resolve(id, "y").expect("y resolves");
    assert_eq!(scope.name, "ALPHAA");
    assert_eq!(symbol.type_name(), Some("INTEGER"));

    let (scope, symbol) = analysis.scopes.resolve(id, "x").expect("x resolves");
    assert_eq!(scope.name, "global");
    assert_eq!(symbol.type_name(), Some("REAL"));
}

#[test]
fn test_scope_trace() {
    let analysis = analyze_source(NESTED).expect("Analysis failed");
    assert_eq!(
        analysis.trace(),
        vec![
            "ENTER scope: global",
            "ENTER scope: ALPHAA",
            "LEAVE scope: ALPHAA",
            "ENTER scope: ALPHAB",
            "LEAVE scope: ALPHAB",
            "LEAVE scope: global",
        ]
    );
}

#[test]
fn test_scope_dump() {
    let analysis = analyze_source(NESTED).expect("Analysis failed");
    let alpha_b = analysis
        .scopes
        .iter()
        .find(|(_, scope)| scope.name == "ALPHAB")
        .map(|(id, _)| id)
        .expect("AlphaB scope");
    insta::assert_snapshot!(analysis.scopes.dump(alpha_b).to_string(), @r"
    SCOPE (SCOPED SYMBOL TABLE)
    ===========================
    Scope name: ALPHAB
    Scope level: 2
    Enclosing scope: global
    Scope (Scope symbol table) contents
    -----------------------------------
    <A:INTEGER>
    <B:INTEGER>
    ");
}

#[test]
fn test_undeclared_reference() {
    let err = analyze_source("program P; var a : integer;\nbegin\n  a := b + 1\nend.")
        .expect_err("b is not declared");
    assert_eq!(err.code(), Some(ErrorCode::IdNotFound));
    let token = err.token().unwrap();
    assert_eq!(token.text(), Some("B"));
    assert_eq!((token.line(), token.column()), (3, 8));
    insta::assert_snapshot!(err.to_string(), @"Identifier not found -> Token(ID, 'B', position=3:8)");
}

#[test]
fn test_undeclared_assignment_target() {
    let err = analyze_source("program P; begin z := 1 end.").expect_err("z is not declared");
    assert_eq!(err.code(), Some(ErrorCode::IdNotFound));
    assert_eq!(err.token().unwrap().text(), Some("Z"));
}

#[test]
fn test_duplicate_declaration() {
    let err = analyze_source("program P;\nvar a : integer;\n    a : real;\nbegin end.")
        .expect_err("a is declared twice");
    assert_eq!(err.code(), Some(ErrorCode::DuplicateId));
    let token = err.token().unwrap();
    assert_eq!((token.line(), token.column()), (3, 5));
}

#[test]
fn test_duplicate_is_case_insensitive() {
    let err = analyze_source("program P; var Total, TOTAL : integer; begin end.")
        .expect_err("same name in two cases");
    assert_eq!(err.code(), Some(ErrorCode::DuplicateId));
}

#[test]
fn test_local_may_shadow_global() {
    assert!(
        analyze_source(
            "program P; var a : integer;
             procedure Q; var a : real; begin a := 1.5 end;
             begin a := 1 end."
        )
        .is_ok()
    );
}

#[test]
fn test_local_not_visible_outside() {
    let err = analyze_source(
        "program P;
         procedure Q; var inner : integer; begin end;
         begin inner := 1 end.",
    )
    .expect_err("inner is local to Q");
    assert_eq!(err.code(), Some(ErrorCode::IdNotFound));
}

#[test]
fn test_local_duplicates_param() {
    let err = analyze_source(
        "program P; procedure Q(a : integer); var a : real; begin end; begin end.",
    )
    .expect_err("a is both parameter and local");
    assert_eq!(err.code(), Some(ErrorCode::DuplicateId));
}
