//! Scope-annotated source printer
//!
//! Every declared name is suffixed with the level of the scope it lives in
//! (the program name sits at level 0), and every variable reference becomes
//! `<NAME<level>:TYPE>`. Procedure and program bodies are closed with an
//! `{END OF NAME}` comment.

use super::{Names, RenderOptions, Writer, param_list};
use crate::ast::*;
use crate::diagnostics::{CompileError, ErrorCode, Result};
use crate::lexer::Token;
use crate::resolve::{Analysis, ScopeEvent, ScopeId, ScopeTree, SymbolKind, analyze};

/// Annotate a program with scope levels
///
/// Runs semantic analysis first, so an invalid program fails with exactly the
/// error [`analyze`] would report.
pub fn annotate(program: &Program, options: &RenderOptions) -> Result<String> {
    let analysis = analyze(program)?;
    let mut annotator = Annotator::new(&analysis, options.indent);

    annotator
        .writer
        .line(0, &format!("program {}0;", program.name.name));
    let global = annotator.next_scope(&program.name)?;
    annotator.block(&program.block, global, 0)?;

    let mut names = Resolved {
        scopes: &analysis.scopes,
        scope: global,
    };
    let terminator = format!(". {{END OF {}}}", program.name.name);
    annotator
        .writer
        .compound(&program.block.body, 0, &terminator, &mut names)?;
    Ok(annotator.writer.finish())
}

struct Annotator<'a> {
    scopes: &'a ScopeTree,
    /// Scopes in the order analysis entered them
    entered: Vec<ScopeId>,
    cursor: usize,
    writer: Writer,
}

impl<'a> Annotator<'a> {
    fn new(analysis: &'a Analysis, indent: usize) -> Self {
        let entered = analysis
            .events
            .iter()
            .filter_map(|event| match event {
                ScopeEvent::Enter(id) => Some(*id),
                ScopeEvent::Leave(_) => None,
            })
            .collect();
        Self {
            scopes: &analysis.scopes,
            entered,
            cursor: 0,
            writer: Writer::new(indent),
        }
    }

    /// The walk below visits blocks in the same order analysis did, so the
    /// next entered scope belongs to the block `owner` names
    fn next_scope(&mut self, owner: &Ident) -> Result<ScopeId> {
        let id = self.entered.get(self.cursor).copied().ok_or_else(|| {
            CompileError::semantic(
                ErrorCode::IdNotFound,
                Token::ident(owner.name.clone(), owner.span),
            )
        })?;
        self.cursor += 1;
        Ok(id)
    }

    fn level(&self, scope: ScopeId) -> u32 {
        self.scopes.get(scope).level
    }

    fn block(&mut self, block: &Block, scope: ScopeId, depth: usize) -> Result<()> {
        let level = self.level(scope);
        for decl in &block.declarations {
            match decl {
                Decl::Var(var) => {
                    self.writer.line(
                        depth + 1,
                        &format!("var {}{} : {};", var.var.name, level, var.ty.name()),
                    );
                }
                Decl::Procedure(procedure) => {
                    let inner = self.next_scope(&procedure.name)?;
                    let inner_level = self.level(inner);
                    let params = param_list(&procedure.params, |param| {
                        format!("{}{} : {}", param.var.name, inner_level, param.ty.name())
                    });
                    self.writer.line(
                        depth + 1,
                        &format!("procedure {}{}{};", procedure.name.name, level, params),
                    );
                    self.block(&procedure.block, inner, depth + 1)?;

                    let mut names = Resolved {
                        scopes: self.scopes,
                        scope: inner,
                    };
                    let terminator = format!("; {{END OF {}}}", procedure.name.name);
                    self.writer
                        .compound(&procedure.block.body, depth + 1, &terminator, &mut names)?;
                }
            }
        }
        Ok(())
    }
}

/// References resolved against a finished scope tree
struct Resolved<'a> {
    scopes: &'a ScopeTree,
    scope: ScopeId,
}

impl Names for Resolved<'_> {
    type Error = CompileError;

    fn reference(&mut self, ident: &Ident) -> Result<String> {
        let (scope, symbol) = self
            .scopes
            .resolve(self.scope, &ident.name)
            .ok_or_else(|| {
                CompileError::semantic(
                    ErrorCode::IdNotFound,
                    Token::ident(ident.name.clone(), ident.span),
                )
            })?;
        Ok(match &symbol.kind {
            SymbolKind::Variable { ty } => format!("<{}{}:{}>", ident.name, scope.level, ty),
            SymbolKind::BuiltinType | SymbolKind::Procedure { .. } => {
                format!("<{}{}>", ident.name, scope.level)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_procedures() {
        let program = parse(
            "program Main;
             var x : real;
             procedure Alpha(a : integer);
               procedure Beta;
               var x : integer;
               begin x := a end;
             begin end;
             begin end.",
        )
        .unwrap();
        let text = annotate(&program, &RenderOptions { indent: 2 }).unwrap();
        assert_eq!(
            text,
            "program MAIN0;
  var X1 : REAL;
  procedure ALPHA1(A2 : INTEGER);
    procedure BETA2;
      var X3 : INTEGER;
    begin
      <X3:INTEGER> := <A2:INTEGER>
    end; {END OF BETA}
  begin
  end; {END OF ALPHA}
begin
end. {END OF MAIN}
"
        );
    }

    #[test]
    fn test_analysis_errors_pass_through() {
        let program = parse("program P; begin a := 1 end.").unwrap();
        let err = annotate(&program, &RenderOptions::default()).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::IdNotFound));
    }
}
