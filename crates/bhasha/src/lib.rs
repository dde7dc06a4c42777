//! Ties the lexer, parser, compiler and VM into one `compile`/`run` pipeline
//! (spec.md §9 "Host interfaces").
//!
//! This crate is the only one in the workspace that knows about every
//! stage at once; everything downstream of it (a CLI, a REPL, an embedder)
//! is a host concern outside this crate's scope (SPEC_FULL.md §9.6).

mod module_loader;

use std::collections::HashSet;

use bhasha_compiler::Compiler;
use bhasha_par::{Parser, Program, Statement};
use bhasha_sem::SymbolTable;
use bhasha_util::Handler;
use bhasha_value::Value;
use bhasha_vm::{RuntimeError, Vm, GLOBALS_SIZE};

pub use module_loader::{ModuleLoadError, ModuleLoader, NullModuleLoader};

/// Re-declared so callers of this crate never need a direct dependency on
/// `bhasha-vm` just to name the type `compile` returns.
pub type Bytecode = bhasha_vm::Bytecode;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RunError {
    /// Lexing, parsing or compiling reported at least one diagnostic;
    /// inspect the `Handler` passed to `compile`/`run` for the details
    /// (spec.md §6.6).
    #[error("compilation reported diagnostics")]
    Diagnostics,
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Parses and compiles `source` with no import support: an `আমদানি`
/// statement simply fails to resolve (spec.md §8's scenarios are all
/// single-file). Use [`compile_with_loader`] to splice in real modules.
pub fn compile(source: &str, handler: &mut Handler) -> Option<Bytecode> {
    compile_with_loader(source, handler, &mut NullModuleLoader)
}

/// Parses `source`, recursively resolving `আমদানি` statements through
/// `loader` and splicing each module's statements in at the import site,
/// then compiles the result. Returns `None` if parsing, import resolution
/// or compiling raised any diagnostic.
pub fn compile_with_loader(
    source: &str,
    handler: &mut Handler,
    loader: &mut dyn ModuleLoader,
) -> Option<Bytecode> {
    let program = parse_and_splice(source, handler, loader)?;
    let mut compiler = Compiler::new(handler);
    let compiled = compiler.compile(&program);
    if handler.has_errors() {
        return None;
    }
    Some(bhasha_vm::Bytecode {
        instructions: compiled.instructions,
        constants: compiled.constants,
    })
}

/// Parses `source` and splices in every resolvable `আমদানি`, or `None` if
/// parsing, import resolution or module parsing raised any diagnostic.
/// Shared between [`compile_with_loader`] and [`ReplSession`].
fn parse_and_splice(
    source: &str,
    handler: &mut Handler,
    loader: &mut dyn ModuleLoader,
) -> Option<Program> {
    let mut parser = Parser::new(source, handler);
    let program = parser.parse_program();
    if handler.has_errors() {
        return None;
    }
    let mut visited = HashSet::new();
    let program = splice_imports(program, loader, handler, &mut visited)?;
    if handler.has_errors() {
        return None;
    }
    Some(program)
}

/// Replaces every `Statement::Import` with the statements of the module it
/// names, loaded through `loader`. A path already visited in this splice
/// (directly or transitively) is skipped rather than re-spliced, so an
/// import cycle terminates instead of recursing forever.
fn splice_imports(
    program: Program,
    loader: &mut dyn ModuleLoader,
    handler: &mut Handler,
    visited: &mut HashSet<String>,
) -> Option<Program> {
    let mut statements = Vec::new();
    for stmt in program.statements {
        let Statement::Import { path, span } = &stmt else {
            statements.push(stmt);
            continue;
        };
        if !visited.insert(path.clone()) {
            continue;
        }
        let module_source = match loader.load(path) {
            Ok(source) => source,
            Err(e) => {
                handler.error(*span, format!("cannot import \"{path}\": {e}"));
                continue;
            }
        };
        let mut module_handler = Handler::new();
        let module_program = Parser::new(&module_source, &mut module_handler).parse_program();
        if module_handler.has_errors() {
            handler.error(*span, format!("module \"{path}\" failed to parse"));
            continue;
        }
        if let Some(spliced) = splice_imports(module_program, loader, handler, visited) {
            statements.extend(spliced.statements);
        }
    }
    Some(Program { statements })
}

/// Compiles and runs `source` in a fresh VM, returning the value of the
/// final top-level expression statement.
pub fn run(source: &str, handler: &mut Handler) -> Result<Value, RunError> {
    let bytecode = compile(source, handler).ok_or(RunError::Diagnostics)?;
    Vm::new(bytecode).run().map_err(RunError::Runtime)
}

/// Holds the state that must survive across independently-compiled lines of
/// source for a REPL host to see each line's top-level `ধরি` bindings in the
/// next (spec.md §9.6 "incremental compilation"): both the VM's global value
/// array and the compiler's symbol table, since a name only resolves to the
/// same global slot if the *same* symbol table is still in scope when its
/// next use is compiled. Persisting the globals store alone (as `Vm` offers
/// via [`bhasha_vm::new_globals_store`]) is not enough on its own.
pub struct ReplSession {
    symbols: Option<SymbolTable>,
    globals: Box<[Value; GLOBALS_SIZE]>,
}

impl Default for ReplSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplSession {
    pub fn new() -> Self {
        Self {
            symbols: None,
            globals: bhasha_vm::new_globals_store(),
        }
    }

    /// Compiles and runs one line against this session's accumulated
    /// symbols and globals, with no import support.
    pub fn eval(&mut self, source: &str, handler: &mut Handler) -> Result<Value, RunError> {
        self.eval_with_loader(source, handler, &mut NullModuleLoader)
    }

    /// Compiles and runs one line, resolving `আমদানি` statements through
    /// `loader`.
    pub fn eval_with_loader(
        &mut self,
        source: &str,
        handler: &mut Handler,
        loader: &mut dyn ModuleLoader,
    ) -> Result<Value, RunError> {
        let program = parse_and_splice(source, handler, loader).ok_or(RunError::Diagnostics)?;

        let mut compiler = match self.symbols.take() {
            Some(symbols) => Compiler::new_with_symbols(handler, symbols),
            None => Compiler::new(handler),
        };
        let compiled = compiler.compile(&program);
        self.symbols = Some(compiler.into_symbols());
        if handler.has_errors() {
            return Err(RunError::Diagnostics);
        }
        let bytecode = bhasha_vm::Bytecode {
            instructions: compiled.instructions,
            constants: compiled.constants,
        };

        let globals = std::mem::replace(&mut self.globals, bhasha_vm::new_globals_store());
        let mut vm = Vm::new_with_globals_store(bytecode, globals);
        let result = vm.run().map_err(RunError::Runtime);
        self.globals = vm.into_globals();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_and_runs_a_trivial_expression() {
        let mut handler = Handler::new();
        let result = run("১ + ২;", &mut handler);
        assert_eq!(result.unwrap(), Value::Integer(3));
    }

    #[test]
    fn a_parse_error_surfaces_as_diagnostics() {
        let mut handler = Handler::new();
        let result = run("ধরি;", &mut handler);
        assert!(matches!(result, Err(RunError::Diagnostics)));
        assert!(handler.has_errors());
    }

    #[test]
    fn division_by_zero_surfaces_as_a_runtime_error() {
        let mut handler = Handler::new();
        let result = run("১ / ০;", &mut handler);
        assert_eq!(result.unwrap_err(), RunError::Runtime(RuntimeError::DivisionByZero));
    }

    #[test]
    fn an_unresolved_import_reports_a_diagnostic() {
        let mut handler = Handler::new();
        let result = run("আমদানি \"utils\";", &mut handler);
        assert!(matches!(result, Err(RunError::Diagnostics)));
    }

    struct FakeLoader;

    impl ModuleLoader for FakeLoader {
        fn load(&mut self, path: &str) -> Result<String, ModuleLoadError> {
            if path == "constants" {
                Ok("ধরি উত্তর = ৪২;".to_string())
            } else {
                Err(ModuleLoadError::NotFound(path.to_string()))
            }
        }
    }

    #[test]
    fn a_resolved_import_splices_the_modules_statements_in() {
        let mut handler = Handler::new();
        let mut loader = FakeLoader;
        let source = "আমদানি \"constants\";\nউত্তর;";
        let bytecode = compile_with_loader(source, &mut handler, &mut loader).unwrap();
        let result = Vm::new(bytecode).run().unwrap();
        assert_eq!(result, Value::Integer(42));
    }

    #[test]
    fn globals_persist_across_two_repl_session_evaluations() {
        let mut handler = Handler::new();
        let mut session = ReplSession::new();
        session.eval("ধরি ক = ১০;", &mut handler).unwrap();
        let second = session.eval("ক + ১;", &mut handler);
        assert_eq!(second.unwrap(), Value::Integer(11));
    }

    #[test]
    fn a_second_global_binding_does_not_collide_with_the_first() {
        let mut handler = Handler::new();
        let mut session = ReplSession::new();
        session.eval("ধরি ক = ১০;", &mut handler).unwrap();
        session.eval("ধরি খ = ৫;", &mut handler).unwrap();
        let sum = session.eval("ক + খ;", &mut handler);
        assert_eq!(sum.unwrap(), Value::Integer(15));
    }
}
