//! Single-pass AST-to-bytecode compiler (spec.md §4.4).

mod error;
mod loop_ctx;
mod scope;

use std::rc::Rc;

use bhasha_bytecode::{make, OpCode};
use bhasha_par::ast::{Block, Expression, InfixOperator, PrefixOperator, Program, Statement};
use bhasha_par::TypeTag;
use bhasha_sem::{Scope as SymScope, Symbol, SymbolTable};
use bhasha_util::{Handler, Span};
use bhasha_value::{CompiledFunction, Value, BUILTIN_NAMES};

pub use error::CompileError;
pub use loop_ctx::LoopContext;
pub use scope::{CompilationScope, EmittedInstruction};

/// The compiler's output: the main program's instruction stream plus the
/// shared constant pool, every `CompiledFunction` included (spec.md §3
/// "Bytecode").
#[derive(Debug)]
pub struct Bytecode {
    pub instructions: Vec<u8>,
    pub constants: Vec<Value>,
}

pub struct Compiler<'a> {
    constants: Vec<Value>,
    symbols: SymbolTable,
    scopes: Vec<CompilationScope>,
    loops: Vec<LoopContext>,
    handler: &'a mut Handler,
}

impl<'a> Compiler<'a> {
    /// Entry state (spec.md §4.4): one compilation scope for the main
    /// program, a global symbol table with every built-in pre-defined, an
    /// empty loop stack.
    pub fn new(handler: &'a mut Handler) -> Self {
        let mut symbols = SymbolTable::new();
        for (index, name) in BUILTIN_NAMES.iter().enumerate() {
            symbols.define_builtin(index, name);
        }
        Self {
            constants: Vec::new(),
            symbols,
            scopes: vec![CompilationScope::new()],
            loops: Vec::new(),
            handler,
        }
    }

    /// Compiles `program` against this compiler's symbol table. Takes `&mut
    /// self` rather than consuming it so a REPL host can call
    /// [`Self::into_symbols`] afterwards and feed the same table into the
    /// next line's compiler (spec.md §9.6 "incremental compilation").
    pub fn compile(&mut self, program: &Program) -> Bytecode {
        for statement in &program.statements {
            self.compile_statement(statement);
        }
        let main_scope = self.scopes.pop().expect("main compilation scope");
        self.scopes.push(CompilationScope::new());
        Bytecode {
            instructions: main_scope.instructions,
            constants: std::mem::take(&mut self.constants),
        }
    }

    /// Pre-populates the symbol table from a prior compilation (e.g. a
    /// REPL's previous line) instead of starting from an empty global scope.
    /// Built-ins are assumed already defined in `symbols`.
    pub fn new_with_symbols(handler: &'a mut Handler, symbols: SymbolTable) -> Self {
        Self {
            constants: Vec::new(),
            symbols,
            scopes: vec![CompilationScope::new()],
            loops: Vec::new(),
            handler,
        }
    }

    /// Recovers this compiler's symbol table, e.g. to hand to
    /// [`Self::new_with_symbols`] for the next incremental compilation.
    pub fn into_symbols(self) -> SymbolTable {
        self.symbols
    }

    // ---- emission primitives --------------------------------------------

    fn emit(&mut self, op: OpCode, operands: &[usize]) -> usize {
        let bytes = make(op, operands);
        let scope = self.scopes.last_mut().expect("a compilation scope");
        let position = scope.instructions.len();
        scope.instructions.extend_from_slice(&bytes);
        scope.previous_instruction = scope.last_instruction;
        scope.last_instruction = Some(EmittedInstruction {
            opcode: op,
            position,
        });
        position
    }

    fn current_position(&self) -> usize {
        self.scopes.last().expect("a compilation scope").instructions.len()
    }

    /// Rewrites the 2-byte big-endian operand at `pos + 1`. Every back-patch
    /// site in this compiler (`OpJump`/`OpJumpNotTruthy`) has a 2-byte
    /// operand, so there is no need to consult the operand-width table here.
    fn change_operand(&mut self, pos: usize, operand: usize) {
        let scope = self.scopes.last_mut().expect("a compilation scope");
        let bytes = (operand as u16).to_be_bytes();
        scope.instructions[pos + 1] = bytes[0];
        scope.instructions[pos + 2] = bytes[1];
    }

    fn last_is(&self, op: OpCode) -> bool {
        self.scopes.last().expect("a compilation scope").last_is(op)
    }

    fn remove_last_pop(&mut self) {
        if self.last_is(OpCode::Pop) {
            self.scopes.last_mut().expect("a compilation scope").remove_last();
        }
    }

    fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    fn emit_constant(&mut self, value: Value) -> usize {
        let index = self.add_constant(value);
        self.emit(OpCode::Constant, &[index])
    }

    fn emit_load(&mut self, symbol: &Symbol) -> usize {
        match symbol.scope {
            SymScope::Global => self.emit(OpCode::GetGlobal, &[symbol.index]),
            SymScope::Local => self.emit(OpCode::GetLocal, &[symbol.index]),
            SymScope::Builtin => self.emit(OpCode::GetBuiltin, &[symbol.index]),
            SymScope::Free => self.emit(OpCode::GetFree, &[symbol.index]),
            SymScope::Function => self.emit(OpCode::CurrentClosure, &[]),
        }
    }

    fn report(&mut self, span: Span, err: CompileError) {
        self.handler.error(span, err.to_string());
    }

    /// Used on every expression-compilation error path: keeps the net
    /// stack effect of `compile_expression` at exactly `+1` regardless of
    /// whether the expression was well-formed, so bytecode laid out around
    /// the failing expression stays self-consistent.
    fn report_expr_error(&mut self, span: Span, err: CompileError) {
        self.report(span, err);
        self.emit(OpCode::Null, &[]);
    }

    // ---- statements --------------------------------------------------

    fn compile_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::VariableBinding { name, value, .. } => {
                self.compile_expression(value);
                let symbol = self.symbols.define(name);
                self.emit_store(&symbol);
            }
            Statement::Reassignment { name, value, span } => {
                let Some(symbol) = self.symbols.resolve(name) else {
                    self.report(*span, CompileError::UndefinedIdentifier(name.clone()));
                    return;
                };
                match symbol.scope {
                    SymScope::Builtin => {
                        self.report(*span, CompileError::ReassignedBuiltin(name.clone()));
                    }
                    SymScope::Free | SymScope::Function => {
                        self.report(
                            *span,
                            CompileError::ReassignedCapturedVariable(name.clone()),
                        );
                    }
                    SymScope::Global | SymScope::Local => {
                        self.compile_expression(value);
                        self.emit_store(&symbol);
                    }
                }
            }
            Statement::MemberReassignment { span, .. } => {
                self.report(
                    *span,
                    CompileError::UnsupportedMutation(
                        "values are immutable in the core; member assignment has no opcode",
                    ),
                );
            }
            Statement::IndexReassignment { span, .. } => {
                self.report(
                    *span,
                    CompileError::UnsupportedMutation(
                        "values are immutable in the core; index assignment has no opcode",
                    ),
                );
            }
            Statement::Return { value, .. } => {
                match value {
                    Some(expr) => self.compile_expression(expr),
                    None => {
                        self.emit(OpCode::Null, &[]);
                    }
                }
                self.emit(OpCode::ReturnValue, &[]);
            }
            Statement::Expression { value, .. } => {
                self.compile_expression(value);
                self.emit(OpCode::Pop, &[]);
            }
            Statement::Block(block) => self.compile_block(block),
            Statement::While { condition, body, .. } => self.compile_while(condition, body),
            Statement::For {
                init,
                condition,
                update,
                body,
                ..
            } => self.compile_for(init.as_deref(), condition.as_ref(), update.as_deref(), body),
            Statement::Break { span } => self.compile_loop_control(*span, true),
            Statement::Continue { span } => self.compile_loop_control(*span, false),
            Statement::Import { .. } => {
                // Resolving and splicing an imported module's statements is
                // a host/facade concern (see the `ModuleLoader` collaborator
                // trait); the compiler itself lowers nothing for `import`.
            }
        }
    }

    fn emit_store(&mut self, symbol: &Symbol) -> usize {
        match symbol.scope {
            SymScope::Global => self.emit(OpCode::SetGlobal, &[symbol.index]),
            SymScope::Local => self.emit(OpCode::SetLocal, &[symbol.index]),
            other => unreachable!("define()/resolve() never yields {other:?} for a store target"),
        }
    }

    fn compile_block(&mut self, block: &Block) {
        for statement in &block.statements {
            self.compile_statement(statement);
        }
    }

    fn compile_while(&mut self, condition: &Expression, body: &Block) {
        let loop_start = self.current_position();
        self.loops.push(LoopContext::new(loop_start));
        self.compile_expression(condition);
        let jump_not_truthy = self.emit(OpCode::JumpNotTruthy, &[0]);
        self.compile_block(body);
        self.emit(OpCode::Jump, &[loop_start]);
        let after_loop = self.current_position();
        self.change_operand(jump_not_truthy, after_loop);
        self.patch_loop(after_loop, loop_start);
    }

    fn compile_for(
        &mut self,
        init: Option<&Statement>,
        condition: Option<&Expression>,
        update: Option<&Statement>,
        body: &Block,
    ) {
        if let Some(init) = init {
            self.compile_statement(init);
        }
        let cond_start = self.current_position();
        self.loops.push(LoopContext::new(cond_start));
        let jump_not_truthy = condition.map(|cond| {
            self.compile_expression(cond);
            self.emit(OpCode::JumpNotTruthy, &[0])
        });
        self.compile_block(body);
        let continue_target = if let Some(update) = update {
            let target = self.current_position();
            self.compile_statement(update);
            target
        } else {
            cond_start
        };
        self.emit(OpCode::Jump, &[cond_start]);
        let after_loop = self.current_position();
        if let Some(pos) = jump_not_truthy {
            self.change_operand(pos, after_loop);
        }
        self.patch_loop(after_loop, continue_target);
    }

    fn patch_loop(&mut self, break_target: usize, continue_target: usize) {
        let ctx = self.loops.pop().expect("a loop context pushed just above");
        for pos in ctx.break_fixups {
            self.change_operand(pos, break_target);
        }
        for pos in ctx.continue_fixups {
            self.change_operand(pos, continue_target);
        }
    }

    fn compile_loop_control(&mut self, span: Span, is_break: bool) {
        let keyword = if is_break { "break" } else { "continue" };
        if self.loops.is_empty() {
            self.report(span, CompileError::LoopControlOutsideLoop(keyword));
            return;
        }
        let pos = self.emit(OpCode::Jump, &[0]);
        let ctx = self.loops.last_mut().expect("checked non-empty above");
        if is_break {
            ctx.break_fixups.push(pos);
        } else {
            ctx.continue_fixups.push(pos);
        }
    }

    // ---- expressions ---------------------------------------------------

    fn compile_expression(&mut self, expr: &Expression) {
        match expr {
            Expression::Identifier(name, span) => match self.symbols.resolve(name) {
                Some(symbol) => {
                    self.emit_load(&symbol);
                }
                None => {
                    self.report_expr_error(*span, CompileError::UndefinedIdentifier(name.clone()))
                }
            },
            Expression::IntegerLiteral(n, _) => {
                self.emit_constant(Value::Integer(*n));
            }
            Expression::StringLiteral(s, _) => {
                self.emit_constant(Value::String(Rc::from(s.as_str())));
            }
            Expression::BooleanLiteral(true, _) => {
                self.emit(OpCode::True, &[]);
            }
            Expression::BooleanLiteral(false, _) => {
                self.emit(OpCode::False, &[]);
            }
            Expression::NullLiteral(_) => {
                self.emit(OpCode::Null, &[]);
            }
            Expression::Prefix {
                operator, operand, ..
            } => {
                self.compile_expression(operand);
                self.emit(prefix_opcode(*operator), &[]);
            }
            Expression::Infix {
                left,
                operator,
                right,
                ..
            } => self.compile_infix(left, *operator, right),
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => self.compile_if(condition, consequence, alternative.as_ref()),
            Expression::FunctionLiteral {
                name,
                parameters,
                body,
                ..
            } => self.compile_function_literal(name.as_deref(), parameters, body),
            Expression::Call {
                function,
                arguments,
                ..
            } => {
                self.compile_expression(function);
                for arg in arguments {
                    self.compile_expression(arg);
                }
                self.emit(OpCode::Call, &[arguments.len()]);
            }
            Expression::ArrayLiteral { elements, .. } => {
                for element in elements {
                    self.compile_expression(element);
                }
                self.emit(OpCode::Array, &[elements.len()]);
            }
            Expression::HashLiteral { pairs, .. } => {
                for (key, value) in pairs {
                    self.compile_expression(key);
                    self.compile_expression(value);
                }
                self.emit(OpCode::Hash, &[pairs.len() * 2]);
            }
            Expression::Index {
                collection, index, ..
            } => {
                self.compile_expression(collection);
                self.compile_expression(index);
                self.emit(OpCode::Index, &[]);
            }
            Expression::MemberAccess { object, member, .. } => {
                // Desugars to indexing by field name: a struct literal
                // compiles to a Hash keyed by field name (see
                // `StructLiteral` below), so `obj.field` and `obj["field"]`
                // reach the same `OpIndex`.
                self.compile_expression(object);
                self.emit_constant(Value::String(Rc::from(member.as_str())));
                self.emit(OpCode::Index, &[]);
            }
            Expression::TypeCast { value, target, span } => {
                self.compile_expression(value);
                match cast_target_name(target.tag) {
                    Some(name) => {
                        let idx = self.add_constant(Value::String(Rc::from(name)));
                        self.emit(OpCode::TypeCast, &[idx]);
                    }
                    None => self.report(*span, CompileError::MalformedTypeAnnotation),
                }
            }
            Expression::TypeAnnotation(_, _) => {
                // Decorative: type annotations are retained but never
                // enforced at runtime in the core.
                self.emit(OpCode::Null, &[]);
            }
            Expression::SelfRef(_) | Expression::ParentRef(_) => {
                // OOP is parsed but not executed in the core.
                self.emit(OpCode::Null, &[]);
            }
            Expression::New { .. } => {
                self.emit(OpCode::Null, &[]);
            }
            Expression::StructDefinition { .. } | Expression::EnumDefinition { .. } => {
                // A type-shape declaration, not a value; nothing to compute.
                self.emit(OpCode::Null, &[]);
            }
            Expression::StructLiteral { fields, .. } => {
                for (field_name, value) in fields {
                    self.emit_constant(Value::String(Rc::from(field_name.as_str())));
                    self.compile_expression(value);
                }
                self.emit(OpCode::Hash, &[fields.len() * 2]);
            }
            Expression::EnumValue {
                enum_name, variant, ..
            } => {
                self.emit_constant(Value::String(Rc::from(format!("{enum_name}.{variant}"))));
            }
        }
    }

    fn compile_infix(&mut self, left: &Expression, operator: InfixOperator, right: &Expression) {
        match operator {
            InfixOperator::LessThan => {
                self.compile_expression(right);
                self.compile_expression(left);
                self.emit(OpCode::GreaterThan, &[]);
            }
            InfixOperator::LessEqual => {
                self.compile_expression(right);
                self.compile_expression(left);
                self.emit(OpCode::GreaterThanEqual, &[]);
            }
            _ => {
                self.compile_expression(left);
                self.compile_expression(right);
                self.emit(infix_opcode(operator), &[]);
            }
        }
    }

    fn compile_if(&mut self, condition: &Expression, consequence: &Block, alternative: Option<&Block>) {
        self.compile_expression(condition);
        let jump_not_truthy = self.emit(OpCode::JumpNotTruthy, &[0]);
        self.compile_block(consequence);
        self.remove_last_pop();
        let jump_over_alt = self.emit(OpCode::Jump, &[0]);
        let after_consequence = self.current_position();
        self.change_operand(jump_not_truthy, after_consequence);

        match alternative {
            Some(alt) => {
                self.compile_block(alt);
                self.remove_last_pop();
            }
            None => {
                self.emit(OpCode::Null, &[]);
            }
        }
        let after_alternative = self.current_position();
        self.change_operand(jump_over_alt, after_alternative);
    }

    fn compile_function_literal(&mut self, name: Option<&str>, parameters: &[bhasha_par::Parameter], body: &Block) {
        self.scopes.push(CompilationScope::new());
        self.symbols.enter_scope();

        if let Some(name) = name {
            self.symbols.define_function_name(name);
        }
        for parameter in parameters {
            self.symbols.define(&parameter.name);
        }

        self.compile_block(body);

        if self.last_is(OpCode::Pop) {
            self.scopes
                .last_mut()
                .expect("a compilation scope")
                .replace_last_opcode(OpCode::ReturnValue);
        }
        if !self.last_is(OpCode::ReturnValue) {
            self.emit(OpCode::Return, &[]);
        }

        let free_symbols = self.symbols.free_variables().to_vec();
        let num_locals = self.symbols.num_definitions();
        self.symbols.leave_scope();
        let function_scope = self.scopes.pop().expect("the function's own scope");

        for symbol in &free_symbols {
            self.emit_load(symbol);
        }

        let compiled = CompiledFunction {
            instructions: function_scope.instructions,
            num_locals,
            num_parameters: parameters.len(),
        };
        let const_idx = self.add_constant(Value::CompiledFunction(Rc::new(compiled)));
        self.emit(OpCode::Closure, &[const_idx, free_symbols.len()]);
    }
}

fn prefix_opcode(op: PrefixOperator) -> OpCode {
    match op {
        PrefixOperator::Negate => OpCode::Minus,
        PrefixOperator::Not => OpCode::Bang,
        PrefixOperator::BitNot => OpCode::BitNot,
    }
}

fn infix_opcode(op: InfixOperator) -> OpCode {
    match op {
        InfixOperator::Add => OpCode::Add,
        InfixOperator::Subtract => OpCode::Sub,
        InfixOperator::Multiply => OpCode::Mul,
        InfixOperator::Divide => OpCode::Div,
        InfixOperator::Modulo => OpCode::Mod,
        InfixOperator::Equal => OpCode::Equal,
        InfixOperator::NotEqual => OpCode::NotEqual,
        InfixOperator::GreaterThan => OpCode::GreaterThan,
        InfixOperator::GreaterEqual => OpCode::GreaterThanEqual,
        InfixOperator::And => OpCode::And,
        InfixOperator::Or => OpCode::Or,
        InfixOperator::BitAnd => OpCode::BitAnd,
        InfixOperator::BitOr => OpCode::BitOr,
        InfixOperator::BitXor => OpCode::BitXor,
        InfixOperator::ShiftLeft => OpCode::LeftShift,
        InfixOperator::ShiftRight => OpCode::RightShift,
        InfixOperator::LessThan | InfixOperator::LessEqual => {
            unreachable!("lowered by operand swap in compile_infix")
        }
    }
}

/// The cast-target table (spec.md §4.7 "Type operations"); `Bool` and the
/// two generic tags have no cast target.
fn cast_target_name(tag: TypeTag) -> Option<&'static str> {
    Some(match tag {
        TypeTag::Byte => "Byte",
        TypeTag::Short => "Short",
        TypeTag::Int => "Int",
        TypeTag::Long => "Long",
        TypeTag::Float => "Float",
        TypeTag::Double => "Double",
        TypeTag::Char => "Char",
        TypeTag::String => "String",
        TypeTag::Bool | TypeTag::OrderedSequence | TypeTag::Mapping => return None,
    })
}
