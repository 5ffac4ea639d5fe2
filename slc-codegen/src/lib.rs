//! Stel Language Compiler - Code Generation Driver
//!
//! Lowers a parsed Stel program into a verified IR module. The driver
//! owns the module and the instruction builder, declares the external
//! runtime functions before any call can reference them, and only ever
//! hands out a module whose definitions have been verified.

use log::debug;
use slc_common::{BinOp, CompilerError, Expr, Program, SourceLocation};
use slc_ir::{IrBinaryOp, IrBuilder, IrError, IrType, Module, TypedValue, Value};

/// Name of the entry function generated for every program
const ENTRY_FUNCTION: &str = "main";

/// Label of the entry block
const ENTRY_BLOCK: &str = "entry";

/// Code generator for Stel programs.
///
/// One generator drives one module. Compiling a second program on the
/// same generator reuses the entry function and replaces its body.
pub struct CodeGenerator {
    module: Module,
    builder: IrBuilder,
}

impl CodeGenerator {
    /// Create a generator with the external runtime surface declared
    pub fn new(module_name: &str) -> Result<Self, CompilerError> {
        let mut module = Module::new(module_name);
        declare_runtime_functions(&mut module).map_err(into_compiler_error)?;
        Ok(Self {
            module,
            builder: IrBuilder::new(),
        })
    }

    /// Compile one program into the module's entry function
    pub fn compile(&mut self, program: &Program) -> Result<&Module, CompilerError> {
        let entry_ty = IrType::function(IrType::I32, vec![], false);
        let _ = self
            .module
            .declare_function(ENTRY_FUNCTION, &entry_ty)
            .map_err(into_compiler_error)?;
        self.builder
            .create_function(ENTRY_FUNCTION, &entry_ty)
            .map_err(into_compiler_error)?;
        self.builder
            .create_block(ENTRY_BLOCK)
            .map_err(into_compiler_error)?;

        let result = self.gen_expr(&program.body)?;
        // A top-level call is a statement; such programs exit with 0
        let result = match &program.body {
            Expr::Call { .. } => self
                .builder
                .build_const_int(32, 0)
                .map_err(into_compiler_error)?,
            _ => result,
        };

        // Cast to the entry function's return type before returning
        let result = self
            .builder
            .build_int_cast(&result, &IrType::I32, true)
            .map_err(into_compiler_error)?;
        self.builder
            .build_return(Some(&result))
            .map_err(into_compiler_error)?;

        let function = self
            .builder
            .finish_function()
            .map_err(into_compiler_error)?;
        self.module
            .define_function(function)
            .map_err(into_compiler_error)?;
        debug!("compiled program into '{ENTRY_FUNCTION}'");
        Ok(&self.module)
    }

    /// The module being built
    pub fn module(&self) -> &Module {
        &self.module
    }

    fn gen_expr(&mut self, expr: &Expr) -> Result<TypedValue, CompilerError> {
        match expr {
            Expr::IntLit(value) => {
                let width = if i32::try_from(*value).is_ok() { 32 } else { 64 };
                self.builder
                    .build_const_int(width, *value)
                    .map_err(into_compiler_error)
            }
            Expr::StrLit(text) => Ok(self.module.intern_string(text)),
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.gen_expr(lhs)?;
                let rhs = self.gen_expr(rhs)?;
                self.builder
                    .build_binary(convert_binop(*op), &lhs, &rhs)
                    .map_err(into_compiler_error)
            }
            Expr::Call { callee, args } => {
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.gen_expr(arg)?);
                }
                let Some(callee) = self.module.get_function(callee) else {
                    return Err(into_compiler_error(IrError::undeclared(callee.as_str())));
                };
                let result = self
                    .builder
                    .build_call(callee, &arg_values)
                    .map_err(into_compiler_error)?;
                Ok(result.unwrap_or_else(|| TypedValue::new(Value::Constant(0), IrType::I32)))
            }
            other => Err(CompilerError::unsupported(other.kind())),
        }
    }
}

/// Declare the external C runtime functions programs may call
fn declare_runtime_functions(module: &mut Module) -> Result<(), IrError> {
    // int printf(const char *format, ...)
    let printf_ty = IrType::function(IrType::I32, vec![IrType::ptr(IrType::I8)], true);
    let _ = module.declare_function("printf", &printf_ty)?;
    Ok(())
}

fn convert_binop(op: BinOp) -> IrBinaryOp {
    match op {
        BinOp::Add => IrBinaryOp::Add,
        BinOp::Sub => IrBinaryOp::Sub,
        BinOp::Mul => IrBinaryOp::Mul,
        BinOp::Div => IrBinaryOp::SDiv,
        BinOp::Rem => IrBinaryOp::SRem,
    }
}

fn into_compiler_error(err: IrError) -> CompilerError {
    CompilerError::codegen_error(err.to_string(), SourceLocation::dummy())
}
