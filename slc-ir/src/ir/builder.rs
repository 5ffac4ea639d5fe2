//! IR Builder
//!
//! Stateful cursor for constructing IR incrementally. The builder holds
//! exactly one insertion point (the current block of the function being
//! built); it is single-cursor and not safe for concurrent use. Misuse
//! of the cursor is a [`IrError::BuilderState`] error carrying the
//! function and block names; nothing is appended on failure.

use crate::ir::{
    Function, Instruction, IrBinaryOp, IrError, IrType, IrUnaryOp, TypedValue, Value,
};
use log::{debug, trace};
use slc_common::TempId;

/// Builder for constructing IR
pub struct IrBuilder {
    current_function: Option<Function>,
    current_block: Option<String>,
    next_temp_id: TempId,
}

impl IrBuilder {
    pub fn new() -> Self {
        Self {
            current_function: None,
            current_block: None,
            next_temp_id: 0,
        }
    }

    fn new_temp(&mut self) -> TempId {
        let temp = self.next_temp_id;
        self.next_temp_id += 1;
        temp
    }

    fn current_name(&self) -> String {
        self.current_function
            .as_ref()
            .map(|f| f.name.clone())
            .unwrap_or_else(|| "<no function>".to_string())
    }

    /// Open a fresh definition body for `name`.
    ///
    /// The previous function must have been taken with
    /// [`finish_function`](Self::finish_function) first; partially built
    /// functions are never dropped silently.
    pub fn create_function(&mut self, name: &str, ty: &IrType) -> Result<(), IrError> {
        if !ty.is_function() {
            return Err(IrError::structural(
                name,
                format!("'{ty}' is not a function type"),
            ));
        }
        if let Some(open) = &self.current_function {
            return Err(IrError::builder_state(
                name,
                format!("function '{}' is still open", open.name),
            ));
        }
        debug!("opening function '{name}': {ty}");
        self.current_function = Some(Function::definition(name, ty.clone()));
        self.current_block = None;
        // Reset temp counter for new function
        self.next_temp_id = 0;
        Ok(())
    }

    /// Append a block to the current function and move the cursor to it.
    /// The first block created is the function's entry block.
    pub fn create_block(&mut self, label: &str) -> Result<(), IrError> {
        let func_name = self.current_name();
        let Some(function) = self.current_function.as_mut() else {
            return Err(IrError::builder_state(func_name, "no function is open"));
        };
        function.add_block(label)?;
        self.current_block = Some(label.to_string());
        Ok(())
    }

    /// Move the cursor to an existing block of the current function
    pub fn set_insertion_point(&mut self, label: &str) -> Result<(), IrError> {
        let func_name = self.current_name();
        let Some(function) = self.current_function.as_ref() else {
            return Err(IrError::builder_state(func_name, "no function is open"));
        };
        if function.get_block(label).is_none() {
            return Err(IrError::builder_state(
                func_name,
                format!("insertion point '{label}' does not exist"),
            ));
        }
        self.current_block = Some(label.to_string());
        Ok(())
    }

    /// Integer constant of the given bit width; emits no instruction
    pub fn build_const_int(&mut self, width: u32, value: i64) -> Result<TypedValue, IrError> {
        let Some(ty) = IrType::int_with_width(width) else {
            return Err(IrError::structural(
                self.current_name(),
                format!("unsupported integer width {width}"),
            ));
        };
        Ok(TypedValue::new(Value::Constant(value), ty))
    }

    /// Integer arithmetic on two operands of one integer type
    pub fn build_binary(
        &mut self,
        op: IrBinaryOp,
        lhs: &TypedValue,
        rhs: &TypedValue,
    ) -> Result<TypedValue, IrError> {
        if !lhs.ty.is_integer() || lhs.ty != rhs.ty {
            return Err(IrError::structural(
                self.current_name(),
                format!(
                    "operands of '{op}' must share one integer type, got {} and {}",
                    lhs.ty, rhs.ty
                ),
            ));
        }
        let result = self.new_temp();
        self.add_instruction(Instruction::Binary {
            result,
            op,
            lhs: lhs.value.clone(),
            rhs: rhs.value.clone(),
            result_type: lhs.ty.clone(),
        })?;
        Ok(TypedValue::new(Value::Temp(result), lhs.ty.clone()))
    }

    /// Negation or bitwise not; width casts go through
    /// [`build_int_cast`](Self::build_int_cast)
    pub fn build_unary(&mut self, op: IrUnaryOp, operand: &TypedValue) -> Result<TypedValue, IrError> {
        if op.is_cast() {
            return Err(IrError::structural(
                self.current_name(),
                format!("'{op}' is a width cast; use build_int_cast"),
            ));
        }
        if !operand.ty.is_integer() {
            return Err(IrError::structural(
                self.current_name(),
                format!("operand of '{op}' must be an integer, got {}", operand.ty),
            ));
        }
        let result = self.new_temp();
        self.add_instruction(Instruction::Unary {
            result,
            op,
            operand: operand.value.clone(),
            result_type: operand.ty.clone(),
        })?;
        Ok(TypedValue::new(Value::Temp(result), operand.ty.clone()))
    }

    /// Cast an integer value to another integer width.
    ///
    /// A same-width cast is a no-op returning the original value. A
    /// narrowing cast truncates; a widening cast sign-extends when
    /// `signed`, zero-extends otherwise.
    pub fn build_int_cast(
        &mut self,
        value: &TypedValue,
        target: &IrType,
        signed: bool,
    ) -> Result<TypedValue, IrError> {
        let (Some(from), Some(to)) = (value.ty.bit_width(), target.bit_width()) else {
            return Err(IrError::structural(
                self.current_name(),
                format!("cannot integer-cast {} to {target}", value.ty),
            ));
        };
        if from == to {
            return Ok(value.clone());
        }
        let op = if from > to {
            IrUnaryOp::Trunc
        } else if signed {
            IrUnaryOp::SExt
        } else {
            IrUnaryOp::ZExt
        };
        let result = self.new_temp();
        self.add_instruction(Instruction::Unary {
            result,
            op,
            operand: value.value.clone(),
            result_type: target.clone(),
        })?;
        Ok(TypedValue::new(Value::Temp(result), target.clone()))
    }

    /// Call a declared function.
    ///
    /// Arity and per-argument types must match the callee's fixed
    /// parameters exactly; variadic callees accept extra trailing
    /// integer or pointer arguments. All checks happen before anything
    /// is appended. Returns `None` for void callees.
    pub fn build_call(
        &mut self,
        callee: &Function,
        args: &[TypedValue],
    ) -> Result<Option<TypedValue>, IrError> {
        let func_name = self.current_name();
        let Some((return_type, param_types, is_vararg)) = callee.signature() else {
            return Err(IrError::structural(
                func_name,
                format!("callee '{}' is not callable", callee.name),
            ));
        };
        let arity_ok = if is_vararg {
            args.len() >= param_types.len()
        } else {
            args.len() == param_types.len()
        };
        if !arity_ok {
            return Err(IrError::structural(
                func_name,
                format!(
                    "call to '{}' expects {} argument(s), got {}",
                    callee.name,
                    param_types.len(),
                    args.len()
                ),
            ));
        }
        for (i, (arg, param)) in args.iter().zip(param_types).enumerate() {
            if arg.ty != *param {
                return Err(IrError::structural(
                    func_name,
                    format!(
                        "argument {} of call to '{}' has type {}, expected {param}",
                        i + 1,
                        callee.name,
                        arg.ty
                    ),
                ));
            }
        }
        for arg in &args[param_types.len()..] {
            if !arg.ty.is_integer() && !arg.ty.is_pointer() {
                return Err(IrError::structural(
                    func_name,
                    format!(
                        "variadic argument of call to '{}' must be integer or pointer, got {}",
                        callee.name, arg.ty
                    ),
                ));
            }
        }
        let return_type = return_type.clone();
        let result = if return_type == IrType::Void {
            None
        } else {
            Some(self.new_temp())
        };
        self.add_instruction(Instruction::Call {
            result,
            function: Value::Function(callee.name.clone()),
            args: args.iter().map(|a| a.value.clone()).collect(),
            result_type: return_type.clone(),
        })?;
        Ok(result.map(|id| TypedValue::new(Value::Temp(id), return_type)))
    }

    /// Return from the current function, terminating the current block.
    /// The value's type must equal the function's declared return type.
    pub fn build_return(&mut self, value: Option<&TypedValue>) -> Result<(), IrError> {
        let func_name = self.current_name();
        let Some(function) = self.current_function.as_ref() else {
            return Err(IrError::builder_state(func_name, "no function is open"));
        };
        let Some((return_type, _, _)) = function.signature() else {
            return Err(IrError::structural(
                func_name,
                format!("'{}' is not a function type", function.ty),
            ));
        };
        match (return_type, value) {
            (IrType::Void, None) => {}
            (IrType::Void, Some(v)) => {
                return Err(IrError::structural(
                    func_name,
                    format!("void function returns a {} value", v.ty),
                ));
            }
            (expected, Some(v)) if v.ty == *expected => {}
            (expected, Some(v)) => {
                return Err(IrError::structural(
                    func_name,
                    format!("return type mismatch: expected {expected}, got {}", v.ty),
                ));
            }
            (expected, None) => {
                return Err(IrError::structural(
                    func_name,
                    format!("missing return value of type {expected}"),
                ));
            }
        }
        self.add_instruction(Instruction::Return(value.map(|v| v.value.clone())))
    }

    /// Unconditional branch to a block of the current function,
    /// terminating the current block
    pub fn build_branch(&mut self, target: &str) -> Result<(), IrError> {
        let func_name = self.current_name();
        let Some(function) = self.current_function.as_ref() else {
            return Err(IrError::builder_state(func_name, "no function is open"));
        };
        if function.get_block(target).is_none() {
            return Err(IrError::structural(
                func_name,
                format!("branch targets unknown block '{target}'"),
            ));
        }
        self.add_instruction(Instruction::Branch(target.to_string()))
    }

    fn add_instruction(&mut self, instr: Instruction) -> Result<(), IrError> {
        let func_name = self.current_name();
        let Some(function) = self.current_function.as_mut() else {
            return Err(IrError::builder_state(func_name, "no function is open"));
        };
        let Some(label) = self.current_block.clone() else {
            return Err(IrError::builder_state(
                func_name,
                "no insertion point is set",
            ));
        };
        let Some(block) = function.get_block_mut(&label) else {
            return Err(IrError::builder_state(
                func_name,
                format!("insertion point '{label}' does not exist"),
            ));
        };
        if block.has_terminator() {
            return Err(IrError::builder_state(
                func_name,
                format!("block '{label}' is already terminated"),
            ));
        }
        trace!("[{func_name}:{label}] {instr}");
        block.add_instruction(instr);
        Ok(())
    }

    pub fn current_block_has_terminator(&self) -> bool {
        if let (Some(function), Some(label)) = (&self.current_function, &self.current_block) {
            if let Some(block) = function.get_block(label) {
                return block.has_terminator();
            }
        }
        false
    }

    /// Close and take the function being built
    pub fn finish_function(&mut self) -> Result<Function, IrError> {
        let Some(function) = self.current_function.take() else {
            return Err(IrError::builder_state(
                "<no function>",
                "no function is open",
            ));
        };
        debug!("closing function '{}'", function.name);
        self.current_block = None;
        Ok(function)
    }
}

impl Default for IrBuilder {
    fn default() -> Self {
        Self::new()
    }
}
