use super::*;
use pretty_assertions::assert_eq;

fn int_fn_ty() -> IrType {
    IrType::function(IrType::I32, vec![], false)
}

fn add_fn_ty() -> IrType {
    IrType::function(IrType::I32, vec![IrType::I32, IrType::I32], false)
}

fn printf_ty() -> IrType {
    IrType::function(IrType::I32, vec![IrType::ptr(IrType::I8)], true)
}

#[test]
fn test_ir_types() {
    assert_eq!(IrType::I8.bit_width(), Some(8));
    assert_eq!(IrType::I64.bit_width(), Some(64));
    assert_eq!(IrType::Void.bit_width(), None);
    assert_eq!(IrType::int_with_width(16), Some(IrType::I16));
    assert_eq!(IrType::int_with_width(24), None);

    assert!(IrType::I1.is_integer());
    assert!(IrType::ptr(IrType::I8).is_pointer());
    assert!(printf_ty().is_function());
    assert!(!IrType::Void.is_integer());
}

#[test]
fn test_type_display() {
    assert_eq!(format!("{}", IrType::ptr(IrType::I8)), "i8*");
    assert_eq!(format!("{}", printf_ty()), "i32 (i8*, ...)");
    assert_eq!(format!("{}", add_fn_ty()), "i32 (i32, i32)");
    assert_eq!(
        format!("{}", IrType::function(IrType::Void, vec![], true)),
        "void (...)"
    );
}

#[test]
fn test_value_display() {
    assert_eq!(format!("{}", Value::Temp(5)), "%5");
    assert_eq!(format!("{}", Value::Constant(42)), "42");
    assert_eq!(format!("{}", Value::Global("str_0".to_string())), "@str_0");
}

#[test]
fn test_basic_block_terminator() {
    let mut block = BasicBlock::new("entry");
    assert!(block.is_empty());
    assert!(!block.has_terminator());

    block.add_instruction(Instruction::Return(Some(Value::Constant(0))));
    assert!(!block.is_empty());
    assert!(block.has_terminator());
}

#[test]
fn test_builder_builds_verified_function() {
    let mut builder = IrBuilder::new();
    builder.create_function("add", &add_fn_ty()).unwrap();
    builder.create_block("entry").unwrap();

    let lhs = builder.build_const_int(32, 2).unwrap();
    let rhs = builder.build_const_int(32, 3).unwrap();
    let sum = builder.build_binary(IrBinaryOp::Add, &lhs, &rhs).unwrap();
    builder.build_return(Some(&sum)).unwrap();

    let function = builder.finish_function().unwrap();
    assert_eq!(function.name, "add");
    assert_eq!(function.blocks.len(), 1);
    assert_eq!(function.entry_block().unwrap().label, "entry");
    function.verify().unwrap();
}

#[test]
fn test_builder_without_function_is_misuse() {
    let mut builder = IrBuilder::new();
    let err = builder.create_block("entry").unwrap_err();
    assert!(matches!(err, IrError::BuilderState { .. }));
}

#[test]
fn test_builder_without_insertion_point_is_misuse() {
    let mut builder = IrBuilder::new();
    builder.create_function("main", &int_fn_ty()).unwrap();
    let v = builder.build_const_int(32, 1).unwrap();
    let err = builder.build_return(Some(&v)).unwrap_err();
    assert!(matches!(err, IrError::BuilderState { .. }));
}

#[test]
fn test_append_after_terminator_leaves_block_unchanged() {
    let mut builder = IrBuilder::new();
    builder.create_function("main", &int_fn_ty()).unwrap();
    builder.create_block("entry").unwrap();
    let zero = builder.build_const_int(32, 0).unwrap();
    builder.build_return(Some(&zero)).unwrap();
    assert!(builder.current_block_has_terminator());

    let one = builder.build_const_int(32, 1).unwrap();
    let err = builder
        .build_binary(IrBinaryOp::Add, &one, &one)
        .unwrap_err();
    assert!(matches!(err, IrError::BuilderState { .. }));

    let function = builder.finish_function().unwrap();
    assert_eq!(function.entry_block().unwrap().instructions.len(), 1);
}

#[test]
fn test_same_width_cast_is_noop() {
    let mut builder = IrBuilder::new();
    builder.create_function("main", &int_fn_ty()).unwrap();
    builder.create_block("entry").unwrap();

    let v = builder.build_const_int(32, 7).unwrap();
    let cast = builder.build_int_cast(&v, &IrType::I32, true).unwrap();
    assert_eq!(cast, v);
    assert!(builder.finish_function().unwrap().entry_block().unwrap().is_empty());
}

#[test]
fn test_widening_and_narrowing_casts() {
    let mut builder = IrBuilder::new();
    builder.create_function("main", &int_fn_ty()).unwrap();
    builder.create_block("entry").unwrap();

    let v = builder.build_const_int(32, 7).unwrap();
    let widened = builder.build_int_cast(&v, &IrType::I64, true).unwrap();
    assert_eq!(widened.ty, IrType::I64);
    let unsigned = builder.build_int_cast(&v, &IrType::I64, false).unwrap();
    assert_eq!(unsigned.ty, IrType::I64);
    let narrowed = builder.build_int_cast(&widened, &IrType::I8, true).unwrap();
    assert_eq!(narrowed.ty, IrType::I8);

    let function = builder.finish_function().unwrap();
    let ops: Vec<_> = function.entry_block().unwrap().instructions.iter()
        .map(|instr| match instr {
            Instruction::Unary { op, .. } => *op,
            other => panic!("unexpected instruction {other}"),
        })
        .collect();
    assert_eq!(ops, vec![IrUnaryOp::SExt, IrUnaryOp::ZExt, IrUnaryOp::Trunc]);
}

#[test]
fn test_cast_to_pointer_is_structural_error() {
    let mut builder = IrBuilder::new();
    builder.create_function("main", &int_fn_ty()).unwrap();
    builder.create_block("entry").unwrap();

    let v = builder.build_const_int(32, 7).unwrap();
    let err = builder
        .build_int_cast(&v, &IrType::ptr(IrType::I8), true)
        .unwrap_err();
    assert!(matches!(err, IrError::Structural { .. }));
}

#[test]
fn test_unary_rejects_cast_ops() {
    let mut builder = IrBuilder::new();
    builder.create_function("main", &int_fn_ty()).unwrap();
    builder.create_block("entry").unwrap();

    let v = builder.build_const_int(32, 7).unwrap();
    let neg = builder.build_unary(IrUnaryOp::Neg, &v).unwrap();
    assert_eq!(neg.ty, IrType::I32);
    let err = builder.build_unary(IrUnaryOp::SExt, &v).unwrap_err();
    assert!(matches!(err, IrError::Structural { .. }));
}

#[test]
fn test_call_checks_happen_before_append() {
    let puts = Function::declaration(
        "puts",
        IrType::function(IrType::I32, vec![IrType::ptr(IrType::I8)], false),
    );

    let mut builder = IrBuilder::new();
    builder.create_function("main", &int_fn_ty()).unwrap();
    builder.create_block("entry").unwrap();

    // Wrong arity
    let err = builder.build_call(&puts, &[]).unwrap_err();
    assert!(matches!(err, IrError::Structural { .. }));

    // Wrong argument type
    let n = builder.build_const_int(32, 1).unwrap();
    let err = builder.build_call(&puts, &[n]).unwrap_err();
    assert!(matches!(err, IrError::Structural { .. }));

    let function = builder.finish_function().unwrap();
    assert!(function.entry_block().unwrap().is_empty());
}

#[test]
fn test_variadic_call_accepts_trailing_ints_and_pointers() {
    let printf = Function::declaration("printf", printf_ty());

    let mut builder = IrBuilder::new();
    builder.create_function("main", &int_fn_ty()).unwrap();
    builder.create_block("entry").unwrap();

    let fmt = TypedValue::new(Value::Global("str_0".to_string()), IrType::ptr(IrType::I8));
    let n = builder.build_const_int(32, 42).unwrap();
    let result = builder.build_call(&printf, &[fmt.clone(), n]).unwrap().unwrap();
    assert_eq!(result.ty, IrType::I32);

    // A void-typed variadic argument is rejected before anything is appended
    let bad = TypedValue::new(Value::Constant(0), IrType::Void);
    let err = builder.build_call(&printf, &[fmt, bad]).unwrap_err();
    assert!(matches!(err, IrError::Structural { .. }));

    let function = builder.finish_function().unwrap();
    assert_eq!(function.entry_block().unwrap().instructions.len(), 1);
}

#[test]
fn test_return_type_mismatch() {
    let mut builder = IrBuilder::new();
    builder.create_function("main", &int_fn_ty()).unwrap();
    builder.create_block("entry").unwrap();

    let wide = builder.build_const_int(64, 1).unwrap();
    let err = builder.build_return(Some(&wide)).unwrap_err();
    assert!(matches!(err, IrError::Structural { .. }));
    let err = builder.build_return(None).unwrap_err();
    assert!(matches!(err, IrError::Structural { .. }));
}

#[test]
fn test_branch_between_blocks() {
    let mut builder = IrBuilder::new();
    builder.create_function("main", &int_fn_ty()).unwrap();
    builder.create_block("entry").unwrap();
    builder.create_block("exit").unwrap();

    builder.set_insertion_point("entry").unwrap();
    let err = builder.build_branch("nowhere").unwrap_err();
    assert!(matches!(err, IrError::Structural { .. }));
    builder.build_branch("exit").unwrap();

    builder.set_insertion_point("exit").unwrap();
    let zero = builder.build_const_int(32, 0).unwrap();
    builder.build_return(Some(&zero)).unwrap();

    let function = builder.finish_function().unwrap();
    function.verify().unwrap();
}

#[test]
fn test_duplicate_block_label_rejected() {
    let mut builder = IrBuilder::new();
    builder.create_function("main", &int_fn_ty()).unwrap();
    builder.create_block("entry").unwrap();
    let err = builder.create_block("entry").unwrap_err();
    assert!(matches!(err, IrError::Structural { .. }));
}

#[test]
fn test_verify_requires_terminator_last() {
    let mut function = Function::definition("main", int_fn_ty());
    function.add_block("entry").unwrap();
    let err = function.verify().unwrap_err();
    assert!(matches!(err, IrError::Structural { .. }));
    assert!(err.to_string().contains("entry"));

    let entry = function.get_block_mut("entry").unwrap();
    entry.add_instruction(Instruction::Return(Some(Value::Constant(0))));
    function.verify().unwrap();

    // A terminator followed by anything else is rejected
    let entry = function.get_block_mut("entry").unwrap();
    entry.add_instruction(Instruction::Return(Some(Value::Constant(1))));
    let err = function.verify().unwrap_err();
    assert!(matches!(err, IrError::Structural { .. }));
}

#[test]
fn test_verify_definition_needs_blocks() {
    let function = Function::definition("main", int_fn_ty());
    let err = function.verify().unwrap_err();
    assert!(err.to_string().contains("no basic blocks"));

    let declaration = Function::declaration("printf", printf_ty());
    declaration.verify().unwrap();
}

#[test]
fn test_verify_rejects_branch_to_unknown_block() {
    let mut function = Function::definition("main", int_fn_ty());
    function.add_block("entry").unwrap();
    function
        .get_block_mut("entry")
        .unwrap()
        .add_instruction(Instruction::Branch("missing".to_string()));
    let err = function.verify().unwrap_err();
    assert!(err.to_string().contains("missing"));
}

#[test]
fn test_verify_rejects_non_function_type() {
    let function = Function::declaration("x", IrType::I32);
    let err = function.verify().unwrap_err();
    assert!(matches!(err, IrError::Structural { .. }));
}

#[test]
fn test_declare_function_is_idempotent() {
    let mut module = Module::new("test");
    module.declare_function("printf", &printf_ty()).unwrap();
    let again = module.declare_function("printf", &printf_ty()).unwrap();
    assert_eq!(again.name, "printf");
    assert_eq!(module.functions.len(), 1);
}

#[test]
fn test_declare_function_signature_conflict() {
    let mut module = Module::new("test");
    module.declare_function("printf", &printf_ty()).unwrap();
    let err = module.declare_function("printf", &int_fn_ty()).unwrap_err();
    assert!(matches!(err, IrError::Structural { .. }));
    assert!(err.to_string().contains("printf"));
}

#[test]
fn test_define_function_verifies_and_replaces_in_place() {
    let mut module = Module::new("test");
    module.declare_function("printf", &printf_ty()).unwrap();
    module.declare_function("main", &int_fn_ty()).unwrap();

    // An unterminated body is rejected and nothing is installed
    let mut bad = Function::definition("main", int_fn_ty());
    bad.add_block("entry").unwrap();
    assert!(module.define_function(bad).is_err());
    assert!(module.get_function("main").unwrap().is_declaration());

    let mut good = Function::definition("main", int_fn_ty());
    good.add_block("entry").unwrap();
    good.get_block_mut("entry")
        .unwrap()
        .add_instruction(Instruction::Return(Some(Value::Constant(0))));
    module.define_function(good).unwrap();

    // Insertion order is stable: printf first, then main
    assert_eq!(module.functions.len(), 2);
    assert_eq!(module.functions[0].name, "printf");
    assert_eq!(module.functions[1].name, "main");
    assert!(!module.get_function("main").unwrap().is_declaration());
    module.verify().unwrap();
}

#[test]
fn test_define_function_rejects_signature_mismatch() {
    let mut module = Module::new("test");
    module.declare_function("main", &int_fn_ty()).unwrap();

    let mut body = Function::definition("main", add_fn_ty());
    body.add_block("entry").unwrap();
    body.get_block_mut("entry")
        .unwrap()
        .add_instruction(Instruction::Return(Some(Value::Constant(0))));
    let err = module.define_function(body).unwrap_err();
    assert!(matches!(err, IrError::Structural { .. }));
}

#[test]
fn test_intern_string_deduplicates() {
    let mut module = Module::new("test");
    let a = module.intern_string("hello");
    let b = module.intern_string("hello");
    let c = module.intern_string("world");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.ty, IrType::ptr(IrType::I8));
    assert_eq!(module.strings.len(), 2);
    assert_eq!(module.strings[0].name, "str_0");
    assert_eq!(module.strings[1].name, "str_1");
}

#[test]
fn test_module_verify_rejects_duplicate_names() {
    let mut module = Module::new("test");
    module.functions.push(Function::declaration("f", printf_ty()));
    module.functions.push(Function::declaration("f", printf_ty()));
    let err = module.verify().unwrap_err();
    assert!(err.to_string().contains("duplicate function name"));
}

#[test]
fn test_module_display() {
    let mut module = Module::new("main");
    module.declare_function("printf", &printf_ty()).unwrap();
    module.intern_string("hi\n");

    let mut main = Function::definition("main", int_fn_ty());
    main.add_block("entry").unwrap();
    main.get_block_mut("entry")
        .unwrap()
        .add_instruction(Instruction::Return(Some(Value::Constant(0))));
    module.define_function(main).unwrap();

    let text = module.to_string();
    assert!(text.contains("; module 'main'"));
    assert!(text.contains("@str_0 = private constant c\"hi\\n\""));
    assert!(text.contains("declare i32 @printf(i8*, ...)"));
    assert!(text.contains("define i32 @main() {"));
    assert!(text.contains("  ret 0"));
}
