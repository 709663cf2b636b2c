//! End-to-end evaluator tests: whole programs in, captured output (or a
//! categorized error) out.

use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::rc::Rc;

use skai_lex::Lexer;
use skai_par::Parser;
use skai_util::{ErrorKind, Fatal, FileId};

use crate::interp::Interpreter;

/// A clonable sink so the test can keep reading what the interpreter wrote.
#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn run_with_input(source: &str, input: &str) -> Result<String, Fatal> {
    let tokens = Lexer::new(source, FileId::DUMMY).tokenize()?;
    let program = Parser::new(tokens).parse()?;
    let sink = SharedBuf::default();
    let mut interp = Interpreter::with_io(
        Box::new(sink.clone()),
        Box::new(Cursor::new(input.as_bytes().to_vec())),
    );
    interp.interpret(&program)?;
    let bytes = sink.0.borrow().clone();
    Ok(String::from_utf8(bytes).expect("non-utf8 output"))
}

fn run(source: &str) -> Result<String, Fatal> {
    run_with_input(source, "")
}

fn output(source: &str) -> String {
    run(source).expect("program failed")
}

fn failure(source: &str) -> Fatal {
    run(source).expect_err("program unexpectedly succeeded")
}

// =============================================================================
// ARITHMETIC AND LITERALS
// =============================================================================

#[test]
fn precedence_in_print() {
    assert_eq!(output("print(1 + 2 * 3);"), "7\n");
}

#[test]
fn integer_division_is_float() {
    assert_eq!(output("print(5 / 2);"), "2.5\n");
    assert_eq!(output("print(6 / 3);"), "2\n");
    assert_eq!(output("print(type_of(6 / 3));"), "float\n");
}

#[test]
fn mixed_numerics_promote() {
    assert_eq!(output("print(1 + 0.5);"), "1.5\n");
    assert_eq!(output("print(2.0 * 3);"), "6\n");
}

#[test]
fn string_concatenation() {
    assert_eq!(output("print(\"he\" + \"llo\");"), "hello\n");
}

#[test]
fn escape_sequences_decode_on_print() {
    assert_eq!(output(r#"print("a\nb");"#), "a\nb\n");
    assert_eq!(output(r#"print("q\tr");"#), "q\tr\n");
}

#[test]
fn print_joins_arguments_with_spaces() {
    assert_eq!(output("print(1, \"a\", true, null);"), "1 a true null\n");
}

#[test]
fn unary_operators() {
    assert_eq!(output("print(-3 + +5);"), "2\n");
    assert_eq!(output("print(-2.5);"), "-2.5\n");
    assert_eq!(output("print(!false);"), "true\n");
}

#[test]
fn bitwise_and_shifts() {
    assert_eq!(output("print(6 & 3, 6 | 3, 6 ^ 3, 1 << 4, 16 >> 2);"), "2 7 5 16 4\n");
}

// =============================================================================
// VARIABLES AND ASSIGNMENT
// =============================================================================

#[test]
fn declaration_and_reassignment() {
    assert_eq!(output("let x = 1; x = 2; print(x);"), "2\n");
    assert_eq!(output("let u; print(u);"), "null\n");
}

#[test]
fn assignment_is_an_expression() {
    assert_eq!(output("let a; let b; a = b = 7; print(a, b);"), "7 7\n");
}

#[test]
fn compound_assignment_mutates_in_place() {
    assert_eq!(output("let x = 10; x += 5; x -= 3; print(x);"), "12\n");
    assert_eq!(output("let x = 7; x *= 2; print(x);"), "14\n");
    assert_eq!(output("let x = 6; x &= 3; print(x);"), "2\n");
    assert_eq!(output("let x = 5; x /= 2; print(x);"), "2.5\n");
}

#[test]
fn const_assignment_fails() {
    let err = failure("let imm k = 1; k = 2;");
    assert_eq!(err.kind, ErrorKind::Const);
    assert!(err.message.contains("cannot assign to const variable 'k'"));

    let err = failure("let imm k = 1; k += 1;");
    assert_eq!(err.kind, ErrorKind::Const);
}

#[test]
fn undeclared_identifier_fails() {
    let err = failure("print(ghost);");
    assert_eq!(err.kind, ErrorKind::Name);
    assert!(err.message.contains("use of undeclared identifier 'ghost'"));
}

#[test]
fn redefinition_in_same_scope_fails() {
    let err = failure("let x = 1; let x = 2;");
    assert_eq!(err.kind, ErrorKind::Name);
}

#[test]
fn subscript_is_not_an_assignment_target() {
    let err = failure("let a = [1, 2]; a[0] = 9;");
    assert_eq!(err.kind, ErrorKind::Type);
    assert!(err.message.contains("invalid assignment target"));
}

// =============================================================================
// ARRAYS AND SUBSCRIPTS
// =============================================================================

#[test]
fn negative_array_index_counts_from_end() {
    assert_eq!(output("let a = [10, 20, 30]; print(a[-1]);"), "30\n");
    assert_eq!(output("let a = [10, 20, 30]; print(a[0], a[2]);"), "10 30\n");
}

#[test]
fn out_of_range_index_fails() {
    let err = failure("let a = [1]; print(a[1]);");
    assert_eq!(err.kind, ErrorKind::Index);
}

#[test]
fn array_elements_evaluate_in_order() {
    assert_eq!(
        output("let n = 2; let a = [n, n * 10, \"x\"]; print(a, type_of(a));"),
        "[2, 20, x] array\n"
    );
}

#[test]
fn string_subscripts() {
    assert_eq!(output("print(\"hello\"[1], \"hello\"[-1]);"), "e o\n");
}

#[test]
fn nested_arrays_print() {
    assert_eq!(output("print([[1, 2], [3]]);"), "[[1, 2], [3]]\n");
}

// =============================================================================
// CONTROL FLOW
// =============================================================================

#[test]
fn while_loop_counts() {
    assert_eq!(
        output("let i = 0; while i < 3 { print(i); i = i + 1; }"),
        "0\n1\n2\n"
    );
}

#[test]
fn while_with_let_initializer() {
    assert_eq!(
        output("while let i = 0; i < 2 { print(i); i += 1; }"),
        "0\n1\n"
    );
}

#[test]
fn for_loop_with_step() {
    assert_eq!(
        output("for let i = 0; i < 6; i += 2 { print(i); }"),
        "0\n2\n4\n"
    );
}

#[test]
fn if_else_branches() {
    assert_eq!(output("if 1 < 2 { print(\"yes\"); } else { print(\"no\"); }"), "yes\n");
    assert_eq!(output("if 2 < 1 { print(\"yes\"); } else { print(\"no\"); }"), "no\n");
    assert_eq!(output("if false { print(\"x\"); }"), "");
}

#[test]
fn if_with_let_initializer() {
    assert_eq!(output("if let t = 1 < 2; t { print(\"ok\"); }"), "ok\n");
}

#[test]
fn break_terminates_only_innermost_loop() {
    let source = "
        let rounds = 0;
        let i = 0;
        while i < 3 {
            i += 1;
            while true { break; }
            rounds += 1;
        }
        print(rounds);
    ";
    assert_eq!(output(source), "3\n");
}

#[test]
fn continue_skips_to_next_iteration() {
    let source = "
        let total = 0;
        for let i = 0; i < 5; i += 1 {
            if i % 2 == 0 { continue; }
            total += i;
        }
        print(total);
    ";
    assert_eq!(output(source), "4\n");
}

#[test]
fn break_outside_loop_fails() {
    let err = failure("break;");
    assert_eq!(err.kind, ErrorKind::Control);
}

#[test]
fn truthiness_is_strict_in_conditions() {
    let err = failure("if 1 { print(1); }");
    assert_eq!(err.kind, ErrorKind::Type);
    assert!(err.message.contains("implicit conversions to booleans"));
    assert_eq!(output("if null { print(1); } else { print(0); }"), "0\n");
}

#[test]
fn logical_operators_evaluate_both_sides() {
    assert_eq!(output("print(true and false, false or true);"), "false true\n");
    assert_eq!(output("print(true && true, false || false);"), "true false\n");
    // Eager evaluation: the rhs is checked even when the lhs decides.
    let err = failure("let r = false and 1;");
    assert_eq!(err.kind, ErrorKind::Type);
}

// =============================================================================
// FUNCTIONS
// =============================================================================

#[test]
fn recursive_factorial() {
    let source = "
        fnc fact(x) {
            if x <= 0 { return 1; }
            else { return x * fact(x - 1); }
        }
        print(fact(5));
    ";
    assert_eq!(output(source), "120\n");
    assert_eq!(
        output("fnc fact(x) { if x <= 0 { return 1; } else { return x * fact(x - 1); } } print(fact(6));"),
        "720\n"
    );
}

#[test]
fn return_short_circuits_the_body() {
    let source = "
        fnc f() {
            return 1;
            print(\"unreachable\");
        }
        print(f());
    ";
    assert_eq!(output(source), "1\n");
}

#[test]
fn function_without_return_yields_null() {
    assert_eq!(output("fnc f() { 1 + 1; } print(f());"), "null\n");
    assert_eq!(output("fnc f() { return; } print(f());"), "null\n");
}

#[test]
fn default_arguments_fill_in() {
    let source = "
        fnc greet(name, suffix = \"!\") { return name + suffix; }
        print(greet(\"hi\"));
        print(greet(\"hi\", \"?\"));
    ";
    assert_eq!(output(source), "hi!\nhi?\n");
}

#[test]
fn default_expressions_see_earlier_parameters() {
    let source = "
        fnc add(a, b = a + 1) { return a + b; }
        print(add(3));
        print(add(3, 10));
    ";
    assert_eq!(output(source), "7\n13\n");
}

#[test]
fn arity_range_with_defaults() {
    let source = "fnc f(a, b = 2) { return a + b; }";
    assert_eq!(output(&format!("{source} print(f(1));")), "3\n");
    assert_eq!(output(&format!("{source} print(f(1, 5));")), "6\n");
    let err = failure(&format!("{source} f();"));
    assert_eq!(err.kind, ErrorKind::Arity);
    assert!(err.message.contains("'f' expects between 1 and 2 arguments, got 0"));
    let err = failure(&format!("{source} f(1, 2, 3);"));
    assert_eq!(err.kind, ErrorKind::Arity);
}

#[test]
fn closures_share_their_captured_frame() {
    let source = "
        let x = 1;
        fnc get() { return x; }
        x = 5;
        print(get());
    ";
    assert_eq!(output(source), "5\n");
}

#[test]
fn closures_keep_call_frames_alive() {
    let source = "
        fnc make() {
            let n = 0;
            fnc bump() { n += 1; return n; }
            return bump;
        }
        let counter = make();
        print(counter());
        print(counter());
    ";
    assert_eq!(output(source), "1\n2\n");
}

#[test]
fn return_outside_function_fails() {
    let err = failure("return 1;");
    assert_eq!(err.kind, ErrorKind::Control);
    assert!(err.message.contains("'return' used outside of a function"));
}

#[test]
fn break_cannot_cross_a_call_boundary() {
    let source = "
        fnc f() { break; }
        while true { f(); }
    ";
    let err = failure(source);
    assert_eq!(err.kind, ErrorKind::Control);
}

#[test]
fn calling_a_non_callable_fails() {
    let err = failure("let x = 3; x();");
    assert_eq!(err.kind, ErrorKind::Type);
    assert!(err.message.contains("is not callable"));
}

#[test]
fn functions_print_their_name() {
    assert_eq!(output("fnc f() { } print(f);"), "{function 'f'}\n");
    assert_eq!(output("print(print);"), "[pure function]\n");
}

// =============================================================================
// CLASSES
// =============================================================================

#[test]
fn class_instantiation_and_members() {
    let source = "
        class Point {
            let x = 0;
            let y = 0;
            fnc init(a, b = 0) { self.x = a; self.y = b; }
            fnc sum() { return self.x + self.y; }
        }
        let p = Point(3, 4);
        print(p.x, p.y, p.sum());
        let q = Point(9);
        print(q.x, q.y);
    ";
    assert_eq!(output(source), "3 4 7\n9 0\n");
}

#[test]
fn member_assignment_through_access() {
    let source = "
        class Bag { let n = 1; }
        let b = Bag();
        b.n = 5;
        print(b.n);
    ";
    assert_eq!(output(source), "5\n");
}

#[test]
fn class_without_init_rejects_arguments() {
    let err = failure("class Bag { let n = 1; } Bag(5);");
    assert_eq!(err.kind, ErrorKind::Arity);
}

#[test]
fn init_returning_a_value_fails() {
    let err = failure("class Bad { fnc init() { return 5; } } Bad();");
    assert_eq!(err.kind, ErrorKind::Constructor);
    assert!(err.message.contains("'init' cannot return a value"));
}

#[test]
fn bare_return_in_init_is_allowed() {
    assert_eq!(
        output("class C { let n = 2; fnc init() { return; } } print(C().n);"),
        "2\n"
    );
}

#[test]
fn unknown_member_fails() {
    let err = failure("class Bag { let n = 1; } print(Bag().missing);");
    assert_eq!(err.kind, ErrorKind::Name);
    assert!(err.message.contains("'Bag' has no member 'missing'"));
}

#[test]
fn members_are_not_resolved_from_enclosing_scope() {
    // `print` is global; it must not leak through as an instance member.
    let err = failure("class Bag { } print(Bag().print);");
    assert_eq!(err.kind, ErrorKind::Name);
}

#[test]
fn access_on_non_instance_fails() {
    let err = failure("print(3.foo);");
    assert_eq!(err.kind, ErrorKind::Type);
    assert!(err.message.contains("has no members"));
}

#[test]
fn self_is_constant() {
    let err = failure("class C { fnc init() { self = null; } } C();");
    assert_eq!(err.kind, ErrorKind::Const);
}

#[test]
fn instances_print_their_class() {
    assert_eq!(output("class C { } print(C(), C);"), "{instance of 'C'} {class 'C'}\n");
}

// =============================================================================
// BUILT-INS
// =============================================================================

#[test]
fn type_of_names() {
    assert_eq!(
        output("print(type_of(null), type_of(true), type_of(1), type_of(1.5));"),
        "null bool int float\n"
    );
    assert_eq!(
        output("print(type_of(\"s\"), type_of([1]), type_of(print));"),
        "string array function\n"
    );
}

#[test]
fn pow_and_abs() {
    assert_eq!(output("print(pow(2, 10));"), "1024\n");
    assert_eq!(output("print(abs(-3), abs(3), abs(-2.5));"), "3 3 2.5\n");
    let err = failure("pow(2, -1);");
    assert_eq!(err.kind, ErrorKind::Type);
    let err = failure("abs(\"x\");");
    assert_eq!(err.kind, ErrorKind::Type);
}

#[test]
fn random_stays_in_range() {
    assert_eq!(output("let r = random(3, 3); print(r);"), "3\n");
    assert_eq!(
        output("let r = random(1, 6); print(r >= 1 and r <= 6);"),
        "true\n"
    );
    let err = failure("random(5, 1);");
    assert!(err.message.contains("'random' invalid range provided"));
}

#[test]
fn time_returns_a_float() {
    assert_eq!(output("print(type_of(time()));"), "float\n");
    assert_eq!(output("print(time() > 0.0);"), "true\n");
}

#[test]
fn sleep_accepts_only_integers() {
    assert_eq!(output("sleep(0); print(\"done\");"), "done\n");
    let err = failure("sleep(\"long\");");
    assert_eq!(err.kind, ErrorKind::Type);
    assert!(failure("sleep(-1);").message.contains("non-negative"));
}

#[test]
fn prompt_reads_a_line() {
    let out = run_with_input("let name = prompt(\"who? \"); print(\"hi \" + name);", "ada\n")
        .unwrap();
    assert_eq!(out, "who? hi ada\n");
}

#[test]
fn prompt_requires_a_string() {
    let err = failure("prompt(7);");
    assert!(err.message.contains("'prompt' expected string"));
}

#[test]
fn builtin_arity_errors() {
    let err = failure("print();");
    assert_eq!(err.kind, ErrorKind::Arity);
    assert!(err.message.contains("'print' expects at least 1 argument(s), got 0"));
    let err = failure("pow(2);");
    assert!(err.message.contains("'pow' expects 2 argument(s), got 1"));
    let err = failure("time(1);");
    assert_eq!(err.kind, ErrorKind::Arity);
}

// =============================================================================
// INTEGER SEMANTICS
// =============================================================================

#[test]
fn two_complement_wrapping() {
    assert_eq!(
        output("print(9223372036854775807 + 1);"),
        "-9223372036854775808\n"
    );
    assert_eq!(output("print(7 % 3, -7 % 3);"), "1 -1\n");
}

#[test]
fn modulo_by_zero_fails() {
    let err = failure("print(1 % 0);");
    assert_eq!(err.kind, ErrorKind::Type);
}
