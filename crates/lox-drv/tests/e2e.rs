//! End-to-end tests driving the `lox` binary.
//!
//! Each test writes a script to a temp file, runs the binary on it, and
//! asserts on stdout, stderr, and the exit code.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn lox() -> Command {
    Command::cargo_bin("lox").unwrap()
}

fn script(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file
}

#[test]
fn arithmetic_precedence() {
    let file = script("print 1 + 2 * 3;");
    lox()
        .arg(file.path())
        .assert()
        .success()
        .stdout("7\n")
        .stderr("");
}

#[test]
fn string_concatenation() {
    let file = script("var a = \"hi \"; var b = \"there\"; print a + b;");
    lox().arg(file.path()).assert().success().stdout("hi there\n");
}

#[test]
fn closure_counter() {
    let file = script(
        "fun makeCounter() { var i = 0; fun c() { i = i + 1; return i; } return c; }\n\
         var c = makeCounter(); print c(); print c(); print c();\n",
    );
    lox().arg(file.path()).assert().success().stdout("1\n2\n3\n");
}

#[test]
fn resolver_pins_closure_bindings() {
    let file = script(
        "var a = \"global\";\n\
         { fun show() { print a; } show(); var a = \"local\"; show(); }\n",
    );
    lox()
        .arg(file.path())
        .assert()
        .success()
        .stdout("global\nglobal\n");
}

#[test]
fn classes_and_this() {
    let file = script("class Bacon { eat() { print \"Crunch\"; } }\nBacon().eat();\n");
    lox().arg(file.path()).assert().success().stdout("Crunch\n");
}

#[test]
fn inheritance_and_super() {
    let file = script(
        "class A { method() { print \"A\"; } }\n\
         class B < A { method() { super.method(); print \"B\"; } }\n\
         B().method();\n",
    );
    lox().arg(file.path()).assert().success().stdout("A\nB\n");
}

#[test]
fn runtime_error_text_and_exit_code() {
    let file = script("print 1 + \"a\";");
    lox()
        .arg(file.path())
        .assert()
        .code(70)
        .stderr(
            predicate::str::contains("Operands must be two numbers or two strings.")
                .and(predicate::str::contains("[line 1]")),
        );
}

#[test]
fn global_self_reference_is_a_runtime_error_not_static() {
    // Globals are unresolved, so `var a = a;` passes the resolver and
    // fails at evaluation time instead.
    let file = script("var a = a;");
    lox()
        .arg(file.path())
        .assert()
        .code(70)
        .stderr(
            predicate::str::contains("Undefined variable 'a'.")
                .and(predicate::str::contains("own initializer").not()),
        );
}

#[test]
fn local_self_reference_is_a_static_error() {
    let file = script("{ var a = a; }");
    lox()
        .arg(file.path())
        .assert()
        .code(65)
        .stderr(predicate::str::contains(
            "Can't read local variable in its own initializer.",
        ));
}

#[test]
fn static_error_exit_code_and_location() {
    let file = script("print 1");
    lox()
        .arg(file.path())
        .assert()
        .code(65)
        .stderr(predicate::str::contains("Error at end: Expect ';' after value."));
}

#[test]
fn static_errors_prevent_execution() {
    let file = script("print \"should not appear\"; var = broken;");
    lox()
        .arg(file.path())
        .assert()
        .code(65)
        .stdout("");
}

#[test]
fn multiple_static_errors_reported_in_one_run() {
    let file = script("var = 1;\nprint ;\n");
    lox()
        .arg(file.path())
        .assert()
        .code(65)
        .stderr(
            predicate::str::contains("[line 1]").and(predicate::str::contains("[line 2]")),
        );
}

#[test]
fn lexical_error_format() {
    let file = script("var x = 1; @");
    lox()
        .arg(file.path())
        .assert()
        .code(65)
        .stderr(predicate::str::contains("[line 1] Error: Unexpected character."));
}

#[test]
fn too_many_arguments_is_usage_error() {
    lox()
        .args(["one.lox", "two.lox"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("Usage: lox [script]"));
}

#[test]
fn missing_file_reports_and_fails() {
    lox()
        .arg("definitely/not/a/real/file.lox")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not read"));
}

#[test]
fn repl_persists_globals_between_lines() {
    lox()
        .write_stdin("var a = 1;\na = a + 41;\nprint a;\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("42"));
}

#[test]
fn repl_recovers_from_static_errors() {
    lox()
        .write_stdin("var = nope;\nprint \"still here\";\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("still here"));
}

#[test]
fn repl_survives_runtime_errors() {
    lox()
        .write_stdin("print 1 + \"a\";\nprint \"next line runs\";\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("next line runs"))
        .stderr(predicate::str::contains(
            "Operands must be two numbers or two strings.",
        ));
}

#[test]
fn exit_code_is_zero_on_success() {
    let file = script("var x = 1; print x;");
    lox().arg(file.path()).assert().code(0);
}
