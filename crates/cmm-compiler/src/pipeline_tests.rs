//! End-to-end pipeline tests: the staged API, phase gating, and the error
//! flag's behavior between phases.

use indoc::indoc;

use crate::Error;

#[test]
fn valid_program_flows_through_every_stage() {
    let parsed = crate::parse(indoc! {"
        int g;
        void main() {
            g = 1;
            cout << g;
        }
    "})
    .expect("valid syntax");
    let mut analyzed = parsed.analyze().expect("scope invariants hold");

    assert!(analyzed.is_valid());
    assert!(analyzed.diagnostics().is_empty());

    let asm = analyzed.codegen().expect("valid program");
    assert!(asm.starts_with("\t.data\n"));
    assert!(asm.contains("main:"));
}

#[test]
fn syntax_error_aborts_before_analysis() {
    let err = crate::parse("int ;").expect_err("bad syntax");
    let Error::Syntax(syntax) = err else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert!(syntax.to_string().contains("***ERROR***"));
}

#[test]
fn type_error_blocks_code_generation() {
    let parsed = crate::parse(indoc! {"
        void main() {
            int x;
            bool b;
            x = b;
        }
    "})
    .expect("valid syntax");
    let mut analyzed = parsed.analyze().expect("scope invariants hold");

    assert!(!analyzed.is_valid());
    insta::assert_snapshot!(
        analyzed.diagnostics().printer().render().trim_end(),
        @"4:5 ***ERROR*** Type mismatch"
    );

    match analyzed.codegen() {
        Err(Error::Invalid) => {}
        other => panic!("expected Error::Invalid, got {other:?}"),
    }
}

#[test]
fn both_analysis_phases_surface_their_errors() {
    // An undeclared name (resolution) and a mismatch (type checking) in one
    // program: both phases run to completion and both report.
    let analyzed = crate::parse(indoc! {"
        void main() {
            int x;
            bool b;
            x = y;
            x = b;
        }
    "})
    .expect("valid syntax")
    .analyze()
    .expect("scope invariants hold");

    let messages: Vec<String> = analyzed
        .diagnostics()
        .iter()
        .map(|d| d.message().to_string())
        .collect();
    assert_eq!(messages, vec!["Undeclared identifier", "Type mismatch"]);
}

#[test]
fn oversized_int_literal_aborts_the_parse() {
    let err = crate::parse(indoc! {"
        void main() {
            int x;
            x = 99999999999;
        }
    "})
    .expect_err("overflow is fatal");
    let Error::Syntax(syntax) = err else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert_eq!(
        syntax.to_string(),
        "3:9 ***ERROR*** integer literal too large"
    );
}

#[test]
fn function_call_scenario_compiles() {
    let mut analyzed = crate::parse(indoc! {r#"
        int f(int a, int b) {
            int c;
            c = 2;
            cout << a + c;
            return a + b + c;
        }
        void main() {
            int x;
            int y;
            x = 10;
            y = 5;
            cout << f(x, 9);
            cout << "\n";
            cout << x + y;
        }
    "#})
    .expect("valid syntax")
    .analyze()
    .expect("scope invariants hold");

    assert!(analyzed.is_valid());
    let asm = analyzed.codegen().expect("valid program");
    assert!(asm.contains("\tjal\t_f"));
    assert!(asm.contains("\t.asciiz \"\\n\""));
}

#[test]
fn struct_scenario_compiles() {
    let mut analyzed = crate::parse(indoc! {"
        struct P {
            int x;
            int y;
        };
        void main() {
            struct P p;
            p.x = 3;
            cout << p.x;
        }
    "})
    .expect("valid syntax")
    .analyze()
    .expect("scope invariants hold");

    assert!(analyzed.is_valid());
    let asm = analyzed.codegen().expect("valid program");
    assert!(asm.contains("\taddu\t$t0, $t0, 0"));
}

#[test]
fn symbol_dump_shows_the_global_scope() {
    let analyzed = crate::parse(indoc! {"
        int g;
        struct P {
            int x;
        };
        void main() {
        }
    "})
    .expect("valid syntax")
    .analyze()
    .expect("scope invariants hold");

    let dump = analyzed.dump_symbols();
    assert!(dump.contains("g: int"));
    assert!(dump.contains("P: struct"));
    assert!(dump.contains("x: int"));
    assert!(dump.contains("main: ->void"));
}
