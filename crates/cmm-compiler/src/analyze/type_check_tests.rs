//! Unit tests for the type checker, one per rule of the taxonomy, plus the
//! error-absorption property: each original mistake produces exactly one
//! message.

use indoc::indoc;

fn messages(src: &str) -> Vec<String> {
    let analyzed = crate::parse(src)
        .expect("valid syntax")
        .analyze()
        .expect("scope invariants hold");
    analyzed
        .diagnostics()
        .iter()
        .map(|d| d.message().to_string())
        .collect()
}

fn rendered(src: &str) -> String {
    let analyzed = crate::parse(src)
        .expect("valid syntax")
        .analyze()
        .expect("scope invariants hold");
    analyzed.diagnostics().printer().render()
}

#[test]
fn well_typed_program_is_clean() {
    let msgs = messages(indoc! {"
        int g;
        int add(int a, int b) {
            return a + b;
        }
        void main() {
            bool ok;
            g = add(1, 2);
            ok = g < 10 && true;
            if (ok) {
                cout << g;
            }
        }
    "});
    assert!(msgs.is_empty());
}

#[test]
fn arithmetic_on_bool_operand() {
    let msgs = messages(indoc! {"
        void main() {
            int x;
            x = 1 + true;
        }
    "});
    assert_eq!(
        msgs,
        vec!["Arithmetic operator applied to non-numeric operand"]
    );
}

#[test]
fn each_bad_operand_gets_its_own_message() {
    let msgs = messages(indoc! {"
        void main() {
            int x;
            x = true + false;
        }
    "});
    assert_eq!(
        msgs,
        vec![
            "Arithmetic operator applied to non-numeric operand",
            "Arithmetic operator applied to non-numeric operand",
        ]
    );
}

#[test]
fn increment_of_non_numeric() {
    let msgs = messages(indoc! {"
        void main() {
            bool b;
            b++;
        }
    "});
    assert_eq!(
        msgs,
        vec!["Arithmetic operator applied to non-numeric operand"]
    );
}

#[test]
fn logical_on_int_operand() {
    let msgs = messages(indoc! {"
        void main() {
            bool b;
            b = !1;
        }
    "});
    assert_eq!(msgs, vec!["Logical operator applied to non-bool operand"]);
}

#[test]
fn relational_on_bool_operand() {
    let msgs = messages(indoc! {"
        void main() {
            bool b;
            b = true < false;
        }
    "});
    assert_eq!(
        msgs,
        vec![
            "Relational operator applied to non-numeric operand",
            "Relational operator applied to non-numeric operand",
        ]
    );
}

#[test]
fn assignment_type_mismatch() {
    let out = rendered(indoc! {"
        void main() {
            int x;
            bool b;
            x = b;
        }
    "});
    assert_eq!(out, "4:5 ***ERROR*** Type mismatch\n");
}

#[test]
fn equality_type_mismatch() {
    let msgs = messages(indoc! {"
        void main() {
            bool b;
            b = 1 == true;
        }
    "});
    assert_eq!(msgs, vec!["Type mismatch"]);
}

#[test]
fn equality_on_functions() {
    let msgs = messages(indoc! {"
        void f() {
        }
        void g() {
        }
        void main() {
            bool b;
            b = f == g;
        }
    "});
    assert_eq!(msgs, vec!["Equality operator applied to functions"]);
}

#[test]
fn equality_on_void_function_results() {
    let msgs = messages(indoc! {"
        void f() {
        }
        void main() {
            bool b;
            b = f() == f();
        }
    "});
    assert_eq!(msgs, vec!["Equality operator applied to void functions"]);
}

#[test]
fn equality_on_struct_variables() {
    let msgs = messages(indoc! {"
        struct P {
            int x;
        };
        void main() {
            struct P p;
            struct P q;
            bool b;
            b = p == q;
        }
    "});
    assert_eq!(msgs, vec!["Equality operator applied to struct variables"]);
}

#[test]
fn equality_on_struct_names() {
    let msgs = messages(indoc! {"
        struct P {
            int x;
        };
        struct Q {
            int x;
        };
        void main() {
            bool b;
            b = P == Q;
        }
    "});
    assert_eq!(msgs, vec!["Equality operator applied to struct names"]);
}

#[test]
fn function_assignment() {
    let msgs = messages(indoc! {"
        void f() {
        }
        void g() {
        }
        void main() {
            f = g;
        }
    "});
    assert_eq!(msgs, vec!["Function assignment"]);
}

#[test]
fn struct_name_assignment() {
    let msgs = messages(indoc! {"
        struct P {
            int x;
        };
        struct Q {
            int x;
        };
        void main() {
            P = Q;
        }
    "});
    assert_eq!(msgs, vec!["Struct name assignment"]);
}

#[test]
fn struct_variable_assignment() {
    let msgs = messages(indoc! {"
        struct P {
            int x;
        };
        void main() {
            struct P p;
            struct P q;
            p = q;
        }
    "});
    assert_eq!(msgs, vec!["Struct variable assignment"]);
}

#[test]
fn read_and_write_of_non_scalars() {
    let msgs = messages(indoc! {"
        struct P {
            int x;
        };
        void f() {
        }
        void main() {
            struct P p;
            cin >> f;
            cin >> p;
            cin >> P;
            cout << f;
            cout << p;
            cout << P;
        }
    "});
    assert_eq!(
        msgs,
        vec![
            "Attempt to read a function",
            "Attempt to read a struct variable",
            "Attempt to read a struct name",
            "Attempt to write a function",
            "Attempt to write a struct variable",
            "Attempt to write a struct name",
        ]
    );
}

#[test]
fn write_of_void_call() {
    let msgs = messages(indoc! {"
        void f() {
        }
        void main() {
            cout << f();
        }
    "});
    assert_eq!(msgs, vec!["Attempt to write void"]);
}

#[test]
fn writing_a_string_literal_is_fine() {
    let msgs = messages(indoc! {r#"
        void main() {
            cout << "hello";
        }
    "#});
    assert!(msgs.is_empty());
}

#[test]
fn non_bool_conditions() {
    let msgs = messages(indoc! {"
        void main() {
            if (1) {
            }
            while (2) {
            }
            repeat (true) {
            }
        }
    "});
    assert_eq!(
        msgs,
        vec![
            "Non-bool expression used as an if condition",
            "Non-bool expression used as a while condition",
            "Non-integer expression used as a repeat clause",
        ]
    );
}

#[test]
fn call_of_non_function() {
    let msgs = messages(indoc! {"
        void main() {
            int x;
            x(1);
        }
    "});
    assert_eq!(msgs, vec!["Attempt to call a non-function"]);
}

#[test]
fn call_with_wrong_arity() {
    let msgs = messages(indoc! {"
        int f(int a, int b) {
            return a + b;
        }
        void main() {
            int x;
            x = f(1);
        }
    "});
    assert_eq!(msgs, vec!["Function call with wrong number of args"]);
}

#[test]
fn call_with_mismatched_actual() {
    let msgs = messages(indoc! {"
        int f(int a, bool b) {
            return a;
        }
        void main() {
            int x;
            x = f(true, false);
        }
    "});
    assert_eq!(msgs, vec!["Type of actual does not match type of formal"]);
}

#[test]
fn return_taxonomy() {
    let msgs = messages(indoc! {"
        int f() {
            return;
        }
        void g() {
            return 1;
        }
        int h() {
            return true;
        }
    "});
    assert_eq!(
        msgs,
        vec![
            "Missing return value",
            "Return with a value in a void function",
            "Bad return value",
        ]
    );
}

#[test]
fn error_type_absorbs_instead_of_cascading() {
    // One mistake deep inside the expression: exactly one message, even
    // though the bad value flows through +, <, and the assignment.
    let msgs = messages(indoc! {"
        void main() {
            bool b;
            b = (1 + true) + 2 < 3;
        }
    "});
    assert_eq!(
        msgs,
        vec!["Arithmetic operator applied to non-numeric operand"]
    );
}

#[test]
fn unresolved_identifiers_stay_silent_in_type_checking() {
    // Resolution reports the undeclared name; the checker types it Error
    // and adds nothing.
    let msgs = messages(indoc! {"
        void main() {
            int x;
            x = y + 1;
        }
    "});
    assert_eq!(msgs, vec!["Undeclared identifier"]);
}

#[test]
fn call_result_participates_in_checking() {
    let msgs = messages(indoc! {"
        bool flag() {
            return true;
        }
        void main() {
            int x;
            x = flag() + 1;
        }
    "});
    assert_eq!(
        msgs,
        vec!["Arithmetic operator applied to non-numeric operand"]
    );
}
