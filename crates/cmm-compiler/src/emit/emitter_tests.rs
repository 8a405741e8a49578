//! Unit tests for assembly emission. These check the structural contract of
//! the listing (sections, labels, conventions), not every byte.

use indoc::indoc;

fn r#gen(src: &str) -> String {
    let mut analyzed = crate::parse(src)
        .expect("valid syntax")
        .analyze()
        .expect("scope invariants hold");
    assert!(analyzed.is_valid(), "fixture must be clean");
    analyzed.codegen().expect("codegen runs")
}

#[test]
fn global_and_shadowing_local() {
    let asm = r#gen(indoc! {"
        int x;
        void main() {
            int x;
            x = 1;
            cout << x;
        }
    "});
    // Global in the data segment; the local use goes through the frame.
    assert!(asm.contains("_x:\t.space 4"));
    assert!(asm.contains("\t.globl\tmain"));
    assert!(asm.contains("main:"));
    assert!(asm.contains("\tla\t$t0, -8($fp)"));
    assert!(asm.contains("\tlw\t$t0, -8($fp)"));
    assert!(!asm.contains("\tla\t$t0, _x"));
}

#[test]
fn global_access_uses_its_data_label() {
    let asm = r#gen(indoc! {"
        int b;
        void main() {
            int a;
            a = 10;
            b = 7;
            cout << a;
            cout << b;
        }
    "});
    assert!(asm.contains("_b:\t.space 4"));
    assert!(asm.contains("\tla\t$t0, _b"));
    assert!(asm.contains("\tlw\t$t0, _b"));
    assert!(asm.contains("\tla\t$t0, -8($fp)"));
}

#[test]
fn decrement_loads_adjusts_and_stores() {
    let asm = r#gen(indoc! {"
        void main() {
            int x;
            x = 2;
            x--;
            cout << x;
        }
    "});
    assert!(asm.contains("\tlw\t$t1, 0($t0)"));
    assert!(asm.contains("\tsub\t$t1, $t1, 1"));
    assert!(asm.contains("\tsw\t$t1, 0($t0)"));
}

#[test]
fn call_convention_and_string_interning() {
    let asm = r#gen(indoc! {r#"
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
    "#});
    // Callee label and prologue: $fp sits size_params + 8 above $sp.
    assert!(asm.contains("_f:"));
    assert!(asm.contains("\taddu\t$fp, $sp, 16"));
    // Callee epilogue.
    assert!(asm.contains("\tlw\t$ra, -8($fp)"));
    assert!(asm.contains("\tlw\t$fp, -12($t0)"));
    assert!(asm.contains("\tsubu\t$sp, $t0, 8"));
    assert!(asm.contains("\tjr\t$ra"));
    // Caller: jal, pop both actuals, push the returned $v0.
    assert!(asm.contains("\tjal\t_f"));
    assert!(asm.contains("\taddu\t$sp, $sp, 8"));
    assert!(asm.contains("\tsw\t$v0, 0($sp)"));
    // Return value lands in $v0 before the epilogue.
    assert!(asm.contains("\tlw\t$v0, 4($sp)"));
    // The newline literal is interned in the data segment.
    assert!(asm.contains("\t.asciiz \"\\n\""));
    // Printing a string switches the syscall code.
    assert!(asm.contains("\tli\t$v0, 4"));
    assert!(asm.contains("\tli\t$v0, 1"));
}

#[test]
fn main_exits_via_syscall() {
    let asm = r#gen("void main() {\n}\n");
    assert!(asm.contains("\tli\t$v0, 10"));
    assert!(asm.contains("\tsyscall"));
    assert!(!asm.contains("\tjal"));
}

#[test]
fn if_branches_around_the_body() {
    let asm = r#gen(indoc! {"
        void main() {
            if (true) {
                cout << 1;
            }
        }
    "});
    assert!(asm.contains("\tbeq\t$t0, $zero, .L0"));
    assert!(asm.contains("\n.L0:\n"));
}

#[test]
fn if_else_uses_two_labels() {
    let asm = r#gen(indoc! {"
        void main() {
            if (true) {
                cout << 1;
            } else {
                cout << 2;
            }
        }
    "});
    assert!(asm.contains("\tbeq\t$t0, $zero, .L0"));
    assert!(asm.contains("\tj\t.L1"));
    assert!(asm.contains("\n.L0:\n"));
    assert!(asm.contains("\n.L1:\n"));
}

#[test]
fn while_jumps_back_to_the_test() {
    let asm = r#gen(indoc! {"
        void main() {
            bool b;
            b = true;
            while (b) {
                b = false;
            }
        }
    "});
    let top = asm.find("\n.L0:\n").expect("top label");
    let test = asm.find("\tbeq\t$t0, $zero, .L1").expect("exit branch");
    assert!(top < test);
    assert!(asm.contains("\tj\t.L0"));
}

#[test]
fn repeat_keeps_its_counter_in_a_stack_slot() {
    let asm = r#gen(indoc! {"
        void main() {
            repeat (3) {
                cout << 1;
            }
        }
    "});
    assert!(asm.contains("\tlw\t$t0, 4($sp)"));
    assert!(asm.contains("\tsub\t$t0, $t0, 1"));
    assert!(asm.contains("\tsw\t$t0, 4($sp)"));
    // The slot is released at loop exit.
    assert!(asm.contains("\taddu\t$sp, $sp, 4"));
}

#[test]
fn short_circuit_and_pushes_false_on_the_shortcut_lane() {
    let asm = r#gen(indoc! {"
        void main() {
            bool b;
            b = true && false;
        }
    "});
    assert!(asm.contains("\tbeq\t$t0, $zero, .L0"));
    assert!(asm.contains("\tj\t.L1"));
    let shortcut = asm.find("\n.L0:\n").expect("shortcut label");
    assert!(asm[shortcut..].contains("\tli\t$t0, 0"));
}

#[test]
fn short_circuit_or_pushes_true_on_the_shortcut_lane() {
    let asm = r#gen(indoc! {"
        void main() {
            bool b;
            b = false || true;
        }
    "});
    assert!(asm.contains("\tbne\t$t0, $zero, .L0"));
    let shortcut = asm.find("\n.L0:\n").expect("shortcut label");
    assert!(asm[shortcut..].contains("\tli\t$t0, 1"));
}

#[test]
fn comparisons_lower_to_set_instructions() {
    let asm = r#gen(indoc! {"
        void main() {
            bool b;
            int x;
            x = 1;
            b = x < 2;
            b = x >= 2;
            b = x == 2;
            b = x != 2;
        }
    "});
    assert!(asm.contains("\tslt\t$t0, $t0, $t1"));
    assert!(asm.contains("\tsge\t$t0, $t0, $t1"));
    assert!(asm.contains("\tseq\t$t0, $t0, $t1"));
    assert!(asm.contains("\tsne\t$t0, $t0, $t1"));
}

#[test]
fn read_uses_syscall_five_and_stores_through_the_address() {
    let asm = r#gen(indoc! {"
        void main() {
            int x;
            cin >> x;
        }
    "});
    assert!(asm.contains("\tli\t$v0, 5"));
    assert!(asm.contains("\tsw\t$v0, 0($t0)"));
}

#[test]
fn struct_field_access_adds_the_field_offset() {
    let asm = r#gen(indoc! {"
        struct P {
            int x;
            int y;
        };
        void main() {
            struct P p;
            p.y = 3;
            cout << p.y;
        }
    "});
    // p's slot base, then the field offset.
    assert!(asm.contains("\tla\t$t0, -12($fp)"));
    assert!(asm.contains("\taddu\t$t0, $t0, 4"));
}

#[test]
fn data_section_precedes_text() {
    let asm = r#gen(indoc! {r#"
        int g;
        void main() {
            g = 1;
            cout << "done";
        }
    "#});
    let data = asm.find("\t.data").expect("data section");
    let text = asm.find("\t.text").expect("text section");
    let global = asm.find("_g:").expect("global label");
    let string = asm.find(".asciiz").expect("string entry");
    assert!(data < text);
    assert!(data < global);
    assert!(global < string);
    assert!(string < text);
}

#[test]
fn identical_input_produces_identical_bytes() {
    let src = indoc! {r#"
        int g;
        int f(int a) {
            if (a > 0) {
                return a;
            }
            return 0;
        }
        void main() {
            g = f(3);
            cout << g;
            cout << "\n";
        }
    "#};
    assert_eq!(r#gen(src), r#gen(src));
}
