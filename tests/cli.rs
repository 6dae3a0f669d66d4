//! CLI-level integration tests for the six end-to-end scenarios of
//! spec.md §8, driving the built binary rather than calling engine code
//! directly. Grounded on `iepathos-debtmap`'s `tests/` directory
//! convention of exercising the binary with `assert_cmd`.

use std::io::Write;

use assert_cmd::Command;
use indoc::indoc;
use pretty_assertions::assert_eq;

fn puritas() -> Command {
    Command::cargo_bin("puritas").unwrap()
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().clone();
    String::from_utf8(output.stdout).unwrap()
}

/// Finds the report line for a given method display form and returns its
/// trailing purity tag. Panics if the method has no row.
fn purity_on_line(report: &str, method: &str) -> &str {
    report
        .lines()
        .find(|line| line.starts_with(method))
        .unwrap_or_else(|| panic!("no report row for {method}\nfull report:\n{report}"))
        .trim_end()
        .rsplit(char::is_whitespace)
        .next()
        .unwrap()
}

#[test]
fn scenario_1_two_pure_methods_exact_report() {
    let report = stdout_of(
        puritas()
            .arg("-s")
            .arg("class C { int foo() { return bar(); } int bar() { return 42; } }"),
    );

    let method_width = 62;
    let total_width = 80;
    let expected = format!(
        "{:<method_width$}{}\n{}\n{:<method_width$}{}\n{:<method_width$}{}\n",
        "METHOD",
        "PURITY LEVEL",
        "-".repeat(total_width),
        "int C.bar",
        "Pure",
        "int C.foo",
        "Pure",
    );
    assert_eq!(report, expected);
}

#[test]
fn scenario_2_direct_io_is_impure() {
    let report = stdout_of(puritas().arg("-s").arg(indoc! {r#"
        class C {
            void f() { Console.WriteLine("x"); }
        }
    "#}));
    assert_eq!(purity_on_line(&report, "void C.f"), "Impure");
}

#[test]
fn scenario_3_transitive_impurity() {
    let report = stdout_of(puritas().arg("-s").arg(indoc! {r#"
        class C {
            int a() { return b(); }
            int b() { Console.WriteLine("y"); return 0; }
        }
    "#}));
    assert_eq!(purity_on_line(&report, "int C.a"), "Impure");
    assert_eq!(purity_on_line(&report, "int C.b"), "Impure");
}

#[test]
fn scenario_4_static_field_read_is_impure() {
    let report = stdout_of(puritas().arg("-s").arg(indoc! {"
        class C {
            static int s;
            int f() { return s + 1; }
        }
    "}));
    assert_eq!(purity_on_line(&report, "int C.f"), "Impure");
}

#[test]
fn scenario_5_unknown_external_call() {
    let report = stdout_of(
        puritas()
            .arg("-s")
            .arg("class C { int f() { return Unrecognized.call(); } }"),
    );
    assert_eq!(purity_on_line(&report, "int C.f"), "Unknown");
}

#[test]
fn scenario_6_cross_class_pure_chain() {
    let report = stdout_of(puritas().arg("-s").arg(indoc! {"
        class A { int x() { return B.y(); } }
        class B { public static int y() { return 1; } }
    "}));
    assert_eq!(purity_on_line(&report, "int A.x"), "Pure");
    assert_eq!(purity_on_line(&report, "int B.y"), "Pure");
}

#[test]
fn three_level_chain_propagates_impurity_to_the_outermost_caller() {
    let report = stdout_of(puritas().arg("-s").arg(indoc! {r#"
        class C {
            int a() { return b(); }
            int b() { return c(); }
            int c() { Console.WriteLine("z"); return 0; }
        }
    "#}));
    assert_eq!(purity_on_line(&report, "int C.a"), "Impure");
    assert_eq!(purity_on_line(&report, "int C.b"), "Impure");
    assert_eq!(purity_on_line(&report, "int C.c"), "Impure");
}

#[test]
fn analyzing_a_file_strips_external_rows_that_inline_source_keeps() {
    let mut file = tempfile::Builder::new().suffix(".src").tempfile().unwrap();
    writeln!(
        file,
        r#"class C {{ void f() {{ Console.WriteLine("x"); }} }}"#
    )
    .unwrap();
    file.flush().unwrap();

    let file_report = stdout_of(puritas().arg(file.path()));
    assert!(!file_report.contains("Console.WriteLine"));
    assert_eq!(purity_on_line(&file_report, "void C.f"), "Impure");

    let inline_report = stdout_of(
        puritas()
            .arg("-s")
            .arg(r#"class C { void f() { Console.WriteLine("x"); } }"#),
    );
    assert!(inline_report.contains("Console.WriteLine"));
}

#[test]
fn neither_path_nor_source_prints_usage_and_exits_nonzero() {
    let output = puritas().assert().failure().code(64).get_output().clone();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("usage: puritas"));
}
