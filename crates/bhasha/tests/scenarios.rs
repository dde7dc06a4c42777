//! The six concrete end-to-end scenarios (spec.md §8), run through the real
//! pipeline against real Bengali source text, with `print`'s output captured
//! into an in-memory sink instead of stdout.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use bhasha_util::Handler;
use bhasha_vm::Vm;

/// A `Write` sink whose buffer survives after the `Vm` that owns a clone of
/// it is dropped, so a test can inspect what `print` wrote.
#[derive(Clone)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    fn new() -> Self {
        Self(Rc::new(RefCell::new(Vec::new())))
    }

    fn lines(&self) -> Vec<String> {
        let bytes = self.0.borrow();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Compiles and runs `source`, returning every line `print` wrote.
fn run_and_capture(source: &str) -> Vec<String> {
    let mut handler = Handler::new();
    let bytecode = bhasha::compile(source, &mut handler).unwrap_or_else(|| {
        panic!("compile reported diagnostics: {:?}", handler.diagnostics())
    });
    let sink = SharedBuf::new();
    let mut vm = Vm::new(bytecode);
    vm.set_output(Box::new(sink.clone()));
    vm.run().expect("the program should run to completion");
    sink.lines()
}

#[test]
fn arithmetic_and_precedence() {
    let lines = run_and_capture("ধরি x = ৫ + ৩ * ২; print(x);");
    assert_eq!(lines, vec!["11"]);
}

#[test]
fn recursion_via_named_function() {
    let source = "ধরি গুণিতক = কাজ গুণিতক(n) { \
         যদি (n <= ১) { ১; } নাহলে { n * গুণিতক(n - ১); } \
     }; print(গুণিতক(৫));";
    let lines = run_and_capture(source);
    assert_eq!(lines, vec!["120"]);
}

#[test]
fn closure_with_captured_free_variable() {
    let source = "ধরি তৈরি = কাজ(x) { কাজ(y) { x + y; }; }; \
     ধরি যোগ৫ = তৈরি(৫); \
     print(যোগ৫(৩)); \
     print(যোগ৫(১০));";
    let lines = run_and_capture(source);
    assert_eq!(lines, vec!["8", "15"]);
}

#[test]
fn array_mutation_via_rebinding() {
    let source = "ধরি a = [১, ২, ৩]; \
     ধরি b = push(a, ৪); \
     print(length(a)); \
     print(length(b)); \
     print(b[৩]);";
    let lines = run_and_capture(source);
    assert_eq!(lines, vec!["3", "4", "4"]);
}

#[test]
fn loop_with_break() {
    let source = "ধরি i = ০; \
     যতক্ষণ (সত্য) { \
         যদি (i >= ৩) { থামো; } \
         i = i + ১; \
     } \
     print(i);";
    let lines = run_and_capture(source);
    assert_eq!(lines, vec!["3"]);
}

#[test]
fn numeric_conversion_to_char() {
    // spec.md's pseudo-syntax scenario is `n as char`; the concrete cast
    // table (spec.md §4.7 "Type operations") only accepts a Char *target*
    // from a single-scalar String source, so a numeric code point reaches a
    // Char value through the `to_char` built-in instead of `রূপে অক্ষর`.
    let lines = run_and_capture("ধরি n = ৬৫; ধরি c = to_char(n); print(c);");
    assert_eq!(lines, vec!["A"]);
}
