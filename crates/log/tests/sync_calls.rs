//! Blocking targets instrumented with `#[logf]`

mod common;

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use common::{Capture, Lines, elapsed_secs};
use logf::{EventKind, Level, UNREPR, logf};
use pretty_assertions::assert_eq;

#[logf(use_logger = "sync.my_function", identifier = false)]
fn my_function(a: &str) -> String {
    format!("{a}bc")
}

#[test]
fn test_enter_and_exit_lines() {
    let capture = Capture::install("sync.my_function");

    assert_eq!(my_function("a"), "abc");

    let texts = capture.texts();
    assert_eq!(capture.kinds(), vec![EventKind::Enter, EventKind::Exit]);
    assert_eq!(texts[0], r#"my_function() | ("a",) {}"#);
    assert!(texts[1].starts_with("my_function() "), "{}", texts[1]);
    assert!(texts[1].ends_with("s | abc"), "{}", texts[1]);
    assert!(elapsed_secs(&texts[1]).is_some());
}

#[logf(use_logger = "sync.truncated", max_str_len = 5)]
fn truncated() -> String {
    "abcdefgh".to_string()
}

#[test]
fn test_return_truncated_value_unchanged() {
    let capture = Capture::install("sync.truncated");

    assert_eq!(truncated(), "abcdefgh");

    let exit = &capture.texts()[1];
    assert!(exit.ends_with(" | abcde"), "{exit}");
}

#[derive(Debug, PartialEq)]
struct ValueError(String);

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ValueError {}

#[logf(use_logger = "sync.validate", log_exception = true)]
fn validate(input: &str) -> Result<u32, ValueError> {
    if input.is_empty() {
        return Ok(0);
    }
    Err(ValueError("bad".to_string()))
}

#[test]
fn test_error_logged_and_returned_unchanged() {
    let capture = Capture::install("sync.validate");

    assert_eq!(validate("x"), Err(ValueError("bad".to_string())));

    let events = capture.events();
    assert_eq!(
        capture.kinds(),
        vec![EventKind::Enter, EventKind::Exit, EventKind::Exception]
    );
    let exception = &events[2];
    assert!(exception.text.contains("ValueError"), "{}", exception.text);
    assert!(exception.text.contains("bad"), "{}", exception.text);
    assert_eq!(exception.level, Level::Error);
    assert!(!events[1].text.contains('|'), "exit carries no result: {}", events[1].text);
}

#[logf(use_logger = "sync.count_words")]
fn count_words(input: &str) -> Result<usize, ValueError> {
    if input.is_empty() {
        return Err(ValueError("empty".to_string()));
    }
    Ok(input.split_whitespace().count())
}

#[test]
fn test_ok_of_fallible_is_a_return() {
    let capture = Capture::install("sync.count_words");

    assert_eq!(count_words("a b c"), Ok(3));

    assert_eq!(capture.kinds(), vec![EventKind::Enter, EventKind::Exit]);
    assert!(capture.texts()[1].ends_with("| 3"));
}

#[logf(use_logger = "sync.explode")]
fn explode(n: u32) -> u32 {
    if n > 2 {
        panic!("boom {n}");
    }
    n
}

#[test]
fn test_panic_reported_and_resumed() {
    let capture = Capture::install("sync.explode");

    let payload = panic::catch_unwind(AssertUnwindSafe(|| explode(3))).unwrap_err();

    assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("boom 3"));
    assert_eq!(
        capture.kinds(),
        vec![EventKind::Enter, EventKind::Exit, EventKind::Exception]
    );
    assert!(capture.texts()[2].ends_with("| (3,) {} | raised panic: boom 3"));
}

#[logf(use_logger = "sync.factorial")]
fn factorial(n: u64) -> u64 {
    if n <= 1 { 1 } else { n * factorial(n - 1) }
}

#[test]
fn test_recursive_calls_pair_by_identifier() {
    let capture = Capture::install("sync.factorial");

    assert_eq!(factorial(4), 24);

    let events = capture.events();
    assert_eq!(events.len(), 8);

    let mut open = Vec::new();
    for event in &events {
        let id = event.call_id.clone().unwrap();
        match event.kind {
            EventKind::Enter => {
                assert!(!open.contains(&id), "identifier reused while open");
                open.push(id);
            }
            EventKind::Exit => assert_eq!(open.pop(), Some(id)),
            other => panic!("unexpected {other:?}"),
        }
    }
    assert!(open.is_empty());
    assert!(events[7].text.ends_with("| 24"));
}

#[logf(use_logger = "sync.concurrent", level = "INFO")]
fn square(i: u64) -> u64 {
    std::thread::sleep(std::time::Duration::from_millis(2));
    i * i
}

#[test]
fn test_concurrent_calls_pair_by_identifier() {
    let capture = Capture::install("sync.concurrent");

    std::thread::scope(|scope| {
        for i in 0..8 {
            scope.spawn(move || assert_eq!(square(i), i * i));
        }
    });

    let mut by_id: HashMap<String, Vec<EventKind>> = HashMap::new();
    for event in capture.events() {
        assert_eq!(event.level, Level::Info);
        let id = event.call_id.unwrap().to_string();
        by_id.entry(id).or_default().push(event.kind);
    }
    assert_eq!(by_id.len(), 8);
    for kinds in by_id.values() {
        assert_eq!(kinds, &vec![EventKind::Enter, EventKind::Exit]);
    }
}

#[logf(
    use_logger = "sync.login",
    name = "login",
    skip(password),
    identifier = false,
    single_msg
)]
fn authenticate(user: &str, password: &str) -> bool {
    user == "alice" && password == "hunter2"
}

#[test]
fn test_skip_and_name() {
    let capture = Capture::install("sync.login");

    assert!(authenticate("alice", "hunter2"));

    let texts = capture.texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("login() "), "{}", texts[0]);
    assert!(texts[0].ends_with(r#"s | ("alice",) {} | true"#), "{}", texts[0]);
    assert!(!texts[0].contains("hunter2"));
}

struct Secret;

#[logf(use_logger = "sync.opaque", identifier = false)]
fn open(secret: Secret, tag: char) -> usize {
    let Secret = secret;
    tag.len_utf8()
}

#[test]
fn test_unrenderable_argument_uses_placeholder() {
    let capture = Capture::install("sync.opaque");

    assert_eq!(open(Secret, 'x'), 1);

    assert_eq!(capture.texts()[0], format!("open() | ({UNREPR}, 'x') {{}}"));
}

#[logf(use_logger = "sync.printed", use_print)]
fn printed() -> u8 {
    1
}

#[test]
fn test_use_print_bypasses_named_sink() {
    let capture = Capture::install("sync.printed");

    assert_eq!(printed(), 1);

    assert!(capture.events().is_empty());
}

#[logf(use_logger = "sync.lines", identifier = false, log_exec_time = false)]
fn greet(name: &str) -> String {
    format!("hello {name}")
}

#[test]
fn test_line_sink_writes_event_text() {
    let lines = Lines::install("sync.lines");

    assert_eq!(greet("bob"), "hello bob");
    assert_eq!(greet("eve"), "hello eve");

    assert_eq!(
        lines.lines(),
        vec![
            r#"greet() | ("bob",) {}"#.to_string(),
            "greet() | hello bob".to_string(),
            r#"greet() | ("eve",) {}"#.to_string(),
            "greet() | hello eve".to_string(),
        ]
    );
}

#[logf(use_logger = "sync.stack", log_stack_info, single_msg, log_exec_time = false)]
fn with_stack() -> u8 {
    2
}

#[test]
fn test_stack_info_and_no_elapsed() {
    let capture = Capture::install("sync.stack");

    assert_eq!(with_stack(), 2);

    let events = capture.events();
    assert_eq!(events.len(), 1);
    assert!(events[0].stack_info);
    assert!(elapsed_secs(&events[0].text).is_none(), "{}", events[0].text);
}

#[logf(
    use_logger = "sync.merged",
    level = "CRITICAL",
    single_msg,
    single_exception,
    identifier = false
)]
fn merged(value: i32) -> Result<i32, std::num::TryFromIntError> {
    let narrowed = u8::try_from(value)?;
    Ok(i32::from(narrowed))
}

#[test]
fn test_single_exception_merges_in_single_message_mode() {
    let capture = Capture::install("sync.merged");

    assert!(merged(-1).is_err());

    let events = capture.events();
    assert_eq!(capture.kinds(), vec![EventKind::CombinedException]);
    assert_eq!(events[0].level, Level::Critical);
    assert!(events[0].text.contains("| (-1,) {} | raised TryFromIntError: "));
}

#[derive(Debug, Default)]
struct Account {
    balance: i64,
}

impl Account {
    #[logf(use_logger = "sync.account", identifier = false)]
    fn deposit(&mut self, amount: i64) -> i64 {
        self.balance += amount;
        self.balance
    }
}

#[test]
fn test_method_receiver_is_rendered() {
    let capture = Capture::install("sync.account");
    let mut account = Account::default();

    assert_eq!(account.deposit(5), 5);

    assert_eq!(
        capture.texts()[0],
        "deposit() | (Account { balance: 0 }, 5) {}"
    );
}
