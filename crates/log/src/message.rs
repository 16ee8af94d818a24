//! Log line assembly
//!
//! Turns the record of one call into the events its configuration asks for.
//! Line shapes:
//!
//! ```text
//! enter      name()[id] | <args> <kwargs>
//! exit       name()[id] 0.00012s | <result>
//! combined   name()[id] 0.00012s | <args> <kwargs> | <result>
//! exception  name()[id] 0.00012s | <args> <kwargs> | raised <Kind>: <message>
//! ```
//!
//! The `[id]` token, elapsed time, arguments and result each appear only
//! when enabled.

use std::any::Any;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};

use smallvec::SmallVec;

use crate::config::{Config, Level};
use crate::ident::CallId;
use crate::render::truncate;

/// Kind of a log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Call started (two-message mode)
    Enter,
    /// Call finished (two-message mode)
    Exit,
    /// Call finished, arguments included (single-message mode)
    Combined,
    /// Call raised, reported next to the exit accounting
    Exception,
    /// Call raised, reported with the arguments; replaces the exit event in
    /// single-message mode
    CombinedException,
}

impl EventKind {
    /// Stable lowercase name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Exit => "exit",
            Self::Combined => "combined",
            Self::Exception => "exception",
            Self::CombinedException => "combined_exception",
        }
    }

    /// Whether the event reports a raised error
    pub const fn is_exception(self) -> bool {
        matches!(self, Self::Exception | Self::CombinedException)
    }
}

/// One formatted line, handed straight to a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Event kind
    pub kind: EventKind,
    /// Severity
    pub level: Level,
    /// Name of the instrumented function
    pub function: Arc<str>,
    /// Correlation token, when enabled
    pub call_id: Option<CallId>,
    /// Formatted line
    pub text: String,
    /// Whether the sink should attach a stack trace
    pub stack_info: bool,
}

/// Error observed leaving an instrumented call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raised {
    /// Short type name (`ParseIntError`, `panic`)
    pub kind: String,
    /// Rendered message
    pub message: String,
}

impl Raised {
    /// Build from explicit parts
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Build from an error value; the kind is its type name without paths
    pub fn of<E: ?Sized>(_error: &E, message: String) -> Self {
        Self {
            kind: short_type_name(std::any::type_name::<E>()),
            message,
        }
    }

    /// Build from a panic payload
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            crate::render::UNREPR.to_string()
        };
        Self::new("panic", message)
    }
}

/// What a call produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Normal completion; the rendered value when return logging is on
    Returned(Option<String>),
    /// Completion with an error or panic
    Raised(Raised),
}

impl Outcome {
    /// Returned value, rendered
    pub fn returned(rendered: impl Into<String>) -> Self {
        Self::Returned(Some(rendered.into()))
    }

    /// Returned value, not rendered
    pub const fn returned_unrendered() -> Self {
        Self::Returned(None)
    }

    /// Raised error
    pub fn raised(raised: Raised) -> Self {
        Self::Raised(raised)
    }
}

/// Lifecycle of one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not started
    Idle,
    /// Enter reported, target running
    Entered,
    /// Target returned
    Returned,
    /// Target raised
    Raised,
    /// Final events emitted
    Reported,
}

/// Transient state of a single invocation
#[derive(Debug, Clone)]
pub struct CallRecord {
    /// Name of the instrumented function
    pub function: Arc<str>,
    /// Correlation token
    pub call_id: Option<CallId>,
    /// Rendered argument snapshot, absent when argument logging is off
    pub args: Option<String>,
    /// When the target started
    pub started: Instant,
    /// Wall-clock time until completion
    pub elapsed: Option<Duration>,
    /// Result of the target
    pub outcome: Option<Outcome>,
    /// Lifecycle position
    pub phase: Phase,
}

impl CallRecord {
    /// Fresh record in the `Idle` phase
    pub fn new(function: Arc<str>, call_id: Option<CallId>, args: Option<String>) -> Self {
        Self {
            function,
            call_id,
            args,
            started: Instant::now(),
            elapsed: None,
            outcome: None,
            phase: Phase::Idle,
        }
    }

    /// Mark the target as started now
    pub fn enter(&mut self) {
        debug_assert_eq!(self.phase, Phase::Idle);
        self.started = Instant::now();
        self.phase = Phase::Entered;
    }

    /// Record the outcome and stop the clock
    pub fn complete(&mut self, outcome: Outcome) {
        debug_assert_eq!(self.phase, Phase::Entered);
        self.elapsed = Some(self.started.elapsed());
        self.phase = match outcome {
            Outcome::Returned(_) => Phase::Returned,
            Outcome::Raised(_) => Phase::Raised,
        };
        self.outcome = Some(outcome);
    }

    /// Mark the final events as emitted
    pub fn reported(&mut self) {
        self.phase = Phase::Reported;
    }
}

/// Event announcing the call, if the mode emits one
pub fn enter_event(record: &CallRecord, config: &Config) -> Option<LogEvent> {
    if config.single_msg {
        return None;
    }

    let mut text = head(record);
    if let Some(args) = &record.args {
        let _ = write!(text, " | {args}");
    }
    Some(event(record, config, EventKind::Enter, config.level, text))
}

/// Events closing the call, in emission order
pub fn exit_events(record: &CallRecord, config: &Config) -> SmallVec<[LogEvent; 2]> {
    let mut events = SmallVec::new();

    match &record.outcome {
        Some(Outcome::Returned(value)) => {
            let (kind, mut text) = accounting(record, config);
            if let Some(value) = value {
                let _ = write!(text, " | {}", truncate(value, config.max_str_len));
            }
            events.push(event(record, config, kind, config.level, text));
        }
        Some(Outcome::Raised(raised)) => {
            let level = config.level.max(Level::Error);
            if config.merges_exception() {
                let text = exception_text(record, raised, config);
                events.push(event(
                    record,
                    config,
                    EventKind::CombinedException,
                    level,
                    text,
                ));
            } else {
                let (kind, text) = accounting(record, config);
                events.push(event(record, config, kind, config.level, text));
                if config.log_exception {
                    let kind = if config.single_exception {
                        EventKind::CombinedException
                    } else {
                        EventKind::Exception
                    };
                    let text = exception_text(record, raised, config);
                    events.push(event(record, config, kind, level, text));
                }
            }
        }
        None => {}
    }

    events
}

/// Elapsed time as printed in lines
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.5}s", elapsed.as_secs_f64())
}

fn head(record: &CallRecord) -> String {
    let mut text = format!("{}()", record.function);
    if let Some(id) = &record.call_id {
        let _ = write!(text, "[{id}]");
    }
    text
}

fn push_elapsed(text: &mut String, record: &CallRecord) {
    let elapsed = record.elapsed.unwrap_or_default();
    text.push(' ');
    text.push_str(&format_elapsed(elapsed));
}

/// Exit (two-message) or combined (single-message) line without the result
fn accounting(record: &CallRecord, config: &Config) -> (EventKind, String) {
    let mut text = head(record);
    if config.log_exec_time {
        push_elapsed(&mut text, record);
    }
    if config.single_msg {
        if let Some(args) = &record.args {
            let _ = write!(text, " | {args}");
        }
        (EventKind::Combined, text)
    } else {
        (EventKind::Exit, text)
    }
}

fn exception_text(record: &CallRecord, raised: &Raised, config: &Config) -> String {
    let mut text = head(record);
    push_elapsed(&mut text, record);
    if let Some(args) = &record.args {
        let _ = write!(text, " | {args}");
    }
    let _ = write!(
        text,
        " | raised {}: {}",
        raised.kind,
        truncate(&raised.message, config.max_str_len)
    );
    text
}

fn event(
    record: &CallRecord,
    config: &Config,
    kind: EventKind,
    level: Level,
    text: String,
) -> LogEvent {
    LogEvent {
        kind,
        level,
        function: Arc::clone(&record.function),
        call_id: record.call_id.clone(),
        text,
        stack_info: config.log_stack_info,
    }
}

/// Strip module paths from every path in a type name:
/// `core::num::error::ParseIntError` becomes `ParseIntError`,
/// `alloc::boxed::Box<dyn core::error::Error>` becomes `Box<dyn Error>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    for (i, c) in full.char_indices() {
        if c == ':' {
            segment_start = i + 1;
        } else if !(c.is_alphanumeric() || c == '_') {
            out.push_str(&full[segment_start..i]);
            out.push(c);
            segment_start = i + c.len_utf8();
        }
    }
    out.push_str(&full[segment_start..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(args: Option<&str>, id: Option<CallId>) -> CallRecord {
        let mut record = CallRecord::new(Arc::from("my_function"), id, args.map(String::from));
        record.enter();
        record
    }

    fn finished(outcome: Outcome) -> CallRecord {
        let mut record = record(Some(r#"("a",) {}"#), None);
        record.complete(outcome);
        record.elapsed = Some(Duration::from_micros(120));
        record
    }

    fn texts(events: &[LogEvent]) -> Vec<(EventKind, &str)> {
        events.iter().map(|e| (e.kind, e.text.as_str())).collect()
    }

    #[test]
    fn test_two_message_lines() {
        let config = Config::default();
        let record = finished(Outcome::returned("abc"));

        let enter = enter_event(&record, &config).unwrap();
        assert_eq!(enter.text, r#"my_function() | ("a",) {}"#);
        assert_eq!(enter.level, Level::Debug);

        let exit = exit_events(&record, &config);
        assert_eq!(
            texts(&exit),
            vec![(EventKind::Exit, "my_function() 0.00012s | abc")]
        );
    }

    #[test]
    fn test_single_message_line() {
        let config = Config {
            single_msg: true,
            ..Config::default()
        };
        let record = finished(Outcome::returned("abc"));

        assert!(enter_event(&record, &config).is_none());
        assert_eq!(
            texts(&exit_events(&record, &config)),
            vec![(EventKind::Combined, r#"my_function() 0.00012s | ("a",) {} | abc"#)]
        );
    }

    #[test]
    fn test_optional_segments() {
        let config = Config {
            log_exec_time: false,
            ..Config::default()
        };
        let bare = finished(Outcome::returned_unrendered());
        assert_eq!(
            texts(&exit_events(&bare, &config)),
            vec![(EventKind::Exit, "my_function()")]
        );

        let mut no_args = record(None, None);
        no_args.complete(Outcome::returned("1"));
        assert_eq!(
            enter_event(&no_args, &config).unwrap().text,
            "my_function()"
        );
    }

    #[test]
    fn test_identifier_is_bracketed() {
        let id = CallId::generate();
        let mut record = record(Some("() {}"), Some(id.clone()));
        record.complete(Outcome::returned("1"));
        let config = Config::default();

        let enter = enter_event(&record, &config).unwrap();
        let exit = &exit_events(&record, &config)[0];
        let expected = format!("my_function()[{id}]");
        assert!(enter.text.starts_with(&expected));
        assert!(exit.text.starts_with(&expected));
        assert_eq!(enter.call_id, exit.call_id);
    }

    #[test]
    fn test_return_value_truncated() {
        let config = Config {
            max_str_len: Some(5),
            ..Config::default()
        };
        let record = finished(Outcome::returned("abcdefgh"));
        assert!(exit_events(&record, &config)[0].text.ends_with("| abcde"));
    }

    #[test]
    fn test_raised_two_message() {
        let config = Config::default();
        let record = finished(Outcome::raised(Raised::new("ValueError", "bad")));

        let events = exit_events(&record, &config);
        assert_eq!(
            texts(&events),
            vec![
                (EventKind::Exit, "my_function() 0.00012s"),
                (
                    EventKind::Exception,
                    r#"my_function() 0.00012s | ("a",) {} | raised ValueError: bad"#
                ),
            ]
        );
        assert_eq!(events[0].level, Level::Debug);
        assert_eq!(events[1].level, Level::Error);
    }

    #[test]
    fn test_raised_single_exception_merges() {
        let config = Config {
            single_msg: true,
            single_exception: true,
            level: Level::Critical,
            ..Config::default()
        };
        let record = finished(Outcome::raised(Raised::new("ValueError", "bad")));

        let events = exit_events(&record, &config);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::CombinedException);
        assert_eq!(events[0].level, Level::Critical);
    }

    #[test]
    fn test_raised_single_exception_two_message_keeps_exit() {
        let config = Config {
            single_exception: true,
            ..Config::default()
        };
        let record = finished(Outcome::raised(Raised::new("ValueError", "bad")));

        let kinds: Vec<_> = exit_events(&record, &config).iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Exit, EventKind::CombinedException]);
    }

    #[test]
    fn test_raised_without_exception_logging() {
        let config = Config {
            single_msg: true,
            log_exception: false,
            single_exception: true,
            ..Config::default()
        };
        let record = finished(Outcome::raised(Raised::new("ValueError", "bad")));

        assert_eq!(
            texts(&exit_events(&record, &config)),
            vec![(EventKind::Combined, r#"my_function() 0.00012s | ("a",) {}"#)]
        );
    }

    #[test]
    fn test_phases() {
        let mut record = CallRecord::new(Arc::from("f"), None, None);
        assert_eq!(record.phase, Phase::Idle);
        record.enter();
        assert_eq!(record.phase, Phase::Entered);
        record.complete(Outcome::raised(Raised::new("panic", "boom")));
        assert_eq!(record.phase, Phase::Raised);
        record.reported();
        assert_eq!(record.phase, Phase::Reported);
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("core::num::error::ParseIntError"), "ParseIntError");
        assert_eq!(
            short_type_name("alloc::boxed::Box<dyn core::error::Error + core::marker::Send>"),
            "Box<dyn Error + Send>"
        );
        assert_eq!(short_type_name("i32"), "i32");
        assert_eq!(
            short_type_name("core::result::Result<u8, my::Err>"),
            "Result<u8, Err>"
        );
    }

    #[test]
    fn test_raised_from_panic() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(Raised::from_panic(payload.as_ref()), Raised::new("panic", "boom"));

        let payload: Box<dyn Any + Send> = Box::new(String::from("formatted 7"));
        assert_eq!(Raised::from_panic(payload.as_ref()).message, "formatted 7");

        let payload: Box<dyn Any + Send> = Box::new(7_u32);
        assert_eq!(Raised::from_panic(payload.as_ref()).message, crate::render::UNREPR);
    }
}
