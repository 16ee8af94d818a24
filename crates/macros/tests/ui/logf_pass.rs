use std::fmt;

use logf::logf;

#[logf]
fn plain(a: &str, b: u32) -> String {
    format!("{a}{b}")
}

#[logf(level = "INFO", max_str_len = 5, single_msg, identifier = false)]
fn configured(values: Vec<u8>) -> usize {
    values.len()
}

#[logf(level = 40, max_str_len = None, use_logger = "app", measure_time = false)]
fn parsed(raw: &str) -> Result<i32, std::num::ParseIntError> {
    let value = raw.parse::<i32>()?;
    Ok(value * 2)
}

#[logf(skip(secret), name = "login")]
fn with_skip(user: &str, secret: &str) -> bool {
    !user.is_empty() && !secret.is_empty()
}

#[logf(skip_all)]
fn nothing_logged((a, b): (u8, u8)) {
    let _ = a + b;
}

#[logf]
fn early_return(flag: bool) -> &'static str {
    if flag {
        return "early";
    }
    "late"
}

#[logf]
fn borrowed<'a>(items: &'a [String]) -> Option<&'a String> {
    items.first()
}

#[logf]
fn generic<T: Clone + fmt::Debug>(value: T) -> Vec<T> {
    vec![value.clone(), value]
}

#[logf]
fn iterator(limit: u8) -> impl Iterator<Item = u8> {
    0..limit
}

struct NoDebug;

#[logf]
fn opaque(value: NoDebug) -> NoDebug {
    value
}

#[derive(Debug, Default)]
struct Counter {
    hits: u32,
}

impl Counter {
    #[logf]
    fn bump(&mut self, by: u32) -> u32 {
        self.hits += by;
        self.hits
    }

    #[logf(skip(self))]
    fn hits(&self) -> u32 {
        self.hits
    }

    #[logf(log_exception, single_exception)]
    fn build(hits: u32) -> Self {
        Self { hits }
    }
}

fn main() {
    assert_eq!(plain("a", 1), "a1");
    assert_eq!(configured(vec![1, 2, 3]), 3);
    assert_eq!(parsed("21"), Ok(42));
    assert!(parsed("x").is_err());
    assert!(with_skip("user", "hunter2"));
    nothing_logged((1, 2));
    assert_eq!(early_return(true), "early");
    assert_eq!(borrowed(&["x".to_string()]).map(String::as_str), Some("x"));
    assert_eq!(generic(1), vec![1, 1]);
    assert_eq!(iterator(3).count(), 3);
    let NoDebug = opaque(NoDebug);

    let mut counter = Counter::build(1);
    assert_eq!(counter.bump(2), 3);
    assert_eq!(counter.hits(), 3);
}
