//! Rendering of arguments, return values and errors into bounded text
//!
//! Arguments are rendered with their developer-facing representation
//! ([`Debug`](fmt::Debug)), so strings inside the argument tuple are quoted.
//! Return values and error messages are rendered as text: strings and
//! characters as-is, anything else with `Debug`.
//! Rendering never fails: a representation that errors or panics becomes
//! [`UNREPR`].

use std::any::Any;
use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::panic::{AssertUnwindSafe, catch_unwind};

use smallvec::SmallVec;

/// Placeholder for values whose representation could not be produced
pub const UNREPR: &str = "<unrepr>";

/// Render a value through its `Debug` implementation
pub fn render_debug<T: fmt::Debug + ?Sized>(value: &T) -> String {
    guarded(|out| write!(out, "{value:?}"))
}

/// Render a value through its `Display` implementation
pub fn render_display<T: fmt::Display + ?Sized>(value: &T) -> String {
    guarded(|out| write!(out, "{value}"))
}

fn guarded(write: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    match catch_unwind(AssertUnwindSafe(|| write(&mut out))) {
        Ok(Ok(())) => out,
        Ok(Err(_)) | Err(_) => UNREPR.to_string(),
    }
}

/// Render a produced value: strings and characters as plain text, anything
/// else through its `Debug` implementation
pub fn render_value<T: fmt::Debug + 'static>(value: &T) -> String {
    let any: &dyn Any = value;
    if let Some(text) = any.downcast_ref::<String>() {
        return text.clone();
    }
    if let Some(text) = any.downcast_ref::<&'static str>() {
        return (*text).to_string();
    }
    if let Some(text) = any.downcast_ref::<Box<str>>() {
        return text.to_string();
    }
    if let Some(text) = any.downcast_ref::<Cow<'static, str>>() {
        return text.to_string();
    }
    if let Some(c) = any.downcast_ref::<char>() {
        return c.to_string();
    }
    render_debug(value)
}

/// Keep the first `limit` characters of `text`.
///
/// Counts `char`s, never splits a code point and adds no marker.
pub fn truncate(text: &str, limit: Option<usize>) -> &str {
    let Some(limit) = limit else {
        return text;
    };
    match text.char_indices().nth(limit) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Snapshot of the arguments of one call, already rendered
///
/// Positional arguments keep their order, named ones follow in insertion
/// order. An empty snapshot renders as `() {}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    positional: SmallVec<[String; 4]>,
    named: SmallVec<[(Cow<'static, str>, String); 2]>,
}

impl Args {
    /// Empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument rendered with `Debug`
    pub fn arg<T: fmt::Debug + ?Sized>(mut self, value: &T) -> Self {
        self.positional.push(render_debug(value));
        self
    }

    /// Append a named argument rendered with `Debug`
    pub fn named<T: fmt::Debug + ?Sized>(
        mut self,
        name: impl Into<Cow<'static, str>>,
        value: &T,
    ) -> Self {
        self.named.push((name.into(), render_debug(value)));
        self
    }

    /// Append an already rendered positional argument
    pub fn push(&mut self, rendered: String) {
        self.positional.push(rendered);
    }

    /// Append an already rendered named argument
    pub fn push_named(&mut self, name: impl Into<Cow<'static, str>>, rendered: String) {
        self.named.push((name.into(), rendered));
    }

    /// Number of captured arguments
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    /// Whether nothing was captured
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render as `<positional> <named>`, each part limited to `limit` chars
    pub fn render(&self, limit: Option<usize>) -> String {
        let positional = self.positional_text();
        let named = self.named_text();
        format!(
            "{} {}",
            truncate(&positional, limit),
            truncate(&named, limit)
        )
    }

    fn positional_text(&self) -> String {
        match self.positional.as_slice() {
            [] => "()".to_string(),
            [single] => format!("({single},)"),
            many => format!("({})", many.join(", ")),
        }
    }

    fn named_text(&self) -> String {
        if self.named.is_empty() {
            return "{}".to_string();
        }
        let mut out = String::from("{");
        for (i, (name, value)) in self.named.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{name}: {value}");
        }
        out.push('}');
        out
    }
}

/// Build an [`Args`] snapshot from expressions.
///
/// Positional values come first, named values follow a `;`.
///
/// ```rust
/// let args = logf::args!["a", 2; flag = true];
/// assert_eq!(args.render(None), r#"("a", 2) {flag: true}"#);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($value:expr),* $(,)? $(; $($name:ident = $named:expr),* $(,)?)?) => {{
        #[allow(unused_mut)]
        let mut args = $crate::Args::new();
        $(args.push($crate::__render_arg!($value));)*
        $($(args.push_named(stringify!($name), $crate::__render_arg!($named));)*)?
        args
    }};
}

/// Render one expression, preferring plain text for strings.
#[doc(hidden)]
#[macro_export]
macro_rules! __render {
    ($value:expr) => {{
        #[allow(unused_imports)]
        use $crate::__private::{DebugRender as _, OpaqueRender as _, TextRender as _};
        (&&&$crate::__private::Value(&$value)).logf_render()
    }};
}

/// Render one argument with `Debug`, falling back to the placeholder.
#[doc(hidden)]
#[macro_export]
macro_rules! __render_arg {
    ($value:expr) => {{
        #[allow(unused_imports)]
        use $crate::__private::{DebugRender as _, OpaqueRender as _};
        (&&$crate::__private::Value(&$value)).logf_render()
    }};
}

/// Render an error value, preferring `Display`.
#[doc(hidden)]
#[macro_export]
macro_rules! __render_error {
    ($value:expr) => {{
        #[allow(unused_imports)]
        use $crate::__private::{ErrorDebug as _, ErrorDisplay as _, ErrorOpaque as _};
        (&&&$crate::__private::Value(&$value)).logf_error_message()
    }};
}

/// Method-resolution ladder used by the rendering macros.
///
/// `(&&&Value(&x)).logf_render()` picks the first applicable impl: text for
/// string-like values, then `Debug`, then the placeholder. Starting one
/// reference lower, at `&&Value`, skips the text step.
#[doc(hidden)]
pub mod ladder {
    use super::{UNREPR, render_debug, render_display};
    use std::borrow::Cow;
    use std::fmt;

    pub struct Value<'a, T: ?Sized>(pub &'a T);

    /// Types rendered verbatim rather than quoted
    pub trait AsText {
        fn as_text(&self) -> Cow<'_, str>;
    }

    impl AsText for str {
        fn as_text(&self) -> Cow<'_, str> {
            Cow::Borrowed(self)
        }
    }

    impl AsText for String {
        fn as_text(&self) -> Cow<'_, str> {
            Cow::Borrowed(self)
        }
    }

    impl AsText for Cow<'_, str> {
        fn as_text(&self) -> Cow<'_, str> {
            Cow::Borrowed(self)
        }
    }

    impl AsText for Box<str> {
        fn as_text(&self) -> Cow<'_, str> {
            Cow::Borrowed(self)
        }
    }

    impl AsText for char {
        fn as_text(&self) -> Cow<'_, str> {
            Cow::Owned(self.to_string())
        }
    }

    impl<T: AsText + ?Sized> AsText for &T {
        fn as_text(&self) -> Cow<'_, str> {
            (**self).as_text()
        }
    }

    pub trait TextRender {
        fn logf_render(&self) -> String;
    }

    impl<T: AsText + ?Sized> TextRender for &&Value<'_, T> {
        fn logf_render(&self) -> String {
            self.0.as_text().into_owned()
        }
    }

    pub trait DebugRender {
        fn logf_render(&self) -> String;
    }

    impl<T: fmt::Debug + ?Sized> DebugRender for &Value<'_, T> {
        fn logf_render(&self) -> String {
            render_debug(self.0)
        }
    }

    pub trait OpaqueRender {
        fn logf_render(&self) -> String;
    }

    impl<T: ?Sized> OpaqueRender for Value<'_, T> {
        fn logf_render(&self) -> String {
            UNREPR.to_string()
        }
    }

    pub trait ErrorDisplay {
        fn logf_error_message(&self) -> String;
    }

    impl<T: fmt::Display + ?Sized> ErrorDisplay for &&Value<'_, T> {
        fn logf_error_message(&self) -> String {
            render_display(self.0)
        }
    }

    pub trait ErrorDebug {
        fn logf_error_message(&self) -> String;
    }

    impl<T: fmt::Debug + ?Sized> ErrorDebug for &Value<'_, T> {
        fn logf_error_message(&self) -> String {
            render_debug(self.0)
        }
    }

    pub trait ErrorOpaque {
        fn logf_error_message(&self) -> String;
    }

    impl<T: ?Sized> ErrorOpaque for Value<'_, T> {
        fn logf_error_message(&self) -> String {
            UNREPR.to_string()
        }
    }
}
