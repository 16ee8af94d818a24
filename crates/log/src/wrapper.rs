//! Call wrapper
//!
//! [`Logf`] owns the resolved [`Config`] of one instrumented function and
//! drives each invocation through `Idle -> Entered -> Returned | Raised ->
//! Reported`. Blocking targets run inline through [`Logf::call_with`];
//! suspendable targets are wrapped in an [`Instrumented`] future.
//!
//! The wrapper never alters what the target produces: values are returned
//! as-is, `Err` values are returned as-is, and panics are resumed with the
//! original payload after being reported.

use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use pin_project::pin_project;

use crate::config::{Config, EnvSnapshot, Options};
use crate::ident::CallId;
use crate::message::{self, CallRecord, Outcome, Raised};
use crate::render::{Args, UNREPR, render_display, render_value};
use crate::sink::{GlobalSelector, SinkSelector};

/// Execution model of the instrumented target
///
/// Optional on [`Logf`]. Once declared, driving the target through the
/// other entry point (`call*` for `Suspendable`, `instrument*` for
/// `Blocking`) is a bug and trips a debug assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Runs to completion on the calling thread
    Blocking,
    /// Returns a future; timing spans every suspension point
    Suspendable,
}

/// Classifies a produced value as a return or a raised error
pub trait Report<R> {
    /// Outcome for `value`; `render_return` is false when return logging is off
    fn outcome(&self, value: &R, render_return: bool) -> Outcome;
}

/// Every value is a return, rendered with [`render_value`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl<R: fmt::Debug + 'static> Report<R> for Plain {
    fn outcome(&self, value: &R, render_return: bool) -> Outcome {
        Outcome::Returned(render_return.then(|| render_value(value)))
    }
}

/// `Ok` is a return, `Err` is raised
#[derive(Debug, Clone, Copy, Default)]
pub struct Fallible;

impl<T: fmt::Debug + 'static, E: fmt::Display> Report<Result<T, E>> for Fallible {
    fn outcome(&self, value: &Result<T, E>, render_return: bool) -> Outcome {
        match value {
            Ok(ok) => Outcome::Returned(render_return.then(|| render_value(ok))),
            Err(err) => Outcome::Raised(Raised::of(err, render_display(err))),
        }
    }
}

/// Every value is a return, rendered as the placeholder
///
/// For values whose type cannot be named or rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct Opaque;

impl<R> Report<R> for Opaque {
    fn outcome(&self, _value: &R, render_return: bool) -> Outcome {
        Outcome::Returned(render_return.then(|| UNREPR.to_string()))
    }
}

/// Classification by closure
#[derive(Clone, Copy)]
pub struct ReportFn<F>(pub F);

impl<F> ReportFn<F> {
    /// Wrap `f`, fixing its signature for closure inference
    pub fn new<R>(f: F) -> Self
    where
        F: Fn(&R, bool) -> Outcome,
    {
        Self(f)
    }
}

impl<F> fmt::Debug for ReportFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReportFn").finish_non_exhaustive()
    }
}

impl<R, F> Report<R> for ReportFn<F>
where
    F: Fn(&R, bool) -> Outcome,
{
    fn outcome(&self, value: &R, render_return: bool) -> Outcome {
        (self.0)(value, render_return)
    }
}

#[derive(Clone)]
struct Inner {
    name: Arc<str>,
    config: Config,
    dispatch: Option<Dispatch>,
    selector: Arc<dyn SinkSelector>,
}

/// Instrumentation for one function
///
/// Cheap to clone; clones share configuration and sink selection.
///
/// # Example
///
/// ```rust
/// use logf::{Logf, Options, args};
///
/// let logf = Logf::new("my_function", Options::new().max_str_len(Some(5)));
/// let value = logf.call(args!["a"], || "abcdefgh".to_string());
/// assert_eq!(value, "abcdefgh");
/// ```
#[derive(Clone)]
pub struct Logf {
    inner: Arc<Inner>,
}

impl fmt::Debug for Logf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logf")
            .field("name", &self.inner.name)
            .field("config", &self.inner.config)
            .field("dispatch", &self.inner.dispatch)
            .finish_non_exhaustive()
    }
}

impl Logf {
    /// Resolve `options` against the current environment
    pub fn new(name: impl Into<Arc<str>>, options: Options) -> Self {
        Self::with_env(name, options, &EnvSnapshot::capture())
    }

    /// Resolve `options` against a given environment snapshot
    pub fn with_env(name: impl Into<Arc<str>>, options: Options, env: &EnvSnapshot) -> Self {
        Self::from_config(name, options.resolve(env))
    }

    /// Use an already resolved configuration
    pub fn from_config(name: impl Into<Arc<str>>, config: Config) -> Self {
        let name = name.into();
        tracing::trace!(target: "logf", function = %name, ?config, "instrumentation resolved");
        Self {
            inner: Arc::new(Inner {
                name,
                config,
                dispatch: None,
                selector: Arc::new(GlobalSelector),
            }),
        }
    }

    /// Declare the execution model
    #[must_use]
    pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
        Arc::make_mut(&mut self.inner).dispatch = Some(dispatch);
        self
    }

    /// Replace sink selection
    #[must_use]
    pub fn selector(mut self, selector: impl SinkSelector + 'static) -> Self {
        Arc::make_mut(&mut self.inner).selector = Arc::new(selector);
        self
    }

    /// Logged function name
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Resolved configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Declared execution model, if any
    pub fn dispatch_kind(&self) -> Option<Dispatch> {
        self.inner.dispatch
    }

    fn check_dispatch(&self, expected: Dispatch) {
        debug_assert!(
            self.inner.dispatch.is_none_or(|declared| declared == expected),
            "`{}` is declared {:?} but was driven as {expected:?}",
            self.inner.name,
            self.inner.dispatch,
        );
    }

    /// Run a blocking target; every value counts as returned
    pub fn call<R, F>(&self, args: Args, f: F) -> R
    where
        R: fmt::Debug + 'static,
        F: FnOnce() -> R,
    {
        self.call_with(args, &Plain, f)
    }

    /// Run a blocking target returning `Result`; `Err` counts as raised
    pub fn try_call<T, E, F>(&self, args: Args, f: F) -> Result<T, E>
    where
        T: fmt::Debug + 'static,
        E: fmt::Display,
        F: FnOnce() -> Result<T, E>,
    {
        self.call_with(args, &Fallible, f)
    }

    /// Run a blocking target, classifying its value with `report`
    pub fn call_with<R, P, F>(&self, args: Args, report: &P, f: F) -> R
    where
        P: Report<R> + ?Sized,
        F: FnOnce() -> R,
    {
        self.check_dispatch(Dispatch::Blocking);
        let mut record = self.begin(args);
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => {
                let outcome = report.outcome(&value, self.inner.config.log_return);
                self.finish(&mut record, outcome);
                value
            }
            Err(payload) => {
                self.finish(&mut record, Outcome::Raised(Raised::from_panic(&*payload)));
                panic::resume_unwind(payload)
            }
        }
    }

    /// Wrap a suspendable target; every output counts as returned
    pub fn instrument<F>(&self, args: Args, future: F) -> Instrumented<F, Plain>
    where
        F: Future,
        F::Output: fmt::Debug + 'static,
    {
        self.instrument_with(args, Plain, future)
    }

    /// Wrap a suspendable target producing `Result`; `Err` counts as raised
    pub fn try_instrument<F, T, E>(&self, args: Args, future: F) -> Instrumented<F, Fallible>
    where
        F: Future<Output = Result<T, E>>,
        T: fmt::Debug + 'static,
        E: fmt::Display,
    {
        self.instrument_with(args, Fallible, future)
    }

    /// Wrap a suspendable target, classifying its output with `report`
    ///
    /// Nothing is logged until the returned future is first polled.
    pub fn instrument_with<F, P>(&self, args: Args, report: P, future: F) -> Instrumented<F, P>
    where
        F: Future,
        P: Report<F::Output>,
    {
        self.check_dispatch(Dispatch::Suspendable);
        Instrumented {
            inner: future,
            logf: self.clone(),
            report,
            state: State::Pending(args),
        }
    }

    /// Idle to Entered: identify, snapshot arguments, announce, start the clock
    fn begin(&self, args: Args) -> CallRecord {
        let config = &self.inner.config;
        let call_id = config.identifier.then(CallId::generate);
        let args = config.log_args.then(|| args.render(config.max_str_len));
        let mut record = CallRecord::new(Arc::clone(&self.inner.name), call_id, args);

        if let Some(event) = message::enter_event(&record, config) {
            self.inner.selector.select(config).emit(&event);
        }
        record.enter();
        record
    }

    /// Entered to Reported: stop the clock and emit the closing events
    fn finish(&self, record: &mut CallRecord, outcome: Outcome) {
        record.complete(outcome);
        let config = &self.inner.config;
        let events = message::exit_events(record, config);
        if !events.is_empty() {
            let sink = self.inner.selector.select(config);
            for event in &events {
                sink.emit(event);
            }
        }
        record.reported();
    }
}

enum State {
    Pending(Args),
    Running(CallRecord),
    Done,
}

/// Future returned by [`Logf::instrument_with`]
///
/// Enter is emitted and the clock started on the first poll; the closing
/// events are emitted when the inner future completes or panics. Dropping
/// it early emits nothing further.
#[pin_project]
#[must_use = "futures do nothing unless polled"]
pub struct Instrumented<F, P> {
    #[pin]
    inner: F,
    logf: Logf,
    report: P,
    state: State,
}

impl<F, P> fmt::Debug for Instrumented<F, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrumented")
            .field("logf", &self.logf)
            .finish_non_exhaustive()
    }
}

impl<F, P> Future for Instrumented<F, P>
where
    F: Future,
    P: Report<F::Output>,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        match std::mem::replace(this.state, State::Done) {
            State::Pending(args) => *this.state = State::Running(this.logf.begin(args)),
            State::Running(record) => *this.state = State::Running(record),
            State::Done => panic!("`Instrumented` polled after completion"),
        }

        let inner = this.inner;
        let polled = panic::catch_unwind(AssertUnwindSafe(move || inner.poll(cx)));

        let outcome = match &polled {
            Ok(Poll::Pending) => return Poll::Pending,
            Ok(Poll::Ready(value)) => this
                .report
                .outcome(value, this.logf.config().log_return),
            Err(payload) => Outcome::Raised(Raised::from_panic(&**payload)),
        };

        if let State::Running(mut record) = std::mem::replace(this.state, State::Done) {
            this.logf.finish(&mut record, outcome);
        }

        match polled {
            Ok(ready) => ready,
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}
