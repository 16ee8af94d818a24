use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{FnArg, Ident, ItemFn, Lit, LitStr, Pat, Type, parse_macro_input};

use crate::support::attrs::{AttrArgs, AttrItem, AttrValue};
use crate::support::{diag, utils};

const BOOL_KEYS: &[&str] = &[
    "log_args",
    "log_return",
    "log_exec_time",
    "measure_time",
    "single_msg",
    "use_print",
    "log_stack_info",
    "identifier",
    "log_exception",
    "single_exception",
];

pub fn attribute(args: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as AttrArgs);
    let item = parse_macro_input!(item as ItemFn);

    match expand(&args, item) {
        Ok(ts) => ts.into(),
        Err(e) => diag::to_compile_error(e),
    }
}

/// Everything the attribute asked for.
#[derive(Default)]
struct Settings {
    /// `Options` builder calls, in attribute order
    options: Vec<TokenStream2>,
    name: Option<LitStr>,
    skip: Vec<Ident>,
    skip_all: bool,
}

fn parse_settings(args: &AttrArgs) -> syn::Result<Settings> {
    let mut settings = Settings::default();
    let mut seen: Vec<String> = Vec::new();

    for item in &args.items {
        let key = item.key();
        let key_str = key.to_string();
        if seen.contains(&key_str) {
            return Err(diag::error_spanned(key, format!("duplicate `{key}`")));
        }
        seen.push(key_str.clone());

        match (key_str.as_str(), item) {
            (k, AttrItem::Flag(_)) if BOOL_KEYS.contains(&k) => {
                settings.options.push(quote!(.#key(true)));
            }
            (k, AttrItem::KeyValue { value, .. }) if BOOL_KEYS.contains(&k) => {
                let enabled = value.as_bool(key)?;
                settings.options.push(quote!(.#key(#enabled)));
            }
            ("level", AttrItem::KeyValue { value, .. }) => {
                let variant = parse_level(value)?;
                settings.options.push(quote!(.level(::logf::Level::#variant)));
            }
            ("max_str_len", AttrItem::KeyValue { value, .. }) => {
                let limit = parse_max_str_len(value)?;
                settings.options.push(quote!(.max_str_len(#limit)));
            }
            ("use_logger", AttrItem::KeyValue { value: AttrValue::Lit(Lit::Str(name)), .. }) => {
                settings.options.push(quote!(.use_logger(#name)));
            }
            ("name", AttrItem::KeyValue { value: AttrValue::Lit(Lit::Str(name)), .. }) => {
                settings.name = Some(name.clone());
            }
            ("use_logger" | "name", _) => {
                return Err(diag::error_spanned(key, format!("expected `{key} = \"...\"`")));
            }
            ("skip", AttrItem::List { values, .. }) => {
                for value in values {
                    match value {
                        AttrValue::Ident(ident) => settings.skip.push(ident.clone()),
                        other => {
                            return Err(diag::error_at(other.span(), "expected a parameter name"));
                        }
                    }
                }
            }
            ("skip_all", AttrItem::Flag(_)) => settings.skip_all = true,
            ("level" | "max_str_len" | "skip" | "skip_all", _) => {
                return Err(diag::error_spanned(key, format!("malformed `{key}`")));
            }
            _ => {
                return Err(diag::error_spanned(
                    key,
                    format!(
                        "unknown option `{key}`; expected one of: level, {}, max_str_len, \
                         use_logger, name, skip, skip_all",
                        BOOL_KEYS.join(", ")
                    ),
                ));
            }
        }
    }

    Ok(settings)
}

/// `Level` variant for a name (`"INFO"`, `INFO`, `"warn"`) or rank (`20`, `"20"`).
fn parse_level(value: &AttrValue) -> syn::Result<Ident> {
    let raw = match value {
        AttrValue::Lit(Lit::Str(s)) => s.value(),
        AttrValue::Lit(Lit::Int(i)) => i.base10_digits().to_string(),
        AttrValue::Ident(i) => i.to_string(),
        other => return Err(diag::error_at(other.span(), "expected a level name or rank")),
    };

    let variant = match raw.trim().to_ascii_uppercase().as_str() {
        "DEBUG" | "10" => "Debug",
        "INFO" | "20" => "Info",
        "WARNING" | "WARN" | "30" => "Warning",
        "ERROR" | "40" => "Error",
        "CRITICAL" | "FATAL" | "50" => "Critical",
        _ => {
            return Err(diag::error_at(
                value.span(),
                format!(
                    "unknown level `{raw}`; expected DEBUG, INFO, WARNING, ERROR, CRITICAL \
                     or a rank 10..=50 in steps of 10"
                ),
            ));
        }
    };
    Ok(Ident::new(variant, value.span()))
}

fn parse_max_str_len(value: &AttrValue) -> syn::Result<TokenStream2> {
    match value {
        AttrValue::Lit(Lit::Int(i)) => {
            let limit: usize = i.base10_parse()?;
            Ok(quote!(::core::option::Option::Some(#limit)))
        }
        AttrValue::Ident(i) if i == "None" => Ok(quote!(::core::option::Option::None)),
        AttrValue::Lit(Lit::Str(s)) if s.value().eq_ignore_ascii_case("none") => {
            Ok(quote!(::core::option::Option::None))
        }
        other => Err(diag::error_at(
            other.span(),
            "`max_str_len` expects a non-negative integer or `None`",
        )),
    }
}

/// One renderable parameter of the instrumented function.
enum Param {
    Receiver,
    Named(Ident),
    Pattern,
}

fn params(item: &ItemFn) -> Vec<Param> {
    item.sig
        .inputs
        .iter()
        .map(|input| match input {
            FnArg::Receiver(_) => Param::Receiver,
            FnArg::Typed(typed) => match &*typed.pat {
                Pat::Ident(pat) => Param::Named(pat.ident.clone()),
                _ => Param::Pattern,
            },
        })
        .collect()
}

fn args_snapshot(item: &ItemFn, settings: &Settings) -> syn::Result<TokenStream2> {
    let params = params(item);

    for skipped in &settings.skip {
        let known = params.iter().any(|param| match param {
            Param::Receiver => skipped == "self",
            Param::Named(ident) => ident == skipped,
            Param::Pattern => false,
        });
        if !known {
            return Err(diag::error_spanned(
                skipped,
                format!("`{skipped}` is not a parameter of `{}`", item.sig.ident),
            ));
        }
    }

    if settings.skip_all {
        return Ok(quote!(::logf::Args::new()));
    }

    let pushes = params.iter().filter_map(|param| match param {
        Param::Receiver if settings.skip.iter().any(|s| s == "self") => None,
        Param::Receiver => Some(quote!(__logf_args.push(::logf::__render_arg!(self));)),
        Param::Named(ident) if settings.skip.contains(ident) => None,
        Param::Named(ident) => Some(quote!(__logf_args.push(::logf::__render_arg!(#ident));)),
        Param::Pattern => Some(quote!(__logf_args.push(::std::string::String::from("_"));)),
    });

    Ok(quote! {
        if __logf.config().log_args {
            #[allow(unused_mut)]
            let mut __logf_args = ::logf::Args::new();
            #(#pushes)*
            __logf_args
        } else {
            ::logf::Args::new()
        }
    })
}

/// `ReportFn` classifying the produced value.
fn report(ret: &Type, nameable: bool) -> TokenStream2 {
    if !nameable {
        return quote!(::logf::Opaque);
    }

    if utils::is_result(ret) {
        quote! {
            ::logf::ReportFn::new(|__logf_value: &#ret, __logf_render: bool| match __logf_value {
                ::core::result::Result::Ok(__logf_ok) => ::logf::Outcome::Returned(
                    __logf_render.then(|| ::logf::__render!(__logf_ok)),
                ),
                ::core::result::Result::Err(__logf_err) => ::logf::Outcome::Raised(
                    ::logf::Raised::of(__logf_err, ::logf::__render_error!(__logf_err)),
                ),
            })
        }
    } else {
        quote! {
            ::logf::ReportFn::new(|__logf_value: &#ret, __logf_render: bool| {
                ::logf::Outcome::Returned(__logf_render.then(|| ::logf::__render!(__logf_value)))
            })
        }
    }
}

/// Pins the body's type to the declared return type before the body is checked.
fn fake_return(ret: &Type, nameable: bool) -> TokenStream2 {
    if !nameable {
        return TokenStream2::new();
    }
    quote! {
        #[allow(
            unknown_lints,
            unreachable_code,
            clippy::diverging_sub_expression,
            clippy::let_unit_value,
            clippy::unreachable,
            clippy::empty_loop
        )]
        if false {
            let __logf_fake_return: #ret = loop {};
            return __logf_fake_return;
        }
    }
}

fn expand(args: &AttrArgs, item: ItemFn) -> syn::Result<TokenStream2> {
    let settings = parse_settings(args)?;

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = &item;

    let name = match &settings.name {
        Some(name) => quote!(#name),
        None => {
            let ident = sig.ident.to_string();
            quote!(#ident)
        }
    };
    let options = &settings.options;
    let is_async = sig.asyncness.is_some();
    let dispatch = if is_async {
        format_ident!("Suspendable")
    } else {
        format_ident!("Blocking")
    };

    let ret = utils::return_type(&sig.output);
    let nameable = !utils::contains_impl_trait(&ret);
    let snapshot = args_snapshot(&item, &settings)?;
    let report = report(&ret, nameable);
    let fake_return = fake_return(&ret, nameable);
    // Spliced rather than nested so a single-expression body does not
    // trip `unused_braces` at the caller's span.
    let stmts = &block.stmts;

    let run = if is_async {
        quote! {
            __logf
                .instrument_with(__logf_args, #report, async move {
                    #fake_return
                    #(#stmts)*
                })
                .await
        }
    } else {
        quote! {
            __logf.call_with(__logf_args, &#report, move || {
                #fake_return
                #(#stmts)*
            })
        }
    };

    Ok(quote! {
        #(#attrs)*
        #vis #sig {
            static __LOGF: ::std::sync::OnceLock<::logf::Logf> = ::std::sync::OnceLock::new();
            let __logf = __LOGF.get_or_init(|| {
                ::logf::Logf::new(#name, ::logf::Options::new() #(#options)*)
                    .dispatch(::logf::Dispatch::#dispatch)
            });
            let __logf_args: ::logf::Args = #snapshot;
            #run
        }
    })
}
