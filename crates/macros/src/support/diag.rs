use proc_macro::TokenStream;
use proc_macro2::Span;

/// Convert `syn::Error` into a TokenStream that emits a proper compiler error.
///
/// Keep this in one place to have consistent diagnostics across all macros.
pub fn to_compile_error(err: syn::Error) -> TokenStream {
    err.to_compile_error().into()
}

/// Create a new `syn::Error` spanning `tokens`.
pub fn error_spanned<T: quote::ToTokens>(tokens: &T, msg: impl Into<String>) -> syn::Error {
    syn::Error::new_spanned(tokens, msg.into())
}

/// Create a new `syn::Error` at `span`.
pub fn error_at(span: Span, msg: impl Into<String>) -> syn::Error {
    syn::Error::new(span, msg.into())
}
