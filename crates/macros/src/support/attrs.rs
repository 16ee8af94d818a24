use proc_macro2::{Span, TokenStream as TokenStream2};
use syn::{
    Ident, Lit, Result, Token,
    ext::IdentExt,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
};

use crate::support::diag;

/// Parsed attribute arguments container.
#[derive(Debug, Clone, Default)]
pub struct AttrArgs {
    pub items: Vec<AttrItem>,
}

/// A single attribute item.
#[derive(Debug, Clone)]
pub enum AttrItem {
    /// A bare flag like `single_msg`
    Flag(Ident),
    /// Key-value pair like `level = "INFO"`
    KeyValue { key: Ident, value: AttrValue },
    /// Nested list like `skip(a, b)`
    List { key: Ident, values: Vec<AttrValue> },
}

/// Value on the right of `=` or inside a list.
#[derive(Debug, Clone)]
pub enum AttrValue {
    Ident(Ident),
    Lit(Lit),
    Tokens(TokenStream2),
}

impl AttrItem {
    pub fn key(&self) -> &Ident {
        match self {
            Self::Flag(key) | Self::KeyValue { key, .. } | Self::List { key, .. } => key,
        }
    }
}

impl AttrValue {
    pub fn span(&self) -> Span {
        match self {
            Self::Ident(i) => i.span(),
            Self::Lit(l) => l.span(),
            Self::Tokens(t) => t.span(),
        }
    }

    /// `true`/`false` literal.
    pub fn as_bool(&self, key: &Ident) -> Result<bool> {
        match self {
            Self::Lit(Lit::Bool(b)) => Ok(b.value),
            _ => Err(diag::error_at(
                self.span(),
                format!("`{key}` expects `true` or `false`"),
            )),
        }
    }
}

impl Parse for AttrArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let items = if input.is_empty() {
            vec![]
        } else {
            Punctuated::<AttrItemParser, Token![,]>::parse_terminated(input)?
                .into_iter()
                .map(|x| x.0)
                .collect()
        };
        Ok(Self { items })
    }
}

struct AttrItemParser(AttrItem);

impl Parse for AttrItemParser {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.call(Ident::parse_any)?;

        if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            let value: AttrValue = input.parse::<AttrValueParser>()?.0;
            return Ok(Self(AttrItem::KeyValue { key, value }));
        }

        if input.peek(syn::token::Paren) {
            let content;
            syn::parenthesized!(content in input);

            let values = if content.is_empty() {
                vec![]
            } else {
                Punctuated::<AttrValueParser, Token![,]>::parse_terminated(&content)?
                    .into_iter()
                    .map(|x| x.0)
                    .collect()
            };

            return Ok(Self(AttrItem::List { key, values }));
        }

        Ok(Self(AttrItem::Flag(key)))
    }
}

struct AttrValueParser(AttrValue);

impl Parse for AttrValueParser {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(Lit) {
            return Ok(Self(AttrValue::Lit(input.parse()?)));
        }
        if input.peek(Token![self]) || input.peek(Ident) {
            return Ok(Self(AttrValue::Ident(input.call(Ident::parse_any)?)));
        }
        Ok(Self(AttrValue::Tokens(input.parse()?)))
    }
}
