//! Attribute parsing for `#[derive(Bindable)]`.
//!
//! Field names follow serde, so the serde attributes that change a field's
//! deserialized name or presence are read here. Everything else serde
//! accepts is skipped over.

use syn::{
    meta::ParseNestedMeta, spanned::Spanned, Attribute, Field, Ident, LitStr, Path, Token,
};

/// Container-level settings.
#[derive(Debug, Default)]
pub struct ContainerAttrs {
    /// `#[serde(rename_all = "...")]`, deserialize side.
    pub rename_all: Option<RenameRule>,
    /// `#[bind(crate = "...")]`.
    pub krate: Option<Path>,
}

impl ContainerAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();

        for attr in attrs {
            if attr.path().is_ident("serde") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename_all") {
                        if let Some(lit) = deserialize_name(&meta)? {
                            out.rename_all = Some(RenameRule::parse(&lit)?);
                        }
                        Ok(())
                    } else {
                        skip_meta(&meta)
                    }
                })?;
            } else if attr.path().is_ident("bind") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("crate") {
                        let lit: LitStr = meta.value()?.parse()?;
                        out.krate = Some(lit.parse()?);
                        Ok(())
                    } else {
                        Err(meta.error("unsupported bind attribute, expected `crate`"))
                    }
                })?;
            }
        }

        Ok(out)
    }
}

/// Field-level settings.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    pub rename: Option<String>,
    pub skip: bool,
    pub flatten: bool,
}

impl FieldAttrs {
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut out = Self::default();

        for attr in &field.attrs {
            if attr.path().is_ident("serde") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename") {
                        if let Some(lit) = deserialize_name(&meta)? {
                            out.rename = Some(lit.value());
                        }
                        Ok(())
                    } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_deserializing")
                    {
                        out.skip = true;
                        Ok(())
                    } else if meta.path.is_ident("flatten") {
                        out.flatten = true;
                        Ok(())
                    } else {
                        skip_meta(&meta)
                    }
                })?;
            } else if attr.path().is_ident("bind") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("skip") {
                        out.skip = true;
                        Ok(())
                    } else if meta.path.is_ident("rename") {
                        let lit: LitStr = meta.value()?.parse()?;
                        out.rename = Some(lit.value());
                        Ok(())
                    } else {
                        Err(meta.error("unsupported bind attribute, expected `skip` or `rename`"))
                    }
                })?;
            }
        }

        if out.flatten && out.rename.is_some() {
            return Err(syn::Error::new(
                field.span(),
                "a flattened field cannot also be renamed",
            ));
        }

        Ok(out)
    }
}

/// Reads `name = "x"` or `name(deserialize = "x", ...)`.
fn deserialize_name(meta: &ParseNestedMeta<'_>) -> syn::Result<Option<LitStr>> {
    if meta.input.peek(Token![=]) {
        return Ok(Some(meta.value()?.parse()?));
    }

    let mut found = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("deserialize") {
            found = Some(inner.value()?.parse()?);
            Ok(())
        } else {
            skip_meta(&inner)
        }
    })?;
    Ok(found)
}

/// Consumes a serde attribute this macro does not care about.
fn skip_meta(meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        let _: proc_macro2::TokenStream = content.parse()?;
    }
    Ok(())
}

/// serde's `rename_all` conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> syn::Result<Self> {
        Ok(match lit.value().as_str() {
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            "PascalCase" => Self::Pascal,
            "camelCase" => Self::Camel,
            "snake_case" => Self::Snake,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            "SCREAMING-KEBAB-CASE" => Self::ScreamingKebab,
            other => {
                return Err(syn::Error::new(
                    lit.span(),
                    format!("unknown rename rule `{other}`"),
                ))
            }
        })
    }

    /// Applies the rule to a snake_case field name.
    pub fn apply(self, field: &str) -> String {
        match self {
            Self::Lower | Self::Snake => field.to_owned(),
            Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
            Self::Pascal => pascal(field),
            Self::Camel => {
                let pascal = pascal(field);
                let mut chars = pascal.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_ascii_lowercase().to_string() + chars.as_str()
                })
            }
            Self::Kebab => field.replace('_', "-"),
            Self::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

fn pascal(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut capitalize = true;
    for ch in field.chars() {
        if ch == '_' {
            capitalize = true;
        } else if capitalize {
            out.push(ch.to_ascii_uppercase());
            capitalize = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// The serde name of a field identifier, without any `r#` prefix.
pub fn field_name(ident: &Ident, attrs: &FieldAttrs, container: &ContainerAttrs) -> String {
    if let Some(rename) = &attrs.rename {
        return rename.clone();
    }
    let raw = ident.to_string();
    let raw = raw.strip_prefix("r#").unwrap_or(&raw);
    container
        .rename_all
        .map_or_else(|| raw.to_owned(), |rule| rule.apply(raw))
}
