use proc_macro_error2::abort;
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Ident, LitInt, LitStr};

/// Accepted `at = "..."` spellings and the `LogLevel` variant they select.
const LOG_LEVELS: [(&str, &str); 7] = [
    ("auto", "Auto"),
    ("error", "Error"),
    ("warning", "Warning"),
    ("warn", "Warning"),
    ("info", "Info"),
    ("debug", "Debug"),
    ("off", "Off"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Detail,
    Instance,
    Extension,
}

impl MarkerKind {
    fn from_path(path: &syn::Path) -> Option<Self> {
        if path.is_ident("detail") {
            Some(Self::Detail)
        } else if path.is_ident("instance") {
            Some(Self::Instance)
        } else if path.is_ident("extension") {
            Some(Self::Extension)
        } else {
            None
        }
    }
}

/// Accessor declared with `#[problem(detail(method = "..."))]` and friends.
struct MethodMember {
    marker: MarkerKind,
    method: Ident,
    name: Option<String>,
    params: usize,
    fallible: bool,
}

/// Field marked with `#[problem(detail)]` and friends.
struct FieldMember {
    access: syn::Member,
    label: String,
    marker: MarkerKind,
    name: Option<String>,
}

/// Configuration parsed from container-level `#[problem(...)]` attributes
#[derive(Default)]
struct KindConfig {
    status: Option<u16>,
    type_uri: Option<String>,
    title: Option<String>,
    bad_argument: Option<Span>,
    logging_to: Option<String>,
    logging_at: Option<&'static str>,
    methods: Vec<MethodMember>,
}

#[allow(clippy::needless_pass_by_value)] // DeriveInput is consumed by proc-macro pattern
pub fn expand_derive_problem_detail(input: DeriveInput) -> TokenStream {
    let Data::Struct(data) = &input.data else {
        abort!(
            input.ident.span(),
            "#[derive(ProblemDetail)] can only be applied to structs"
        );
    };
    if !input.generics.params.is_empty() {
        abort!(
            input.ident.span(),
            "#[derive(ProblemDetail)] does not support generic types"
        );
    }

    let config = parse_kind_attrs(&input);
    let fields = parse_field_markers(&data.fields);

    let ident = &input.ident;
    let kind = kind_tokens(ident, &config);
    let members = members_tokens(ident, &fields, &config.methods);

    quote! {
        impl ::problemdetail::ProblemDetail for #ident {
            const KIND: &'static ::problemdetail::ExceptionKind = &#kind;

            #members
        }

        ::problemdetail::inventory::submit! {
            ::problemdetail::registry::KindRegistration::new(
                <#ident as ::problemdetail::ProblemDetail>::KIND
            )
        }
    }
}

fn kind_tokens(ident: &Ident, config: &KindConfig) -> TokenStream {
    let name = ident.unraw().to_string();
    let mut kind = quote! {
        ::problemdetail::ExceptionKind::new(#name, ::core::module_path!())
    };
    if let Some(status) = config.status {
        kind = quote! { #kind.with_status(#status) };
    }
    if let Some(type_uri) = &config.type_uri {
        kind = quote! { #kind.with_type_uri(#type_uri) };
    }
    if let Some(title) = &config.title {
        kind = quote! { #kind.with_title(#title) };
    }
    if config.bad_argument.is_some() {
        kind = quote! { #kind.bad_argument() };
    }
    if config.logging_to.is_some() || config.logging_at.is_some() {
        let to = config.logging_to.as_deref().unwrap_or_default();
        let at = format_ident!("{}", config.logging_at.unwrap_or("Auto"));
        kind = quote! {
            #kind.with_logging(::problemdetail::Logging::new(#to, ::problemdetail::LogLevel::#at))
        };
    }
    kind
}

fn marker_tokens(marker: MarkerKind, name: Option<&str>) -> TokenStream {
    match (marker, name) {
        (MarkerKind::Detail, _) => quote! { ::problemdetail::Marker::Detail },
        (MarkerKind::Instance, _) => quote! { ::problemdetail::Marker::Instance },
        (MarkerKind::Extension, Some(name)) => quote! {
            ::problemdetail::Marker::Extension(::core::option::Option::Some(#name))
        },
        (MarkerKind::Extension, None) => quote! {
            ::problemdetail::Marker::Extension(::core::option::Option::None)
        },
    }
}

/// `fn members()` with one named reader per entry; empty when nothing is marked.
fn members_tokens(ident: &Ident, fields: &[FieldMember], methods: &[MethodMember]) -> TokenStream {
    if fields.is_empty() && methods.is_empty() {
        return TokenStream::new();
    }

    let result = quote! {
        ::core::result::Result<::problemdetail::serde_json::Value, ::problemdetail::AccessError>
    };
    let mut readers = Vec::new();
    let mut entries = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let reader = format_ident!("__problemdetail_read_field_{}", index);
        let access = &field.access;
        readers.push(quote! {
            fn #reader(e: &#ident) -> #result {
                ::problemdetail::member_value(&e.#access)
            }
        });
        let label = &field.label;
        let marker = marker_tokens(field.marker, field.name.as_deref());
        entries.push(quote! { ::problemdetail::Member::field(#label, #marker, #reader) });
    }

    for (index, method) in methods.iter().enumerate() {
        let reader = format_ident!("__problemdetail_read_method_{}", index);
        let call = &method.method;
        let params = method.params;
        let body = if params > 0 {
            quote! { ::core::result::Result::Err(::problemdetail::AccessError::Arity(#params)) }
        } else if method.fallible {
            quote! {
                match e.#call() {
                    ::core::result::Result::Ok(value) => ::problemdetail::member_value(&value),
                    ::core::result::Result::Err(err) => ::core::result::Result::Err(
                        ::problemdetail::AccessError::Failed(::std::string::ToString::to_string(&err)),
                    ),
                }
            }
        } else {
            quote! { ::problemdetail::member_value(&e.#call()) }
        };
        let receiver = if params > 0 {
            quote! { _: &#ident }
        } else {
            quote! { e: &#ident }
        };
        readers.push(quote! {
            fn #reader(#receiver) -> #result {
                #body
            }
        });
        let label = call.unraw().to_string();
        let marker = marker_tokens(method.marker, method.name.as_deref());
        let mut entry = quote! { ::problemdetail::Member::method(#label, #marker, #reader) };
        if params > 0 {
            entry = quote! { #entry.with_params(#params) };
        }
        entries.push(entry);
    }

    quote! {
        fn members() -> &'static [::problemdetail::Member<Self>] {
            #(#readers)*

            const MEMBERS: &[::problemdetail::Member<#ident>] = &[#(#entries),*];
            MEMBERS
        }
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, span: Span, key: &str) {
    if slot.is_some() {
        abort!(span, "duplicate attribute `{}`", key);
    }
    *slot = Some(value);
}

fn parse_status(lit: &LitInt) -> u16 {
    match lit.base10_parse::<u16>() {
        Ok(code) if (100..=599).contains(&code) => code,
        _ => abort!(lit.span(), "status must be an HTTP status code in 100..=599"),
    }
}

fn level_variant(level: &str) -> Option<&'static str> {
    LOG_LEVELS
        .iter()
        .find(|(spelling, _)| spelling.eq_ignore_ascii_case(level))
        .map(|(_, variant)| *variant)
}

fn parse_level(lit: &LitStr) -> &'static str {
    let level = lit.value();
    match level_variant(&level) {
        Some(variant) => variant,
        None => abort!(
            lit.span(),
            "unknown log level `{}`; expected one of auto, error, warning, info, debug, off",
            level
        ),
    }
}

/// Parse all container `#[problem(...)]` attributes with duplicate detection
fn parse_kind_attrs(input: &DeriveInput) -> KindConfig {
    let mut config = KindConfig::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("problem") {
            continue;
        }

        let result = attr.parse_nested_meta(|meta| {
            let span = meta.path.span();

            if meta.path.is_ident("status") {
                let lit: LitInt = meta.value()?.parse()?;
                set_once(&mut config.status, parse_status(&lit), span, "status");
            } else if meta.path.is_ident("type_uri") {
                let lit: LitStr = meta.value()?.parse()?;
                set_once(&mut config.type_uri, lit.value(), span, "type_uri");
            } else if meta.path.is_ident("title") {
                let lit: LitStr = meta.value()?.parse()?;
                set_once(&mut config.title, lit.value(), span, "title");
            } else if meta.path.is_ident("bad_argument") {
                set_once(&mut config.bad_argument, span, span, "bad_argument");
            } else if meta.path.is_ident("logging") {
                meta.parse_nested_meta(|inner| {
                    let inner_span = inner.path.span();
                    if inner.path.is_ident("to") {
                        let lit: LitStr = inner.value()?.parse()?;
                        set_once(&mut config.logging_to, lit.value(), inner_span, "to");
                    } else if inner.path.is_ident("at") {
                        let lit: LitStr = inner.value()?.parse()?;
                        set_once(&mut config.logging_at, parse_level(&lit), inner_span, "at");
                    } else {
                        return Err(inner.error("expected `to` or `at`"));
                    }
                    Ok(())
                })?;
            } else if let Some(marker) = MarkerKind::from_path(&meta.path) {
                config.methods.push(parse_method(marker, &meta)?);
            } else {
                return Err(meta.error(
                    "expected `status`, `type_uri`, `title`, `bad_argument`, `logging`, \
                     `detail`, `instance` or `extension`",
                ));
            }
            Ok(())
        });

        if let Err(err) = result {
            abort!(err.span(), "{}", err);
        }
    }

    config
}

fn parse_method(marker: MarkerKind, meta: &ParseNestedMeta<'_>) -> syn::Result<MethodMember> {
    let span = meta.path.span();
    let mut method: Option<Ident> = None;
    let mut name: Option<String> = None;
    let mut params: Option<usize> = None;
    let mut fallible: Option<Span> = None;

    meta.parse_nested_meta(|inner| {
        let inner_span = inner.path.span();
        if inner.path.is_ident("method") {
            let lit: LitStr = inner.value()?.parse()?;
            set_once(&mut method, lit.parse::<Ident>()?, inner_span, "method");
        } else if inner.path.is_ident("name") {
            if marker != MarkerKind::Extension {
                abort!(inner_span, "`name` is only supported on `extension`");
            }
            let lit: LitStr = inner.value()?.parse()?;
            set_once(&mut name, lit.value(), inner_span, "name");
        } else if inner.path.is_ident("params") {
            let lit: LitInt = inner.value()?.parse()?;
            set_once(&mut params, lit.base10_parse::<usize>()?, inner_span, "params");
        } else if inner.path.is_ident("fallible") {
            set_once(&mut fallible, inner_span, inner_span, "fallible");
        } else {
            return Err(inner.error("expected `method`, `name`, `params` or `fallible`"));
        }
        Ok(())
    })?;

    let Some(method) = method else {
        abort!(span, "missing `method = \"...\"`");
    };
    Ok(MethodMember {
        marker,
        method,
        name,
        params: params.unwrap_or(0),
        fallible: fallible.is_some(),
    })
}

fn parse_field_markers(fields: &Fields) -> Vec<FieldMember> {
    let mut markers = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let (access, label) = match &field.ident {
            Some(ident) => (syn::Member::Named(ident.clone()), ident.unraw().to_string()),
            None => (syn::Member::Unnamed(syn::Index::from(index)), index.to_string()),
        };

        for attr in &field.attrs {
            if !attr.path().is_ident("problem") {
                continue;
            }

            let result = attr.parse_nested_meta(|meta| {
                let Some(marker) = MarkerKind::from_path(&meta.path) else {
                    return Err(meta.error("expected `detail`, `instance` or `extension`"));
                };
                let name = if marker == MarkerKind::Extension && meta.input.peek(syn::Token![=]) {
                    let lit: LitStr = meta.value()?.parse()?;
                    Some(lit.value())
                } else {
                    None
                };
                markers.push(FieldMember {
                    access: access.clone(),
                    label: label.clone(),
                    marker,
                    name,
                });
                Ok(())
            });

            if let Err(err) = result {
                abort!(err.span(), "{}", err);
            }
        }
    }

    markers
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn compact(tokens: &TokenStream) -> String {
        tokens.to_string().split_whitespace().collect()
    }

    #[test]
    fn level_spellings_map_to_variants() {
        assert_eq!(level_variant("warn"), Some("Warning"));
        assert_eq!(level_variant("warning"), Some("Warning"));
        assert_eq!(level_variant("off"), Some("Off"));
        assert_eq!(level_variant("WARNING"), Some("Warning"));
        assert_eq!(level_variant("Debug"), Some("Debug"));
        assert_eq!(level_variant("loud"), None);
    }

    #[test]
    fn container_attributes_build_the_kind() {
        let input: DeriveInput = parse_quote! {
            #[problem(status = 403, title = "Broke")]
            #[problem(logging(at = "warn"))]
            struct OutOfCreditException;
        };
        let config = parse_kind_attrs(&input);
        let kind = compact(&kind_tokens(&input.ident, &config));

        assert!(kind.contains("ExceptionKind::new(\"OutOfCreditException\""));
        assert!(kind.contains(".with_status(403u16)"));
        assert!(kind.contains(".with_title(\"Broke\")"));
        assert!(kind.contains("Logging::new(\"\",::problemdetail::LogLevel::Warning)"));
        assert!(!kind.contains("bad_argument"));
    }

    #[test]
    fn marked_fields_and_methods_become_members() {
        let input: DeriveInput = parse_quote! {
            #[problem(bad_argument, detail(method = "summary"))]
            #[problem(extension(method = "lookup", name = "found", params = 2))]
            struct InvalidOrder {
                #[problem(instance)]
                order: String,
                #[problem(detail, extension = "qty")]
                quantity: u32,
                untouched: bool,
            }
        };
        let Data::Struct(data) = &input.data else {
            panic!("struct expected");
        };
        let config = parse_kind_attrs(&input);
        let fields = parse_field_markers(&data.fields);
        assert_eq!(fields.len(), 3);
        assert_eq!(config.methods.len(), 2);
        assert!(config.bad_argument.is_some());

        let members = compact(&members_tokens(&input.ident, &fields, &config.methods));
        assert!(members.contains("Member::field(\"order\",::problemdetail::Marker::Instance"));
        assert!(members.contains("Marker::Extension(::core::option::Option::Some(\"qty\"))"));
        assert!(members.contains("Member::method(\"summary\",::problemdetail::Marker::Detail"));
        assert!(members.contains(".with_params(2usize)"));
        assert!(members.contains("AccessError::Arity(2usize)"));
        assert!(!members.contains("untouched"));
    }

    #[test]
    fn tuple_fields_are_labelled_by_index() {
        let input: DeriveInput = parse_quote! {
            struct Rejected(#[problem(detail)] String, #[problem(instance)] String);
        };
        let Data::Struct(data) = &input.data else {
            panic!("struct expected");
        };
        let markers = parse_field_markers(&data.fields);
        let labels: Vec<&str> = markers.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, ["0", "1"]);
    }

    #[test]
    fn unmarked_struct_keeps_default_members() {
        let input: DeriveInput = parse_quote! { struct Plain { reason: String } };
        let Data::Struct(data) = &input.data else {
            panic!("struct expected");
        };
        let fields = parse_field_markers(&data.fields);
        assert!(members_tokens(&input.ident, &fields, &[]).is_empty());
    }
}
