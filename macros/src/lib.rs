//! Macros for [benchtop](https://docs.rs/benchtop), a time-budgeted
//! micro-benchmarking harness.
//!
//! See the `benchtop` crate for documentation.

use proc_macro::TokenStream;
use quote::{quote, ToTokens};

/// Registers a function of signature `fn(&mut benchtop::Context)` as a
/// benchmark.
///
/// # Options
///
/// - `name = "..."` overrides the display name (defaults to the function
///   name).
/// - `crate = path` points generated code at a renamed `benchtop` crate.
#[proc_macro_attribute]
pub fn bench(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut benchtop_crate = None::<syn::Path>;
    let mut bench_name_expr = None::<syn::Expr>;

    let attr_parser = syn::meta::parser(|meta| {
        let repeat_error = || Err(meta.error("repeated 'bench' property"));

        macro_rules! parse {
            ($storage:ident) => {
                if $storage.is_none() {
                    $storage = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    repeat_error()
                }
            };
        }

        if meta.path.is_ident("crate") {
            parse!(benchtop_crate)
        } else if meta.path.is_ident("name") {
            parse!(bench_name_expr)
        } else {
            Err(meta.error("unsupported 'bench' property"))
        }
    });

    syn::parse_macro_input!(attr with attr_parser);

    // Items needed by generated code.
    //
    // Access to libstd is through a re-export because it's possible (although
    // unlikely) to do `extern crate x as std`, which would cause `::std` to
    // reference crate `x` instead.
    let benchtop_crate = benchtop_crate.unwrap_or_else(|| syn::parse_quote!(::benchtop));
    let private_mod = quote! { #benchtop_crate::__private };
    let linkme_crate = quote! { #private_mod::linkme };
    let std_crate = quote! { #private_mod::std };

    let fn_item = item.clone();
    let fn_item = syn::parse_macro_input!(fn_item as syn::ItemFn);

    let fn_ident = &fn_item.sig.ident;
    let fn_name = fn_ident.to_string();
    let fn_name_pretty = fn_name.strip_prefix("r#").unwrap_or(&fn_name);

    let bench_name_expr: &dyn ToTokens = match &bench_name_expr {
        Some(name) => name,
        None => &fn_name_pretty,
    };

    // Prefixed with "__" to prevent IDEs from recommending using this symbol.
    let fn_dup_ident =
        syn::Ident::new(&format!("__benchtop_{fn_name_pretty}_bench_is_duplicate"), fn_ident.span());

    let generated_items = quote! {
        // Causes a compile error if this attribute is used multiple times on
        // the same function.
        #[doc(hidden)]
        #[allow(warnings, clippy::all)]
        fn #fn_dup_ident() {}

        // This `const _` prevents collisions in the current scope by giving us
        // an anonymous scope to place our static in. As a result, this macro
        // can be used multiple times within the same scope.
        #[doc(hidden)]
        const _: () = {
            #[#linkme_crate::distributed_slice(#private_mod::ENTRIES)]
            #[linkme(crate = #linkme_crate)]
            static __BENCHTOP_BENCH_ENTRY: #private_mod::Entry = #private_mod::Entry {
                name: #bench_name_expr,
                file: #std_crate::file!(),
                line: #std_crate::line!(),
                unit: #private_mod::UnitKind::Function(#fn_ident),
            };
        };
    };

    // Append our generated code to the existing token stream.
    let mut result = item;
    result.extend(TokenStream::from(generated_items));
    result
}
