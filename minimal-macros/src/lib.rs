// This macro is based very heavily on the entry one in rust-embedded
use proc_macro::TokenStream;

use proc_macro2::Span;
use quote::{quote, ToTokens};
use syn::{FnArg, Ident, ItemFn, Pat, ReturnType, Token, Type, Visibility};

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const SIGNATURE_ERROR: &str = "#[minimal::entry] must have signature [unsafe] fn (mut minimal::Gba) -> !";

fn token_stream_with_string_error(
    mut tokens: proc_macro2::TokenStream,
    error_str: &str,
) -> proc_macro2::TokenStream {
    tokens.extend(quote! { compile_error!(#error_str); });
    tokens
}

#[proc_macro_attribute]
pub fn entry(args: TokenStream, input: TokenStream) -> TokenStream {
    entry_impl(args.into(), input.into()).into()
}

fn entry_impl(
    args: proc_macro2::TokenStream,
    input: proc_macro2::TokenStream,
) -> proc_macro2::TokenStream {
    let f: ItemFn = match syn::parse2(input.clone()) {
        Ok(it) => it,
        Err(_) => return input,
    };

    // Check that the function signature is correct
    if !(f.sig.constness.is_none()
        && f.vis == Visibility::Inherited
        && f.sig.abi.is_none()
        && f.sig.generics.params.is_empty()
        && f.sig.generics.where_clause.is_none()
        && match f.sig.output {
            ReturnType::Type(_, ref ty) => matches!(**ty, Type::Never(_)),
            _ => false,
        })
    {
        return token_stream_with_string_error(input, SIGNATURE_ERROR);
    }

    // Check that the function signature takes 1 argument, minimal::Gba
    let arguments: Vec<_> = f.sig.inputs.iter().collect();

    if arguments.len() != 1 {
        return token_stream_with_string_error(
            input,
            &format!(
                "{SIGNATURE_ERROR}, but got {} arguments",
                arguments.len()
            ),
        );
    }

    let (argument_type, (argument_name, is_mutable)) = match arguments[0] {
        FnArg::Typed(pat_type) => (
            pat_type.ty.to_token_stream(),
            match &*pat_type.pat {
                Pat::Ident(ident) => {
                    if !(ident.attrs.is_empty() && ident.by_ref.is_none() && ident.subpat.is_none())
                    {
                        return token_stream_with_string_error(input, SIGNATURE_ERROR);
                    }

                    (ident.ident.clone(), ident.mutability.is_some())
                }
                _ => {
                    return token_stream_with_string_error(
                        input,
                        "Expected first argument to #[minimal::entry] to be a basic identifier",
                    )
                }
            },
        ),
        FnArg::Receiver(_) => {
            return token_stream_with_string_error(
                input,
                "Expected first argument to #[minimal::entry] to not be self",
            )
        }
    };

    if !args.is_empty() {
        return token_stream_with_string_error(
            input,
            "Must pass no args to #[minimal::entry] macro",
        );
    }

    if !argument_type.to_string().ends_with("Gba") {
        return token_stream_with_string_error(input, "Expected first argument to have type 'Gba'");
    }

    let fn_name = hashed_ident(&f);

    let attrs = f.attrs;
    let stmts = f.block.stmts;

    let mutable = if is_mutable {
        Some(Token![mut](Span::call_site()))
    } else {
        None
    };

    quote!(
        #[export_name = "main"]
        #[doc(hidden)]
        #(#attrs)*
        pub extern "C" fn #fn_name() -> ! {
            let #mutable #argument_name = unsafe { #argument_type ::new_in_entry() };

            #(#stmts)*
        }
    )
}

fn hashed_ident<T: Hash>(f: &T) -> Ident {
    let hash = calculate_hash(f);
    Ident::new(&format!("_minimal_main_func_{hash}"), Span::call_site())
}

fn calculate_hash<T: Hash>(t: &T) -> u64 {
    let mut s = DefaultHasher::new();
    t.hash(&mut s);
    s.finish()
}
