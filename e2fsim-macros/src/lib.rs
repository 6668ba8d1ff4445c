use proc_macro::TokenStream;

use proc_macro2::{Ident, Span};

#[macro_use]
extern crate quote;

fn image_number(input: TokenStream) -> usize {
    let lit: syn::LitInt = syn::parse(input).expect("expected an image number");
    lit.base10_parse::<usize>().expect("image number out of range")
}

fn image_file(n: usize) -> String {
    format!("test_{:04}.img", n)
}

/// `generate_image!(n)` writes `test_NNNN.img` with `generate_NNNN` and
/// checks it against `hashes.txt`.
#[cfg(not(tarpaulin_include))]
#[proc_macro]
pub fn generate_image(input: TokenStream) -> TokenStream {
    let n = image_number(input);
    let filename = image_file(n);
    let generator = Ident::new(&format!("generate_{:04}", n), Span::call_site());
    let output = quote! {
        {
            let file = std::fs::OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(true)
                .open(#filename)
                .unwrap();
            #generator(&file);
        }
        e2fsim_tests::imagegen::verify_image(#n);
    };
    output.into()
}

/// `load_image!(n)` is an `e2fsim::Volume` on `test_NNNN.img`.
#[cfg(not(tarpaulin_include))]
#[proc_macro]
pub fn load_image(input: TokenStream) -> TokenStream {
    let filename = image_file(image_number(input));
    let output = quote! {
        e2fsim::Volume::new(#filename)
    };
    output.into()
}

/// `assert_or_err!(cond, err)` returns `Err(err.into())` unless `cond` holds.
#[cfg(not(tarpaulin_include))]
#[proc_macro]
pub fn assert_or_err(input: TokenStream) -> TokenStream {
    let params = syn::parse_macro_input!(input with syn::punctuated::Punctuated<syn::Expr, syn::Token![,]>::parse_separated_nonempty);
    assert_eq!(params.len(), 2, "assert_or_err!(condition, error)");
    let (cond, error) = (&params[0], &params[1]);
    let output = quote! {
        if !(#cond) {
            return Err(#error.into());
        }
    };
    output.into()
}

/// A `#[test]` that sets up logging first. Other attributes are kept.
#[cfg(not(tarpaulin_include))]
#[proc_macro_attribute]
pub fn test_fs(_: TokenStream, item: TokenStream) -> TokenStream {
    let syn::ItemFn { attrs, sig, block, .. } = syn::parse_macro_input!(item as syn::ItemFn);
    let body = &block.stmts;
    let output = quote! {
        #[test]
        #(#attrs)*
        #sig {
            e2fsim::test::logging::init_log();
            #(#body)*
        }
    };
    output.into()
}
