mod message;

use quote::quote;
use syn::{parse_macro_input, parse_quote, punctuated::Punctuated, DeriveInput, Token, WhereClause};

/// derives the `Message` trait for a struct whose members are all fields.
///
/// the fields are serialized in declaration order, and deserialized by matching the field number of each tag
/// against the field numbers the fields were constructed with.
#[proc_macro_derive(Message)]
pub fn derive_message(input_tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input_tokens as DeriveInput);
    message::do_derive_message(&input).into()
}

/// the parameters required for generating an implementation of the `Message` trait.
struct GenImplParams<'a> {
    derive_input: &'a DeriveInput,
    field_types: Vec<&'a syn::Type>,
    serialize_fields_code: proc_macro2::TokenStream,
    deserialize_field_code: proc_macro2::TokenStream,
    clear_code: proc_macro2::TokenStream,
    serialized_size_code: proc_macro2::TokenStream,
}

/// generates an implementation of the `Message` trait from the given parameters.
fn gen_impl(params: GenImplParams) -> proc_macro2::TokenStream {
    let GenImplParams {
        derive_input,
        field_types,
        serialize_fields_code,
        deserialize_field_code,
        clear_code,
        serialized_size_code,
    } = params;
    let ty_ident = &derive_input.ident;
    let (impl_generics, type_generics, maybe_where_clause) = derive_input.generics.split_for_impl();
    let mut where_clause = maybe_where_clause.cloned().unwrap_or_else(|| WhereClause {
        where_token: Token![where](proc_macro2::Span::call_site()),
        predicates: Punctuated::new(),
    });
    for field_type in field_types {
        where_clause.predicates.push(parse_quote! {
            #field_type: ::stackproto::Field
        })
    }
    quote! {
        #[automatically_derived]
        impl #impl_generics ::stackproto::Message for #ty_ident #type_generics #where_clause {
            fn serialize_fields<B: ::stackproto::Buffer + ?Sized>(
                &self,
                buffer: &mut B,
            ) -> ::core::result::Result<(), ::stackproto::Error> {
                #serialize_fields_code
            }

            // messages without fields never look at the tag
            #[allow(unused_variables)]
            fn deserialize_field<B: ::stackproto::Buffer + ?Sized>(
                &mut self,
                field_number: u32,
                wire_type: ::stackproto::WireType,
                buffer: &mut B,
            ) -> ::core::result::Result<bool, ::stackproto::Error> {
                #deserialize_field_code
            }

            fn clear(&mut self) {
                #clear_code
            }

            fn serialized_size(&self) -> usize {
                #serialized_size_code
            }
        }
    }
}
