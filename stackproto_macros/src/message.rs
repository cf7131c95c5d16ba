use quote::{quote, quote_spanned};
use syn::{spanned::Spanned, DeriveInput};

use crate::{gen_impl, GenImplParams};

pub fn do_derive_message(input: &DeriveInput) -> proc_macro2::TokenStream {
    match &input.data {
        syn::Data::Struct(data_struct) => derive_message_for_struct(input, &data_struct.fields),
        syn::Data::Enum(data_enum) => {
            quote_spanned! {
                data_enum.enum_token.span() => compile_error!("messages must be structs, enums are not supported");
            }
        }
        syn::Data::Union(data_union) => {
            quote_spanned! {
                data_union.union_token.span() => compile_error!("messages must be structs, unions are not supported");
            }
        }
    }
}

fn derive_message_for_struct(
    derive_input: &DeriveInput,
    fields: &syn::Fields,
) -> proc_macro2::TokenStream {
    let accessors: Vec<syn::Member> = field_accessors(fields).collect();

    gen_impl(GenImplParams {
        derive_input,
        field_types: fields.iter().map(|field| &field.ty).collect(),
        serialize_fields_code: gen_serialize_fields_code(&accessors),
        deserialize_field_code: gen_deserialize_field_code(&accessors),
        clear_code: gen_clear_code(&accessors),
        serialized_size_code: gen_serialized_size_code(&accessors),
    })
}

/// generates accessors for the given fields. each accessor can be prepended with `self.` to access the field.
fn field_accessors(fields: &syn::Fields) -> impl Iterator<Item = syn::Member> + '_ {
    fields
        .iter()
        .enumerate()
        .map(|(field_index, field)| match &field.ident {
            Some(ident) => syn::Member::Named(ident.clone()),
            None => syn::Member::Unnamed(syn::Index::from(field_index)),
        })
}

/// generates code which serializes the fields one after the other, in declaration order.
fn gen_serialize_fields_code(accessors: &[syn::Member]) -> proc_macro2::TokenStream {
    quote! {
        #(
            ::stackproto::Field::serialize(&self.#accessors, buffer)?;
        )*
        ::core::result::Result::Ok(())
    }
}

/// generates code which routes a payload to the field whose number matches the tag.
fn gen_deserialize_field_code(accessors: &[syn::Member]) -> proc_macro2::TokenStream {
    quote! {
        #(
            if field_number == ::stackproto::Field::field_number(&self.#accessors) {
                ::stackproto::message::deserialize_checked(&mut self.#accessors, wire_type, buffer)?;
                return ::core::result::Result::Ok(true);
            }
        )*
        ::core::result::Result::Ok(false)
    }
}

fn gen_clear_code(accessors: &[syn::Member]) -> proc_macro2::TokenStream {
    quote! {
        #(
            ::stackproto::Field::clear(&mut self.#accessors);
        )*
    }
}

fn gen_serialized_size_code(accessors: &[syn::Member]) -> proc_macro2::TokenStream {
    quote! {
        0 #(
            + ::stackproto::Field::serialized_size(&self.#accessors)
        )*
    }
}
