//! Derive macro for the `magnitree` crate.

/// Derive macro generating an implementation of the trait `CatalogObject`
/// for point-like object types with `position` and `abs_mag` fields.
#[proc_macro_derive(CatalogObject)]
pub fn catalog_object_derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = syn::parse(input);

    impl_catalog_object(ast).unwrap_or_else(|e| syn::Error::to_compile_error(&e).into())
}

fn impl_catalog_object(
    input: syn::Result<syn::DeriveInput>,
) -> syn::Result<proc_macro::TokenStream> {
    let input = input?;

    let name = input.ident;
    let (pty, mty) = get_field_types(input.data)?;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote::quote! {
        impl #impl_generics CatalogObject for #name #ty_generics #where_clause {
            type Point = #pty;

            #[inline]
            fn position(&self) -> #pty {
                self.position
            }

            #[inline]
            fn absolute_magnitude(&self) -> #mty {
                self.abs_mag
            }
        }
    }
    .into())
}

fn get_field_types(data: syn::Data) -> syn::Result<(syn::Type, syn::Type)> {
    match &data {
        syn::Data::Struct(struct_data) => Ok((
            get_type_of(struct_data, "position")?,
            get_type_of(struct_data, "abs_mag")?,
        )),
        syn::Data::Enum(enum_data) => Err(syn::Error::new_spanned(
            enum_data.enum_token,
            "the `CatalogObject` trait can only be derived for struct types",
        )),
        syn::Data::Union(union_data) => Err(syn::Error::new_spanned(
            union_data.union_token,
            "the `CatalogObject` trait can only be derived for struct types",
        )),
    }
}

fn get_type_of(struct_data: &syn::DataStruct, field_name: &str) -> syn::Result<syn::Type> {
    struct_data
        .fields
        .iter()
        .find_map(|field| (field.ident.as_ref()? == field_name).then(|| field.ty.clone()))
        .ok_or_else(|| {
            syn::Error::new_spanned(&struct_data.fields, format!("no {field_name} field"))
        })
}
