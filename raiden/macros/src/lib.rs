//! Derives wrapping a payload struct into the `Event` or `StateChange` enum variant of the same
//! name.
use proc_macro::TokenStream;
use quote::quote;
use syn::{
	parse_macro_input,
	DeriveInput,
	Ident,
};

fn wrap_into(input: DeriveInput, target: Ident) -> TokenStream {
	let name = input.ident;
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

	let expanded = quote! {
		impl #impl_generics From<#name #ty_generics> for #target #where_clause {
			fn from(value: #name #ty_generics) -> #target {
				#target::#name(value)
			}
		}
	};

	TokenStream::from(expanded)
}

/// Implements `From<T> for Event` where `Event::T(T)` is a variant in scope.
#[proc_macro_derive(IntoEvent)]
pub fn into_event(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	wrap_into(input, Ident::new("Event", proc_macro2::Span::call_site()))
}

/// Implements `From<T> for StateChange` where `StateChange::T(T)` is a variant in scope.
#[proc_macro_derive(IntoStateChange)]
pub fn into_state_change(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	wrap_into(input, Ident::new("StateChange", proc_macro2::Span::call_site()))
}
