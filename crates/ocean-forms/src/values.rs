//! Typed form value sets.

use std::collections::{BTreeMap, HashMap};

/// A set of named string fields fixed at construction.
///
/// The engine never adds or removes fields: [`FormValues::set`] must return
/// `false` for a name outside [`FormValues::field_names`].
pub trait FormValues: Clone + Send + Sync + 'static {
    /// Returns the declared field names.
    fn field_names(&self) -> Vec<String>;

    /// Returns the current value of a field.
    fn get(&self, field: &str) -> Option<&str>;

    /// Assigns a field, returning `false` if the field is not declared.
    fn set(&mut self, field: &str, value: String) -> bool;

    /// Returns whether the field is declared.
    fn has_field(&self, field: &str) -> bool {
        self.get(field).is_some()
    }
}

impl FormValues for BTreeMap<String, String> {
    fn field_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn get(&self, field: &str) -> Option<&str> {
        BTreeMap::get(self, field).map(String::as_str)
    }

    fn set(&mut self, field: &str, value: String) -> bool {
        match self.get_mut(field) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

impl FormValues for HashMap<String, String> {
    fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.keys().cloned().collect();
        names.sort();
        names
    }

    fn get(&self, field: &str) -> Option<&str> {
        HashMap::get(self, field).map(String::as_str)
    }

    fn set(&mut self, field: &str, value: String) -> bool {
        match self.get_mut(field) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

/// Implements [`FormValues`] for a struct whose listed fields are `String`s.
///
/// ```rust
/// use ocean_forms::{form_values, FormValues};
///
/// #[derive(Debug, Clone, Default)]
/// struct LoginForm {
///     email: String,
///     password: String,
/// }
///
/// form_values!(LoginForm { email, password });
///
/// let mut form = LoginForm::default();
/// assert!(form.set("email", "a@b.com".to_string()));
/// assert!(!form.set("nickname", "x".to_string()));
/// assert_eq!(form.field_names(), vec!["email", "password"]);
/// ```
#[macro_export]
macro_rules! form_values {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::FormValues for $ty {
            fn field_names(&self) -> ::std::vec::Vec<::std::string::String> {
                ::std::vec![$(::std::string::String::from(stringify!($field))),+]
            }

            fn get(&self, field: &str) -> ::std::option::Option<&str> {
                match field {
                    $(stringify!($field) => ::std::option::Option::Some(self.$field.as_str()),)+
                    _ => ::std::option::Option::None,
                }
            }

            fn set(&mut self, field: &str, value: ::std::string::String) -> bool {
                match field {
                    $(stringify!($field) => {
                        self.$field = value;
                        true
                    })+
                    _ => false,
                }
            }
        }
    };
}
