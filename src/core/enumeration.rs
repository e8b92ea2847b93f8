use std::any::type_name;

use crate::error::{MwsError, Result};

/// An enumeration whose members are written in XML by their symbolic name.
///
/// Implemented by [`mws_enum!`](crate::mws_enum); the member table drives
/// both directions of the name mapping.
pub trait MwsEnum: Copy + 'static {
    /// Every member with its symbolic name, in declaration order.
    const MEMBERS: &'static [(&'static str, Self)];

    fn member_name(&self) -> &'static str;
}

/// Look up the member of `E` named exactly `text`.
///
/// The comparison is case-sensitive and no white space is trimmed.
pub fn enum_value<E: MwsEnum>(text: &str) -> Result<E> {
    E::MEMBERS
        .iter()
        .find(|(name, _)| *name == text)
        .map(|(_, member)| *member)
        .ok_or_else(|| MwsError::UnknownEnumMember {
            enumeration: type_name::<E>(),
            value: text.to_string(),
        })
}

/// Declare an enumeration that converts from its members' symbolic names.
///
/// The generated type derives `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`
/// and `Hash`, implements [`MwsEnum`], [`XmlValue`](crate::core::value::XmlValue)
/// and `Display`, and gets an `as_str()` accessor.
///
/// # Examples
///
/// ```
/// use mws_runtime::mws_enum;
/// use mws_runtime::core::value::XmlValue;
///
/// mws_enum! {
///     pub enum FulfillmentChannel {
///         AFN,
///         MFN,
///     }
/// }
///
/// assert_eq!(FulfillmentChannel::from_xml_text("MFN").unwrap(), FulfillmentChannel::MFN);
/// assert_eq!(FulfillmentChannel::AFN.to_string(), "AFN");
/// assert!(FulfillmentChannel::from_xml_text("mfn").is_err());
/// ```
#[macro_export]
macro_rules! mws_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl $name {
            /// Symbolic name of this member.
            pub fn as_str(&self) -> &'static str {
                <Self as $crate::core::enumeration::MwsEnum>::member_name(self)
            }
        }

        impl $crate::core::enumeration::MwsEnum for $name {
            const MEMBERS: &'static [(&'static str, Self)] = &[
                $( (stringify!($variant), $name::$variant), )*
            ];

            fn member_name(&self) -> &'static str {
                match *self {
                    $( $name::$variant => stringify!($variant), )*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::core::value::XmlValue for $name {
            fn from_xml_text(text: &str) -> $crate::Result<Self> {
                $crate::core::enumeration::enum_value(text)
            }
        }
    };
}
