use std::any::type_name;
use std::fmt::Display;

use crate::core::object::MwsObject;
use crate::error::{MwsError, Result};
use crate::item::xml::{MwsXmlReader, XmlElement, XmlNode};

/// A type that can be produced from XML content.
///
/// Text-valued types (strings, numbers, booleans, dates, enumerations)
/// implement [`from_xml_text`](XmlValue::from_xml_text) and get element
/// reads for free: the element's inner text is converted. Every
/// [`MwsObject`] is an `XmlValue` through a blanket impl that enters the
/// element and lets the object read itself, and [`XmlElement`] copies the
/// element out untouched.
///
/// Types that only make sense as elements keep the default
/// `from_xml_text`, which fails with
/// [`MwsError::UnsupportedConversionType`].
pub trait XmlValue: Sized {
    /// Convert a text token, such as an attribute value or a text node.
    fn from_xml_text(_text: &str) -> Result<Self> {
        Err(MwsError::UnsupportedConversionType(type_name::<Self>()))
    }

    /// Convert a matched element.
    fn from_xml_node(_reader: &MwsXmlReader, node: XmlNode<'_>) -> Result<Self> {
        Self::from_xml_text(&node.inner_text())
    }

    /// Convert a matched element read through `Option<Self>`.
    ///
    /// Text-valued types yield `None` for an element with no text.
    fn from_optional_xml_node(_reader: &MwsXmlReader, node: XmlNode<'_>) -> Result<Option<Self>> {
        let text = node.inner_text();
        if text.is_empty() {
            Ok(None)
        } else {
            Self::from_xml_text(&text).map(Some)
        }
    }
}

impl<T: MwsObject> XmlValue for T {
    fn from_xml_node(reader: &MwsXmlReader, node: XmlNode<'_>) -> Result<Self> {
        let mut object = T::default();
        reader.read_nested(node, |reader| object.read_fragment_from(reader))?;
        Ok(object)
    }

    fn from_optional_xml_node(reader: &MwsXmlReader, node: XmlNode<'_>) -> Result<Option<Self>> {
        Self::from_xml_node(reader, node).map(Some)
    }
}

impl XmlValue for XmlElement {
    fn from_xml_node(_reader: &MwsXmlReader, node: XmlNode<'_>) -> Result<Self> {
        node.to_element().ok_or(MwsError::NullNode)
    }

    fn from_optional_xml_node(reader: &MwsXmlReader, node: XmlNode<'_>) -> Result<Option<Self>> {
        Self::from_xml_node(reader, node).map(Some)
    }
}

impl<T: XmlValue> XmlValue for Option<T> {
    fn from_xml_text(text: &str) -> Result<Self> {
        if text.is_empty() {
            Ok(None)
        } else {
            T::from_xml_text(text).map(Some)
        }
    }

    fn from_xml_node(reader: &MwsXmlReader, node: XmlNode<'_>) -> Result<Self> {
        T::from_optional_xml_node(reader, node)
    }
}

impl XmlValue for String {
    fn from_xml_text(text: &str) -> Result<Self> {
        Ok(text.to_string())
    }
}

impl XmlValue for bool {
    fn from_xml_text(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(conversion_error::<bool>(text, "expected 'true' or 'false'"))
        }
    }
}

impl XmlValue for char {
    fn from_xml_text(text: &str) -> Result<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(conversion_error::<char>(text, "expected exactly one character")),
        }
    }
}

macro_rules! impl_parsed_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl XmlValue for $ty {
                fn from_xml_text(text: &str) -> Result<Self> {
                    text.trim()
                        .parse::<$ty>()
                        .map_err(|e| conversion_error::<$ty>(text, e))
                }
            }
        )*
    };
}

impl_parsed_scalar!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

#[cfg(feature = "decimal")]
mod decimal {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::XmlValue;
    use crate::error::{MwsError, Result};

    impl XmlValue for Decimal {
        fn from_xml_text(text: &str) -> Result<Self> {
            parse_decimal(text)
        }
    }

    const MAX_SCALE: u32 = 28;

    /// `mantissa` shifted right by `excess` digits, rounded half away from
    /// zero, at the largest scale a `Decimal` can hold.
    fn round_to_max_scale(
        mantissa: i128,
        excess: u32,
    ) -> std::result::Result<Decimal, rust_decimal::Error> {
        // A 96-bit mantissa has at most 29 digits
        let reduced = if excess > 29 {
            0
        } else {
            let divisor = 10i128.pow(excess);
            let quotient = mantissa / divisor;
            if (mantissa % divisor).abs() * 2 >= divisor {
                quotient + mantissa.signum()
            } else {
                quotient
            }
        };
        Decimal::try_from_i128_with_scale(reduced, MAX_SCALE)
    }

    /// Parse a decimal with invariant formatting: optional sign, digits, an
    /// optional decimal point and an optional exponent.
    fn parse_decimal(text: &str) -> Result<Decimal> {
        let numeric_error = |reason: String| MwsError::NumericParse {
            value: text.to_string(),
            reason,
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(numeric_error("empty input".to_string()));
        }
        if let Some(c) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        {
            return Err(numeric_error(format!("unexpected character '{}'", c)));
        }

        let (mantissa, exponent) = match trimmed.find(['e', 'E']) {
            Some(pos) => (&trimmed[..pos], Some(&trimmed[pos + 1..])),
            None => (trimmed, None),
        };

        let mut value = Decimal::from_str(mantissa).map_err(|e| numeric_error(e.to_string()))?;

        if let Some(exponent) = exponent {
            let exponent: i32 = exponent
                .parse()
                .map_err(|e| numeric_error(format!("invalid exponent: {}", e)))?;
            if exponent >= 0 {
                for _ in 0..exponent {
                    if value.is_zero() {
                        break;
                    }
                    value = value
                        .checked_mul(Decimal::TEN)
                        .ok_or_else(|| numeric_error("value out of range".to_string()))?;
                }
            } else {
                let scale = value.scale() + exponent.unsigned_abs();
                if scale <= MAX_SCALE {
                    value
                        .set_scale(scale)
                        .map_err(|e| numeric_error(e.to_string()))?;
                } else {
                    value = round_to_max_scale(value.mantissa(), scale - MAX_SCALE)
                        .map_err(|e| numeric_error(e.to_string()))?;
                }
            }
        }

        Ok(value)
    }
}

#[cfg(feature = "chrono")]
mod datetime {
    use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

    use super::{conversion_error, XmlValue};
    use crate::error::Result;

    impl XmlValue for DateTime<FixedOffset> {
        fn from_xml_text(text: &str) -> Result<Self> {
            DateTime::parse_from_rfc3339(text.trim()).map_err(|e| conversion_error::<Self>(text, e))
        }
    }

    impl XmlValue for DateTime<Utc> {
        fn from_xml_text(text: &str) -> Result<Self> {
            let trimmed = text.trim();
            match DateTime::parse_from_rfc3339(trimmed) {
                Ok(value) => Ok(value.with_timezone(&Utc)),
                // Timestamps without an offset are taken as UTC
                Err(e) => trimmed
                    .parse::<NaiveDateTime>()
                    .map(|naive| naive.and_utc())
                    .map_err(|_| conversion_error::<Self>(text, e)),
            }
        }
    }

    impl XmlValue for NaiveDateTime {
        fn from_xml_text(text: &str) -> Result<Self> {
            text.trim()
                .parse::<NaiveDateTime>()
                .map_err(|e| conversion_error::<Self>(text, e))
        }
    }

    impl XmlValue for NaiveDate {
        fn from_xml_text(text: &str) -> Result<Self> {
            NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                .map_err(|e| conversion_error::<Self>(text, e))
        }
    }
}

fn conversion_error<T>(text: &str, reason: impl Display) -> MwsError {
    MwsError::TypeConversion {
        value: text.to_string(),
        target: type_name::<T>(),
        reason: reason.to_string(),
    }
}
