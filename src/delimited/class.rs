//! Structured Str Records
//!
//! A [`StrClass`] maps the fields of a plain aggregate onto consecutive
//! tokens. Fields can be tagged with an optional *group*: a group is written
//! only if it or any later group holds a non-default value, and on read a
//! group is read whole if any token remains where it starts. Older records
//! simply stop before the groups they don't know about.

use super::reader::StrReader;
use super::span_str::SpanStr;
use super::writer::StrWriter;
use crate::error::{Error, Result};

/// A type that serializes to and from one delimited record.
pub trait StrClass {
    fn serialize(&self, writer: &mut StrWriter) -> Result<()>;

    fn deserialize(&mut self, reader: &mut StrReader<'_>) -> Result<()>;

    /// Serialize into a new string
    fn to_str_string(&self, separator: char) -> Result<String> {
        let mut writer = StrWriter::new(separator);
        self.serialize(&mut writer)?;
        Ok(writer.into_string())
    }

    /// Serialize into `dest`, returning the bytes written, or `None` if it doesn't fit
    fn try_format_into(&self, dest: &mut [u8], separator: char) -> Result<Option<usize>> {
        let mut writer = StrWriter::new(separator);
        self.serialize(&mut writer)?;
        let built = writer.built().as_bytes();
        let Some(dest) = dest.get_mut(..built.len()) else {
            return Ok(None);
        };
        dest.copy_from_slice(built);
        Ok(Some(built.len()))
    }

    /// Deserialize and require that the record has no tokens left over
    fn fully_deserialize(&mut self, reader: &mut StrReader<'_>) -> Result<()> {
        self.deserialize(reader)?;
        if reader.has_remaining() {
            return Err(Error::data_format("record had trailing data"));
        }
        Ok(())
    }
}

/// A single field of a [`StrClass`].
pub trait StrField: Sized {
    fn put_field(&self, writer: &mut StrWriter) -> Result<()>;

    fn get_field(reader: &mut StrReader<'_>) -> Result<Self>;
}

macro_rules! impl_str_field_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl StrField for $ty {
            fn put_field(&self, writer: &mut StrWriter) -> Result<()> {
                writer.put(self)
            }

            fn get_field(reader: &mut StrReader<'_>) -> Result<Self> {
                reader.get::<$ty>()
            }
        }
    )*};
}

impl_str_field_scalar!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, char);

impl StrField for bool {
    fn put_field(&self, writer: &mut StrWriter) -> Result<()> {
        writer.put_str(if *self { "1" } else { "0" });
        Ok(())
    }

    fn get_field(reader: &mut StrReader<'_>) -> Result<Self> {
        reader.get::<bool>()
    }
}

impl StrField for String {
    fn put_field(&self, writer: &mut StrWriter) -> Result<()> {
        writer.put_str(self);
        Ok(())
    }

    fn get_field(reader: &mut StrReader<'_>) -> Result<Self> {
        Ok(reader.get_str().to_owned())
    }
}

impl StrField for SpanStr<'static> {
    fn put_field(&self, writer: &mut StrWriter) -> Result<()> {
        writer.put_str(self);
        Ok(())
    }

    /// Records can't borrow from a reader they outlive, so the token is copied
    fn get_field(reader: &mut StrReader<'_>) -> Result<Self> {
        Ok(SpanStr::Owned(reader.get_str().to_owned()))
    }
}

/// Highest group holding a non-default field, given `(group, is_default)` pairs
pub fn last_needed_group(fields: &[(u32, bool)]) -> Option<u32> {
    fields
        .iter()
        .filter(|(_, is_default)| !is_default)
        .map(|&(group, _)| group)
        .max()
}

/// Whether a field of `group` is written when groups up to `last_needed` are needed
#[inline]
pub fn group_emitted(group: Option<u32>, last_needed: Option<u32>) -> bool {
    match (group, last_needed) {
        (None, _) => true,
        (Some(group), Some(last)) => group <= last,
        (Some(_), None) => false,
    }
}

/// Whether a field of `group` is read, tracking the group entered last in `entered`
///
/// The remaining-token check runs once, on the first field of a group. Every
/// field of a group that started with tokens left is read, even past the end.
pub fn group_read(
    entered: &mut Option<(u32, bool)>,
    group: Option<u32>,
    reader: &mut StrReader<'_>,
) -> bool {
    let Some(group) = group else {
        return true;
    };
    match *entered {
        Some((current, read)) if current == group => read,
        _ => {
            let read = reader.has_remaining();
            *entered = Some((group, read));
            read
        }
    }
}

/// Declare a struct and implement [`StrClass`] for it.
///
/// Fields map to tokens in declaration order. A `#[group(n)]` tag makes a
/// field optional; groups must appear in ascending order after all required
/// fields. Optional fields need `PartialEq + Default`.
///
/// ```
/// stackxml::str_class! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct Position {
///         pub x: i32,
///         pub y: i32,
///         #[group(0)]
///         pub z: i32,
///     }
/// }
///
/// use stackxml::delimited::{StrClass, StrReader};
///
/// let flat = Position { x: 1, y: 2, z: 0 };
/// assert_eq!(flat.to_str_string(',').unwrap(), "1,2");
///
/// let mut read = Position::default();
/// read.deserialize(&mut StrReader::new("1,2,3", ',')).unwrap();
/// assert_eq!(read.z, 3);
/// ```
#[macro_export]
macro_rules! str_class {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[group($group:literal)])?
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $fvis $field: $ty, )*
        }

        impl $crate::delimited::StrClass for $name {
            fn serialize(&self, writer: &mut $crate::delimited::StrWriter) -> $crate::Result<()> {
                let optional: &[(u32, bool)] = &[
                    $($(
                        ($group, self.$field == <$ty as ::core::default::Default>::default()),
                    )?)*
                ];
                let last_needed = $crate::delimited::last_needed_group(optional);
                $(
                    let group: Option<u32> = None $(.or(Some($group)))?;
                    if $crate::delimited::group_emitted(group, last_needed) {
                        $crate::delimited::StrField::put_field(&self.$field, writer)?;
                    }
                )*
                Ok(())
            }

            fn deserialize(
                &mut self,
                reader: &mut $crate::delimited::StrReader<'_>,
            ) -> $crate::Result<()> {
                let mut entered: Option<(u32, bool)> = None;
                $(
                    let group: Option<u32> = None $(.or(Some($group)))?;
                    if $crate::delimited::group_read(&mut entered, group, reader) {
                        self.$field = <$ty as $crate::delimited::StrField>::get_field(reader)?;
                    }
                )*
                Ok(())
            }
        }
    };
}
