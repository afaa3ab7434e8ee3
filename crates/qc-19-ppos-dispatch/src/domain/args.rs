//! # Typed Argument Lists
//!
//! A handler declares its parameters as a tuple of `rlp::Decodable` types.
//! The tuple knows its arity and how to decode each positional field, so the
//! dispatch table needs no runtime type inspection.

use rlp::{Decodable, DecoderError, Rlp};

/// Ordered list of typed argument decoders.
pub trait ArgList: Sized {
    /// Number of fields after the function code.
    const ARITY: usize;

    /// Decode `fields` (function code excluded) into the typed tuple.
    fn decode_args(fields: &[Vec<u8>]) -> Result<Self, String>;
}

/// Decode the field at `index` (0-based, after the function code).
fn decode_field<T: Decodable>(fields: &[Vec<u8>], index: usize) -> Result<T, String> {
    let bytes = fields
        .get(index)
        .ok_or_else(|| format!("missing argument #{}", index + 1))?;
    decode_exact(bytes).map_err(|e| format!("argument #{}: {e}", index + 1))
}

/// Decode a single RLP item that must span all of `bytes`.
///
/// `rlp::decode` stops after the first item; trailing bytes are an error here.
pub(crate) fn decode_exact<T: Decodable>(bytes: &[u8]) -> Result<T, DecoderError> {
    let rlp = Rlp::new(bytes);
    let info = rlp.payload_info()?;
    if info.header_len + info.value_len != bytes.len() {
        return Err(DecoderError::Custom("trailing bytes after value"));
    }
    rlp.as_val()
}

macro_rules! impl_arg_list {
    ($arity:expr; $($index:tt => $ty:ident),*) => {
        impl<$($ty: Decodable),*> ArgList for ($($ty,)*) {
            const ARITY: usize = $arity;

            #[allow(unused_variables)]
            fn decode_args(fields: &[Vec<u8>]) -> Result<Self, String> {
                if fields.len() != Self::ARITY {
                    return Err(format!(
                        "expected {} arguments, got {}",
                        Self::ARITY,
                        fields.len()
                    ));
                }
                Ok(($(decode_field::<$ty>(fields, $index)?,)*))
            }
        }
    };
}

impl_arg_list!(0;);
impl_arg_list!(1; 0 => A);
impl_arg_list!(2; 0 => A, 1 => B);
impl_arg_list!(3; 0 => A, 1 => B, 2 => C);
impl_arg_list!(4; 0 => A, 1 => B, 2 => C, 3 => D);
impl_arg_list!(5; 0 => A, 1 => B, 2 => C, 3 => D, 4 => F);
impl_arg_list!(6; 0 => A, 1 => B, 2 => C, 3 => D, 4 => F, 5 => G);
impl_arg_list!(7; 0 => A, 1 => B, 2 => C, 3 => D, 4 => F, 5 => G, 6 => H);
impl_arg_list!(8; 0 => A, 1 => B, 2 => C, 3 => D, 4 => F, 5 => G, 6 => H, 7 => I);
impl_arg_list!(9; 0 => A, 1 => B, 2 => C, 3 => D, 4 => F, 5 => G, 6 => H, 7 => I, 8 => J);
impl_arg_list!(10; 0 => A, 1 => B, 2 => C, 3 => D, 4 => F, 5 => G, 6 => H, 7 => I, 8 => J, 9 => K);
impl_arg_list!(11; 0 => A, 1 => B, 2 => C, 3 => D, 4 => F, 5 => G, 6 => H, 7 => I, 8 => J, 9 => K, 10 => L);
impl_arg_list!(12; 0 => A, 1 => B, 2 => C, 3 => D, 4 => F, 5 => G, 6 => H, 7 => I, 8 => J, 9 => K, 10 => L, 11 => M);
