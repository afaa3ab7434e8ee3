//! # Call Envelope
//!
//! A system-contract call payload is an RLP list of byte strings:
//!
//! ```text
//! [ rlp(code: u16), rlp(arg_1), rlp(arg_2), ... ]
//! ```
//!
//! Each item is itself the RLP encoding of one field, so arguments of any
//! type travel as opaque bytes until the handler's argument list decodes them.

use super::args::decode_exact;
use rlp::{Encodable, Rlp, RlpStream};

/// A parsed call: function code plus still-encoded arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallInput {
    pub code: u16,
    pub args: Vec<Vec<u8>>,
}

impl CallInput {
    #[must_use]
    pub fn new(code: u16) -> Self {
        Self {
            code,
            args: Vec::new(),
        }
    }

    /// Append one argument, RLP-encoding it.
    #[must_use]
    pub fn arg<T: Encodable>(mut self, value: &T) -> Self {
        self.args.push(rlp::encode(value).to_vec());
        self
    }

    /// Append an argument that is already RLP-encoded.
    #[must_use]
    pub fn raw_arg(mut self, encoded: Vec<u8>) -> Self {
        self.args.push(encoded);
        self
    }

    /// Serialize into the wire envelope.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut stream = RlpStream::new_list(self.args.len() + 1);
        stream.append(&rlp::encode(&self.code).to_vec());
        for arg in &self.args {
            stream.append(arg);
        }
        stream.out().to_vec()
    }

    /// Parse the wire envelope.
    pub fn parse(input: &[u8]) -> Result<Self, String> {
        let rlp = Rlp::new(input);
        if !rlp.is_list() {
            return Err("call input is not an RLP list".to_string());
        }
        let info = rlp
            .payload_info()
            .map_err(|e| format!("call input is malformed: {e}"))?;
        if info.header_len + info.value_len != input.len() {
            return Err("call input has trailing bytes after the list".to_string());
        }
        let mut fields: Vec<Vec<u8>> = rlp
            .as_list()
            .map_err(|e| format!("call input fields must be byte strings: {e}"))?;
        if fields.is_empty() {
            return Err("call input has no function code".to_string());
        }
        let args = fields.split_off(1);
        let code: u16 =
            decode_exact(&fields[0]).map_err(|e| format!("function code is not a u16: {e}"))?;
        Ok(Self { code, args })
    }
}
