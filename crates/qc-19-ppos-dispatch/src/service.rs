//! # Contract Dispatcher
//!
//! Routes a call payload to the handler registered for its function code.
//!
//! ## Flow
//!
//! ```text
//! input ──→ CallInput::parse ──→ lookup(code) ──→ A::decode_args ──→ handler(ctx, A)
//!              │                     │                  │                 │
//!              ↓                     ↓                  ↓                 ↓
//!        ArgumentDecode     FunctionCodeUnknown   ArgumentDecode   Ok(bytes) / Handler(e)
//! ```
//!
//! Nothing is written by the dispatcher itself. Handlers write through the
//! context; `execute_reverting` rolls those writes back when the call fails.

use crate::domain::{ArgList, CallInput, DispatchError, FunctionKind, RegistrationError};
use crate::ports::Journaled;
use std::collections::BTreeMap;
use tracing::debug;

/// Signature every handler is registered with.
pub type HandlerFn<Ctx, A, E> = fn(&mut Ctx, A) -> Result<Vec<u8>, E>;

type ErasedHandler<Ctx, E> =
    Box<dyn Fn(&mut Ctx, &[Vec<u8>]) -> Result<Vec<u8>, DispatchError<E>> + Send + Sync>;

struct Entry<Ctx, E> {
    name: &'static str,
    kind: FunctionKind,
    arity: usize,
    invoke: ErasedHandler<Ctx, E>,
}

/// Registered function, as listed by [`ContractDispatcher::functions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FunctionInfo {
    pub code: u16,
    pub name: &'static str,
    pub kind: FunctionKind,
    pub arity: usize,
}

/// Static dispatch table of one system contract.
pub struct ContractDispatcher<Ctx, E> {
    contract: &'static str,
    entries: BTreeMap<u16, Entry<Ctx, E>>,
}

impl<Ctx: 'static, E: 'static> ContractDispatcher<Ctx, E> {
    pub fn new(contract: &'static str) -> Self {
        Self {
            contract,
            entries: BTreeMap::new(),
        }
    }

    /// Register `handler` under `code`. Its argument tuple `A` fixes the
    /// arity and field types the payload must carry.
    pub fn register<A: ArgList + 'static>(
        &mut self,
        code: u16,
        name: &'static str,
        handler: HandlerFn<Ctx, A, E>,
    ) -> Result<(), RegistrationError> {
        let kind = FunctionKind::of(code);
        if kind == FunctionKind::Reserved {
            return Err(RegistrationError::ReservedCode(code));
        }
        if self.entries.contains_key(&code) {
            return Err(RegistrationError::DuplicateCode(code));
        }

        let invoke: ErasedHandler<Ctx, E> =
            Box::new(move |ctx: &mut Ctx, fields: &[Vec<u8>]| {
                let args = A::decode_args(fields).map_err(|reason| {
                    DispatchError::ArgumentDecode {
                        code: Some(code),
                        reason,
                    }
                })?;
                handler(ctx, args).map_err(DispatchError::Handler)
            });
        self.entries.insert(
            code,
            Entry {
                name,
                kind,
                arity: A::ARITY,
                invoke,
            },
        );
        Ok(())
    }

    /// Builder-style `register`.
    pub fn with<A: ArgList + 'static>(
        mut self,
        code: u16,
        name: &'static str,
        handler: HandlerFn<Ctx, A, E>,
    ) -> Result<Self, RegistrationError> {
        self.register(code, name, handler)?;
        Ok(self)
    }

    /// Decode `input` and run the matching handler against `ctx`.
    ///
    /// A successful payload is returned verbatim; a handler error is wrapped
    /// in `DispatchError::Handler` without modification.
    pub fn execute(&self, ctx: &mut Ctx, input: &[u8]) -> Result<Vec<u8>, DispatchError<E>> {
        let call = CallInput::parse(input)
            .map_err(|reason| DispatchError::ArgumentDecode { code: None, reason })?;
        let entry = self
            .entries
            .get(&call.code)
            .ok_or(DispatchError::FunctionCodeUnknown(call.code))?;

        debug!(
            code = call.code,
            function = entry.name,
            kind = ?entry.kind,
            args = call.args.len(),
            "[qc-19] Dispatching {} call",
            self.contract
        );
        (entry.invoke)(ctx, &call.args)
    }

    /// System contracts charge no execution gas.
    #[must_use]
    pub fn required_gas(&self, _input: &[u8]) -> u64 {
        0
    }

    #[must_use]
    pub fn contract(&self) -> &'static str {
        self.contract
    }

    #[must_use]
    pub fn contains(&self, code: u16) -> bool {
        self.entries.contains_key(&code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered functions in code order.
    pub fn functions(&self) -> impl Iterator<Item = FunctionInfo> + '_ {
        self.entries.iter().map(|(code, entry)| FunctionInfo {
            code: *code,
            name: entry.name,
            kind: entry.kind,
            arity: entry.arity,
        })
    }
}

/// Run a call and roll back every write it made if it fails.
pub fn execute_reverting<Ctx, E>(
    dispatcher: &ContractDispatcher<Ctx, E>,
    ctx: &mut Ctx,
    input: &[u8],
) -> Result<Vec<u8>, DispatchError<E>>
where
    Ctx: Journaled + 'static,
    E: 'static,
{
    let snapshot = ctx.snapshot();
    let result = dispatcher.execute(ctx, input);
    if let Err(err) = &result {
        debug!("[qc-19] Reverting failed {} call: {}", dispatcher.contract(), describe(err));
        ctx.revert_to(snapshot);
    }
    result
}

fn describe<E>(err: &DispatchError<E>) -> &'static str {
    match err {
        DispatchError::FunctionCodeUnknown(_) => "unknown function code",
        DispatchError::ArgumentDecode { .. } => "argument decode",
        DispatchError::Handler(_) => "handler error",
    }
}
