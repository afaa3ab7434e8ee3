pub mod args;
pub mod call;
pub mod codes;
pub mod errors;

pub use args::ArgList;
pub use call::CallInput;
pub use codes::FunctionKind;
pub use errors::{DispatchError, RegistrationError};
