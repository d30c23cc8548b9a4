//! Wire protocol shared by the Seance hub and its mediums.
//!
//! Both sides exchange serialized [`Envelope`]s over an opaque
//! [`Transport`]; nothing else crosses the boundary.

pub mod codec;
pub mod constants;
pub mod envelope;
pub mod ids;
pub mod log;
pub mod transport;

// Re-export primary types for convenience.
pub use codec::{CodecError, deserialize, serialize};
pub use constants::{DESTROY_ID, MessageType};
pub use envelope::{Envelope, Identifier, Request, Response};
pub use ids::IdSource;
pub use log::ProtocolLogger;
pub use transport::{Inbound, MessageData, Transport, TransportError, WindowEvent};
