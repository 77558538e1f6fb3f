//! RSVP (Resource ReSerVation Protocol, RFC 2205)
//!
//! Each message type is a fixed sequence of objects behind the common
//! header; the integrated-services objects (SENDER_TSPEC, ADSPEC) follow the
//! RFC 2210 layouts.

pub mod object;
pub mod packet;

pub use object::RsvpObject;
pub use packet::{build, message_objects, RsvpMessage, RSVP_HEADER_LEN};
