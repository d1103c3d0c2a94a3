//! WhatsApp messaging through Twilio.
//!
//! - [`twilio`]: outbound REST sender with retry behind the
//!   [`MessageSender`](twilio::MessageSender) trait
//! - [`signature`]: verification of inbound webhook signatures

pub mod signature;
pub mod twilio;

pub use signature::{compute_signature, validate_signature};
pub use twilio::{MessageSender, MessagingError, SentMessage, TwilioClient, TwilioConfig};
