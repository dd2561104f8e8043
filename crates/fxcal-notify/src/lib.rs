//! Webhook notification delivery for fxcal.
//!
//! Posts a title and a Markdown body to a ServerChan-style push endpoint.
//! Delivery is fire-and-forget: the response is logged, never propagated.

pub mod error;
pub mod key;
pub mod webhook;

pub use error::{NotifyError, NotifyResult};
pub use key::SendKey;
pub use webhook::{double_newlines, NotifierConfig, WebhookNotifier};
