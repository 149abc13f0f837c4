//! Command dispatch to an external generation service.
//!
//! A [`CommandDispatcher`] validates an [`Invocation`], sends exactly one
//! [`GenerationRequest`] through a [`GenerationService`] and routes the
//! streamed answer into an [`InsertionPipeline`](crate::stream::InsertionPipeline)
//! working on the shared editor session. Every failure ends at the
//! dispatcher as one [`Notification`].

mod dispatcher;
mod invocation;
mod notify;
mod options;
mod service;

pub use dispatcher::{CommandDispatcher, Outcome};
pub use invocation::{Command, DomainContext, GenerationRequest, Invocation};
pub use notify::{LogNotifier, Notification, NotificationLevel, Notifier};
pub use options::{ClientOptions, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use service::{ChunkStream, GenerationService, HttpGenerationService};
