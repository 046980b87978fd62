// ABOUTME: HTTP middleware for request tracing, actor extraction and CORS
// ABOUTME: Provides request spans, the CurrentActor extractor and the CORS layer

pub mod actor;
pub mod cors;
pub mod tracing;

pub use actor::{actor_from_headers, CurrentActor};
pub use cors::setup_cors;
pub use self::tracing::{record_actor, RequestCompletion, RequestSpan};
