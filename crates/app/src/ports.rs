//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod command_backend;
pub mod notifier;
pub mod sample_source;

pub use command_backend::CommandBackend;
pub use notifier::TransitionNotifier;
pub use sample_source::SampleSource;
