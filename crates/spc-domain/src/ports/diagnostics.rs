//! Diagnostics sink port

use std::sync::Arc;

use crate::ports::container::Container;
use crate::value_objects::DebugSnapshot;

/// Receives container-construction signals
///
/// Sinks are resolved from a short-lived scope of the freshly built container
/// and must never fail or block the build.
pub trait DiagnosticsSink: Send + Sync {
    /// The cache built its first container
    fn on_first_container_created(&self, container: &Arc<dyn Container>);

    /// Another container was built; compare its snapshot against the
    /// snapshots of already cached containers
    fn on_debug_info(&self, snapshot: &DebugSnapshot, prior: &[DebugSnapshot]);

    /// The cache holds suspiciously many containers
    fn on_too_many_containers(&self, containers: &[Arc<dyn Container>]);
}
