//! Build event context: where in the build an event originated.

use serde::{Deserialize, Serialize};

/// Identifies the node, project, target and task an event belongs to.
///
/// All six ids are always present when a context is attached to an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildEventContext {
    /// Build node id.
    pub node_id: i32,
    /// Project context id.
    pub project_context_id: i32,
    /// Target id.
    pub target_id: i32,
    /// Task id.
    pub task_id: i32,
    /// Build submission id.
    pub submission_id: i32,
    /// Project instance id.
    pub project_instance_id: i32,
}

impl BuildEventContext {
    /// Sentinel used by producers for ids that are not known.
    pub const INVALID_ID: i32 = -1;

    /// Build a context from its six ids, in wire order.
    #[must_use]
    pub fn new(
        node_id: i32,
        project_context_id: i32,
        target_id: i32,
        task_id: i32,
        submission_id: i32,
        project_instance_id: i32,
    ) -> Self {
        Self {
            node_id,
            project_context_id,
            target_id,
            task_id,
            submission_id,
            project_instance_id,
        }
    }

    /// The six ids in wire order.
    #[must_use]
    pub fn to_array(&self) -> [i32; 6] {
        [
            self.node_id,
            self.project_context_id,
            self.target_id,
            self.task_id,
            self.submission_id,
            self.project_instance_id,
        ]
    }
}
