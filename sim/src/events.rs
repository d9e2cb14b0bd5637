use serde::{Deserialize, Serialize};

use crate::{AgentID, SpawnRequest};

/// Things that happened during one tick, for collaborators tracking spawns,
/// exits, and contacts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    AgentSpawned(AgentID),
    /// The requested spawn pose overlapped a live agent; nothing was added.
    /// Retrying after a backoff is the requester's job.
    SpawnRejected(SpawnRequest),
    /// Two agents' rectangles overlapped this tick. The lower id comes
    /// first, and each pair is reported once per tick.
    Collision(AgentID, AgentID),
    /// The agent cleanly left the world bounds and was removed.
    AgentRemoved(AgentID),
}
