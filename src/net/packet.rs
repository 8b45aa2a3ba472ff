use serde::{Deserialize, Serialize};

use crate::space::{Pose, Vec3};

/// Presence beacon payload: who we are and where our head and hands are.
///
/// Best-effort by contract: no ordering, no ack, no retry. `seq` rises
/// monotonically per sender so a receiver may drop stale packets, but
/// nothing on the send side depends on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PosePacket {
    pub name: String,
    pub seq: u64,
    pub head: Pose,
    pub left: Option<Vec3>,
    pub right: Option<Vec3>,
}
