use std::time::Duration;

use serde::{Deserialize, Serialize};


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    // Delay between receiving a poll response and sending the next poll.
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    // Duration of each step when replaying moves reported by the server.
    #[serde(with = "humantime_serde")]
    pub replay_step: Duration,
    // Duration of the local animation before a move is sent to the server.
    #[serde(with = "humantime_serde")]
    pub local_move: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            poll_interval: Duration::from_millis(250),
            replay_step: Duration::from_millis(300),
            local_move: Duration::from_millis(200),
        }
    }
}
