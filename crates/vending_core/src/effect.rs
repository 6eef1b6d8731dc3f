use std::time::Duration;

use crate::ClearGeneration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send `Msg::ClearElapsed { generation }` once `after` has elapsed.
    ScheduleClear {
        generation: ClearGeneration,
        after: Duration,
    },
    /// Drop the timer scheduled for `generation`, if it has not fired.
    CancelClear { generation: ClearGeneration },
}
