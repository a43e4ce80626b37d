//! GPIO assignments for the Flomon sensor board.
//!
//! Single source of truth: `main` references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Flow switch
// ---------------------------------------------------------------------------

/// Digital input: paddle flow switch.  HIGH = water flowing.
/// Internal pull-down; the switch ties the line to VDD when closed.
pub const FLOW_SWITCH_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Power management
// ---------------------------------------------------------------------------

/// Digital output: DONE input of the nano-power timer that switches the
/// rail.  Held LOW while running; driven HIGH once to remove power.
pub const PM_DONE_GPIO: i32 = 5;
