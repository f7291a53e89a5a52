/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/***************************************/
/*       Public data structures        */
/***************************************/

/// Direction a passenger wants to travel. Idle is never a valid request direction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UP" | "U" => Ok(Direction::Up),
            "DOWN" | "D" => Ok(Direction::Down),
            other => Err(format!("Invalid direction '{}', expected UP or DOWN", other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionState {
    #[serde(rename = "IDLE")]
    Idle,
    #[serde(rename = "MOVING_UP")]
    MovingUp,
    #[serde(rename = "MOVING_DOWN")]
    MovingDown,
}

impl MotionState {
    /// Motion needed to get from `from` to `to`. Equal floors count as up.
    pub fn towards(from: i32, to: i32) -> MotionState {
        if to >= from {
            MotionState::MovingUp
        } else {
            MotionState::MovingDown
        }
    }

    /// True if the car is moving in the same direction as `direction`
    pub fn is_heading(&self, direction: Direction) -> bool {
        matches!(
            (self, direction),
            (MotionState::MovingUp, Direction::Up) | (MotionState::MovingDown, Direction::Down)
        )
    }
}

impl fmt::Display for MotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionState::Idle => write!(f, "IDLE"),
            MotionState::MovingUp => write!(f, "MOVING_UP"),
            MotionState::MovingDown => write!(f, "MOVING_DOWN"),
        }
    }
}

/// Label partitioning floors and cars. Which labels are in use depends on the zone strategy.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Zone {
    Top,
    Middle,
    Bottom,
    Odd,
    Even,
    Default,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Zone::Top => "TOP",
            Zone::Middle => "MIDDLE",
            Zone::Bottom => "BOTTOM",
            Zone::Odd => "ODD",
            Zone::Even => "EVEN",
            Zone::Default => "DEFAULT",
        };
        write!(f, "{}", label)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub floor: i32,
    pub direction: Direction,
}

impl Request {
    pub fn new(floor: i32, direction: Direction) -> Request {
        Request { floor, direction }
    }
}

/// Read-only view of one car, as returned by `inspect`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CarSnapshot {
    pub id: u32,
    #[serde(rename = "currentFloor")]
    pub current_floor: i32,
    #[serde(rename = "motionState")]
    pub motion_state: MotionState,
    pub zone: Zone,
    #[serde(rename = "doorOpen")]
    pub door_open: bool,
}

/// A request matched to a car during a drain round
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub car_id: u32,
    pub request: Request,
    pub from_floor: i32,
}
