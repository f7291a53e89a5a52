/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::error::Error;
use std::fmt;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    UnknownCar(u32),
    FloorOutOfRange { floor: i32, n_floors: u32 },
    ServiceStopped,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::UnknownCar(id) => write!(f, "No elevator car with id {}", id),
            DispatchError::FloorOutOfRange { floor, n_floors } => {
                write!(f, "Floor {} is outside the building (1..={})", floor, n_floors)
            }
            DispatchError::ServiceStopped => write!(f, "Dispatch service is no longer running"),
        }
    }
}

impl Error for DispatchError {}
