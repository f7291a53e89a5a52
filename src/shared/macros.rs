/***************************************/
/*               Macros                */
/***************************************/

/// Unwraps a `Result`, or logs the error and exits the process with status 1
#[macro_export]
macro_rules! unwrap_or_exit {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(e) => {
                log::error!("ERROR: {:#}", e);
                std::process::exit(1);
            }
        }
    };
}
