pub mod dispatcher;
pub mod service;
pub mod service_tests;

pub use dispatcher::Dispatcher;
pub use dispatcher::Relocation;
pub use service::DispatchHandle;
pub use service::DispatchService;
