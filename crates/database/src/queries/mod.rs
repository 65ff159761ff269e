pub mod ingest;
pub mod reliability;
pub mod route;
pub mod stop;
pub mod stop_time;
pub mod trip;
