pub mod calendar;
pub mod health;
pub mod leg;
pub mod live;
pub mod reliability;
pub mod route;
pub mod stop;
pub mod trip;
