//! GTK4 front end (feature `gtk`)

mod text;
mod wheel_view;
mod window;

pub use window::run;
