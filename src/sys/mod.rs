pub mod geometry;
pub mod styles;
pub mod window_server;

#[cfg(windows)]
pub mod win32;

#[cfg(test)]
pub mod testing;
