mod config;
mod limiter;

pub use limiter::LoginRateLimiter;
