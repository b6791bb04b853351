//! OpenWeather current conditions API

pub mod client;
pub mod types;

pub use client::OpenWeatherClient;
pub use types::CurrentWeather;
