mod settings;

pub use settings::{OtelConfig, ServerConfig, Settings, ShutdownSettings, SseConfig};
