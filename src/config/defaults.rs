//! Default value functions for configuration.

pub fn default_realname() -> String {
    concat!("slirc-bot ", env!("CARGO_PKG_VERSION")).to_string()
}

pub fn default_true() -> bool {
    true
}
