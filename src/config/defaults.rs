//! Default values for config fields.

pub(crate) fn default_tick_interval_ms() -> u64 {
    250
}

pub(crate) fn default_host_dir() -> String {
    "host".to_string()
}

pub(crate) fn default_true() -> bool {
    true
}
